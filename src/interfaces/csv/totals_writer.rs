use crate::domain::allocation::{PersonTotal, round_money};
use crate::error::Result;
use std::io::Write;

/// Writes per-person totals as `participant,total` CSV rows, rounded for
/// display.
pub struct TotalsWriter<W: Write> {
    writer: csv::Writer<W>,
    precision: u32,
}

impl<W: Write> TotalsWriter<W> {
    pub fn new(sink: W, precision: u32) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
            precision,
        }
    }

    pub fn write_totals<'a, I>(&mut self, totals: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PersonTotal>,
    {
        self.writer.write_record(["participant", "total"])?;
        for entry in totals {
            let amount = round_money(entry.total, self.precision).to_string();
            self.writer
                .write_record([entry.participant.as_str(), amount.as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
