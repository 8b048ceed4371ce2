use crate::application::session::Summary;
use crate::domain::allocation::{Breakdown, PersonTotal, round_money};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// A [`Summary`] rounded for display.
#[derive(Debug, Serialize, PartialEq)]
pub struct Report {
    pub totals: Vec<PersonTotal>,
    pub grand_total: Decimal,
    pub breakdown: Breakdown,
}

impl Report {
    pub fn new(summary: &Summary, precision: u32) -> Self {
        Self {
            totals: summary
                .totals
                .totals()
                .iter()
                .map(|t| PersonTotal {
                    participant: t.participant.clone(),
                    total: round_money(t.total, precision),
                })
                .collect(),
            grand_total: round_money(summary.grand_total, precision),
            breakdown: summary.breakdown.round_dp(precision),
        }
    }

    pub fn write_pretty<W: Write>(&self, sink: W) -> Result<()> {
        serde_json::to_writer_pretty(sink, self)?;
        Ok(())
    }
}
