use crate::domain::bill::Dish;
use crate::error::{Result, TallyError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct DishRecord {
    name: String,
    price: Decimal,
    #[serde(default)]
    shared_by: Option<String>,
}

impl From<DishRecord> for Dish {
    fn from(record: DishRecord) -> Self {
        let sharers = record
            .shared_by
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Dish::new(record.name, record.price).shared_by(sharers)
    }
}

/// Reads itemized dishes from a CSV source with a `name,price,shared_by`
/// header, where `shared_by` lists names separated by `;`.
///
/// Whitespace around fields is trimmed and short records are accepted, so a
/// dish nobody shared may omit the last column.
pub struct DishReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> DishReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one dish per record.
    pub fn dishes(self) -> impl Iterator<Item = Result<Dish>> {
        self.reader
            .into_deserialize::<DishRecord>()
            .map(|result| result.map(Dish::from).map_err(TallyError::from))
    }
}
