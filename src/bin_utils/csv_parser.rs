use std::io::Read;

use csv::{StringRecord, StringRecordsIntoIter, Trim};
use serde::Deserialize;

/// One row of the input file. Every field is kept as text so that each one
/// goes through the same codec a wire message would.
#[derive(Debug, Deserialize)]
pub struct TransactionRow {
    pub tx: String,
    pub actor: String,
    pub asset: String,
    pub delta: String,
    pub status: String,
    pub target: Option<String>,
}

/// Parses transaction list in CSV format, yielding the line each row
/// started on together with the parse outcome.
pub struct CsvTransactionParser<R> {
    headers: StringRecord,
    iter: StringRecordsIntoIter<R>,
}

impl<R> CsvTransactionParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        let headers = reader.headers()?.clone();

        Ok(Self {
            headers,
            iter: reader.into_records(),
        })
    }
}

impl<R> Iterator for CsvTransactionParser<R>
where
    R: Read,
{
    type Item = (u64, Result<TransactionRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.iter.next()? {
            Ok(record) => (
                record.position().map(|pos| pos.line()).unwrap_or_default(),
                record.deserialize(Some(&self.headers)),
            ),
            Err(err) => (
                err.position().map(|pos| pos.line()).unwrap_or_default(),
                Err(err),
            ),
        };
        Some(item)
    }
}
