use std::io::Write;

use anyhow::Context;
use csv::Writer;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub holder: String,
    pub asset: String,
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

pub fn print_balances<W>(
    output: &mut W,
    balances: impl Iterator<Item = BalanceRow>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for row in balances {
        writer
            .serialize(&row)
            .with_context(|| format!("Failed to write {} balance of {}", row.asset, row.holder))?;
    }
    writer.flush().context("Failed to flush CSV writer")
}
