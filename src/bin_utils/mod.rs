//! Drives the library from a CSV file: rows become transactions, the
//! transactions are replayed into balances, and the balances are printed as
//! fixed-point money.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use csv_parser::{CsvTransactionParser, TransactionRow};
use csv_printer::{BalanceRow, print_balances};
use thiserror::Error;

use crate::{
    asset::{AssetId, AssetIdError},
    event::{EventError, EventId, EventRecord, now_millis},
    identity::{Identity, IdentityError},
    projection::{Projection, balance::BalanceProjection},
    transaction::{Transaction, TransactionStatus},
    wire::{
        decimal::{DecimalParseError, try_from_wire_string},
        money::{Money, MoneyError},
        token::WireToken,
    },
};

pub mod csv_parser;
pub mod csv_printer;

pub const DEFAULT_CURRENCY_CODE: &str = "NDS";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    AssetId(#[from] AssetIdError),
    #[error(transparent)]
    Decimal(#[from] DecimalParseError),
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("{asset} balance of {holder} is not representable: {source}")]
    Balance {
        holder: String,
        asset: String,
        source: MoneyError,
    },
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub currency_code: String,
    /// Called with line 0 for problems not tied to a single input row.
    pub error_printer: Box<dyn FnMut(u64, LedgerError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvTransactionParser::new(self.input).context("Failed to read CSV header")?;

        let mut records = Vec::new();
        for (line, row) in parser {
            match row
                .map_err(LedgerError::from)
                .and_then(|row| to_transaction(row, &self.currency_code))
            {
                Ok(tx) => records.push(EventRecord::from(tx)),
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let balances = BalanceProjection::default().replay(&records);
        let mut rows = Vec::with_capacity(balances.len());
        for (key, amount) in balances {
            match Money::encode(self.currency_code.as_str(), amount) {
                Ok(money) => rows.push(BalanceRow {
                    asset: key.asset.full_id(),
                    holder: key.holder,
                    currency_code: money.currency_code,
                    units: money.units,
                    nanos: money.nanos,
                }),
                Err(source) => (self.error_printer)(
                    0,
                    LedgerError::Balance {
                        holder: key.holder,
                        asset: key.asset.full_id(),
                        source,
                    },
                ),
            }
        }

        print_balances(self.output, rows.into_iter())
    }
}

/// Every amount has to be encodable as money in the configured currency,
/// so rows that would lose precision never reach the projection.
fn to_transaction(row: TransactionRow, currency_code: &str) -> Result<Transaction, LedgerError> {
    let delta = try_from_wire_string(&row.delta)?;
    Money::encode(currency_code, delta)?;

    let mut builder = Transaction::builder()
        .id(EventId::new(row.tx, now_millis())?)
        .actor(Identity::parse(&row.actor)?)
        .asset(AssetId::parse(&row.asset)?)
        .delta(delta)
        .status(TransactionStatus::parse_token(&row.status));
    if let Some(target) = row.target.as_deref().filter(|target| !target.is_empty()) {
        builder = builder.target(&Identity::parse(target)?);
    }
    Ok(builder.build()?)
}
