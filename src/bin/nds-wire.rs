use std::fs::File;

use anyhow::{Context, Result};
use nds_api::bin_utils::{DEFAULT_CURRENCY_CODE, LedgerError, Service};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a file name as the first argument")?;
    let currency_code = args
        .next()
        .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        currency_code,
        error_printer: Box::new(|line, err| match err {
            LedgerError::Csv(err) => eprintln!("Malformed row at line {line}: {err}"),
            err @ LedgerError::Balance { .. } => eprintln!("Skipped {err}"),
            err => eprintln!("Rejected transaction at line {line}: {err}"),
        }),
    };
    service.run()
}
