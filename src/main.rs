//! Souk CLI
//!
//! Prices the basket described by a YAML fixture and prints a table of
//! original, discount and final amounts per line.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::util::TryInitError;

use souk::{
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError},
    pricing::PricingError,
};

use crate::config::CliConfig;

mod config;
mod logging;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
enum CliError {
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(err) => {
            _ = err.print();

            return ExitCode::from(parse_exit_status(&err));
        }
    };

    if let Err(err) = logging::init_subscriber(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialised, must use eprintln for setup errors"
        )]
        {
            eprintln!("{}", CliError::from(err));
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "pricing failed");

            ExitCode::FAILURE
        }
    }
}

/// Exit status for a failed parse; `--help` and `--version` exit cleanly.
fn parse_exit_status(err: &clap::Error) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(1)
}

fn run(config: &CliConfig) -> Result<(), CliError> {
    let fixture = Fixture::from_path(&config.fixture)?;

    info!(
        fixture = %config.fixture.display(),
        products = fixture.catalog().len(),
        "loaded fixture"
    );

    let book = fixture.rule_book();

    for code in &config.coupons {
        if !book.apply_coupon(code) {
            warn!(code, "coupon is not used by any rule");
        }
    }

    let pending = book.pending_coupons();

    if !pending.is_empty() {
        info!(?pending, "rules still waiting for a coupon");
    }

    let basket = fixture.basket()?;
    let priced = book.price(&basket)?;

    let mut stdout = io::stdout().lock();

    priced.write_to(&mut stdout, fixture.catalog())?;
    stdout.flush()?;

    Ok(())
}
