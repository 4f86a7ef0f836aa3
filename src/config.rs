//! CLI configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Price a basket from a YAML fixture and print the result
#[derive(Debug, Parser)]
#[command(name = "souk", version, about = "Marketplace basket pricing", long_about = None)]
pub struct CliConfig {
    /// YAML fixture with products, basket, coupons and discount rules
    #[arg(short, long, env = "SOUK_FIXTURE")]
    pub fixture: PathBuf,

    /// Extra coupon code to redeem (repeatable)
    #[arg(short, long = "coupon", value_name = "CODE")]
    pub coupons: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn coupons_are_repeatable() -> TestResult {
        let config = CliConfig::try_parse_from([
            "souk",
            "--fixture",
            "basket.yml",
            "--coupon",
            "A",
            "-c",
            "B",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.fixture, PathBuf::from("basket.yml"));
        assert_eq!(config.coupons, ["A", "B"]);
        assert!(matches!(config.log_format, LogFormat::Json));

        Ok(())
    }

    #[test]
    fn fixture_is_required() {
        assert!(CliConfig::try_parse_from(["souk"]).is_err());
    }
}
