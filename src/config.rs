use crate::db::kv_store::DEFAULT_QUOTA_BYTES;
use crate::models::period::{MAX_YEAR, MIN_YEAR, Period, parse_month};
use chrono::Month;
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SQLite file holding the key-value store
    #[arg(long, global = true, env = "SPENDLOG_DB", default_value = "spendlog.db")]
    pub db: PathBuf,

    /// Maximum stored size in characters, keys included
    #[arg(long, global = true, env = "SPENDLOG_QUOTA_BYTES", default_value_t = DEFAULT_QUOTA_BYTES)]
    pub quota_bytes: u64,

    /// Month to work on (defaults to the current month)
    #[arg(long, short, global = true, value_parser = parse_month)]
    pub month: Option<Month>,

    /// Year to work on (defaults to the current year)
    #[arg(long, short, global = true, value_parser = clap::value_parser!(i32).range(MIN_YEAR as i64..=MAX_YEAR as i64))]
    pub year: Option<i32>,

    /// Log more (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    pub fn period(&self) -> Period {
        let current = Period::current();
        Period::new(
            self.month.unwrap_or(current.month),
            self.year.unwrap_or(current.year),
        )
    }
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Logs go to stderr so command output stays clean.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn test_explicit_period() {
        let cli = TestCli::try_parse_from(["spendlog", "--month", "feb", "--year", "2026"]).unwrap();
        assert_eq!(cli.global.period(), Period::new(Month::February, 2026));
    }

    #[test]
    fn test_year_outside_selector_range_rejected() {
        assert!(TestCli::try_parse_from(["spendlog", "--year", "2019"]).is_err());
        assert!(TestCli::try_parse_from(["spendlog", "--year", "2041"]).is_err());
        assert!(TestCli::try_parse_from(["spendlog", "--year", "2040"]).is_ok());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(TestCli::try_parse_from(["spendlog", "--month", "Smarch"]).is_err());
    }

    #[test]
    fn test_missing_period_parts_use_current() {
        let cli = TestCli::try_parse_from(["spendlog", "--year", "2030"]).unwrap();
        let period = cli.global.period();
        assert_eq!(period.year, 2030);
        assert_eq!(period.month, Period::current().month);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = TestCli::try_parse_from(["spendlog", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "info");
        assert_eq!(default_log_level(5), "debug");
    }
}
