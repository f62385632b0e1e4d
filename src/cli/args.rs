use crate::core::replay::ReplayConfig;
use clap::Parser;
use std::path::PathBuf;

/// Replay point operations from a CSV file
#[derive(Parser, Debug)]
#[command(name = "points-engine")]
#[command(about = "Replay point operations from a CSV file", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Number of operations per batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of users processing concurrently
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of users processing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_users: Option<usize>,

    /// Balance ceiling applied to charges
    #[arg(
        long = "max-balance",
        value_name = "POINTS",
        help = "Reject charges that would push a balance above this ceiling (default: no ceiling)"
    )]
    pub max_balance: Option<i64>,
}

impl CliArgs {
    /// Create a ReplayConfig from CLI arguments
    ///
    /// This method constructs a ReplayConfig using the CLI arguments if provided,
    /// or falls back to default values. Zero values are reported and replaced
    /// with defaults.
    ///
    /// # Returns
    ///
    /// A `ReplayConfig` with values from CLI arguments or defaults.
    pub fn to_replay_config(&self) -> ReplayConfig {
        // Use provided values or defaults
        if self.batch_size.is_some()
            || self.max_concurrent_users.is_some()
            || self.max_balance.is_some()
        {
            // At least one custom value provided, create custom config
            let default = ReplayConfig::default();
            ReplayConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_users
                    .unwrap_or(default.max_concurrent_users),
                self.max_balance,
            )
        } else {
            // No custom values, use all defaults
            ReplayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Individual option tests
    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.csv"], Some(2000), None, None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], None, Some(8), None)]
    #[case::max_balance(&["program", "--max-balance", "1000000", "input.csv"], None, None, Some(1_000_000))]
    #[case::no_options(&["program", "input.csv"], None, None, None)]
    #[case::all_options(
        &["program", "--batch-size", "2000", "--max-concurrent", "8", "--max-balance", "5000", "input.csv"],
        Some(2000),
        Some(8),
        Some(5000)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
        #[case] max_balance: Option<i64>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_users, max_concurrent);
        assert_eq!(parsed.max_balance, max_balance);
    }

    // ReplayConfig conversion tests with valid values
    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::all_custom(
        &["program", "--batch-size", "2000", "--max-concurrent", "8", "input.csv"],
        2000,
        8
    )]
    fn test_replay_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_replay_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_users, expected_max_concurrent);
    }

    #[test]
    fn test_max_balance_defaults_to_no_ceiling() {
        let parsed = CliArgs::try_parse_from(["program", "input.csv"]).unwrap();
        let config = parsed.to_replay_config();

        assert_eq!(config.max_balance, None);
    }

    #[test]
    fn test_max_balance_carries_into_config() {
        let parsed =
            CliArgs::try_parse_from(["program", "--max-balance", "1000000", "input.csv"]).unwrap();
        let config = parsed.to_replay_config();

        assert_eq!(config.max_balance, Some(1_000_000));
    }

    // ReplayConfig edge cases - zero values should fall back to defaults
    #[rstest]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], "batch_size", 1000)]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], "max_concurrent", num_cpus::get())]
    fn test_replay_config_zero_values_fallback(
        #[case] args: &[&str],
        #[case] field: &str,
        #[case] expected_default: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_replay_config();

        match field {
            "batch_size" => assert_eq!(config.batch_size, expected_default),
            "max_concurrent" => assert_eq!(config.max_concurrent_users, expected_default),
            _ => panic!("Unknown field: {}", field),
        }
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::non_numeric_batch_size(&["program", "--batch-size", "lots", "input.csv"])]
    #[case::non_numeric_max_balance(&["program", "--max-balance", "plenty", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
