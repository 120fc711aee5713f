use crate::strategy::{BatchConfig, InputSet};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Ingest AML master and transaction files and produce the authority submission
#[derive(Parser, Debug)]
#[command(name = "aml-reporting-engine")]
#[command(
    about = "Ingest AML master and transaction files and produce the authority submission",
    long_about = None
)]
#[command(group(
    ArgGroup::new("inputs")
        .required(true)
        .multiple(true)
        .args([
            "subjects",
            "relationships",
            "linkages",
            "accounting",
            "id_changes",
            "merchants",
            "transactions",
        ])
))]
pub struct CliArgs {
    /// Subject master file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub subjects: Option<PathBuf>,

    /// Relationship master file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub relationships: Option<PathBuf>,

    /// Subject-relationship linkage file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub linkages: Option<PathBuf>,

    /// Yearly accounting data file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub accounting: Option<PathBuf>,

    /// Subject identifier change file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub id_changes: Option<PathBuf>,

    /// Merchant master file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub merchants: Option<PathBuf>,

    /// POS transaction file (fixed-width)
    #[arg(long, value_name = "FILE")]
    pub transactions: Option<PathBuf>,

    /// Filer configuration (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Where to write the submission file
    #[arg(long, value_name = "FILE", default_value = "submission.txt")]
    pub output: PathBuf,

    /// Where to write the CSV audit report of failed and flagged rows
    #[arg(long, value_name = "FILE")]
    pub error_report: Option<PathBuf>,

    /// Where to write the JSON ingestion summary (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Submission workflow status order (1-13); the file is written only
    /// at the approval stage
    #[arg(long, value_name = "ORDER", default_value_t = 4)]
    pub status: u8,

    /// Ingestion strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Ingestion strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of lines per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of lines per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent chunks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of chunks resolving concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available ingestion strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the CLI values when provided, falling back to defaults
    /// otherwise. Zero values are rejected by [`BatchConfig::new`] with a
    /// logged warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Bundle the input file paths for the strategy layer.
    pub fn to_input_set(&self) -> InputSet {
        InputSet {
            subjects: self.subjects.clone(),
            relationships: self.relationships.clone(),
            linkages: self.linkages.clone(),
            accounting: self.accounting.clone(),
            id_changes: self.id_changes.clone(),
            merchants: self.merchants.clone(),
            transactions: self.transactions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &[&str] = &[
        "program",
        "--config",
        "filer.toml",
        "--transactions",
        "tx.txt",
    ];

    fn with_base<'a>(extra: &'a [&'a str]) -> Vec<&'a str> {
        let mut args = BASE.to_vec();
        args.extend_from_slice(extra);
        args
    }

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&[], StrategyType::Async)]
    #[case::explicit_sync(&["--strategy", "sync"], StrategyType::Sync)]
    #[case::explicit_async(&["--strategy", "async"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] extra: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(with_base(extra)).unwrap();
        match (&parsed.strategy, &expected) {
            (StrategyType::Sync, StrategyType::Sync) => (),
            (StrategyType::Async, StrategyType::Async) => (),
            _ => panic!("Expected {:?}, got {:?}", expected, parsed.strategy),
        }
    }

    #[test]
    fn test_input_set_collects_every_flag() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--config",
            "filer.toml",
            "--subjects",
            "s.txt",
            "--relationships",
            "r.txt",
            "--linkages",
            "l.txt",
            "--accounting",
            "a.txt",
            "--id-changes",
            "i.txt",
            "--merchants",
            "m.txt",
            "--transactions",
            "t.txt",
        ])
        .unwrap();

        let inputs = parsed.to_input_set();
        assert_eq!(inputs.subjects, Some(PathBuf::from("s.txt")));
        assert_eq!(inputs.relationships, Some(PathBuf::from("r.txt")));
        assert_eq!(inputs.linkages, Some(PathBuf::from("l.txt")));
        assert_eq!(inputs.accounting, Some(PathBuf::from("a.txt")));
        assert_eq!(inputs.id_changes, Some(PathBuf::from("i.txt")));
        assert_eq!(inputs.merchants, Some(PathBuf::from("m.txt")));
        assert_eq!(inputs.transactions, Some(PathBuf::from("t.txt")));
    }

    #[test]
    fn test_defaults() {
        let parsed = CliArgs::try_parse_from(with_base(&[])).unwrap();
        assert_eq!(parsed.output, PathBuf::from("submission.txt"));
        assert_eq!(parsed.status, 4);
        assert_eq!(parsed.error_report, None);
        assert_eq!(parsed.summary, None);
    }

    // BatchConfig conversion tests with valid values
    #[rstest]
    #[case::all_defaults(&[], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["--batch-size", "2000"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["--max-concurrent", "8"], 1000, 8)]
    #[case::all_custom(&["--batch-size", "2000", "--max-concurrent", "8"], 2000, 8)]
    fn test_batch_config_conversion(
        #[case] extra: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(with_base(extra)).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    // BatchConfig edge cases - zero values should fall back to defaults
    #[rstest]
    #[case::zero_batch_size(&["--batch-size", "0"], "batch_size", 1000)]
    #[case::zero_max_concurrent(&["--max-concurrent", "0"], "max_concurrent", num_cpus::get())]
    fn test_batch_config_zero_values_fallback(
        #[case] extra: &[&str],
        #[case] field: &str,
        #[case] expected_default: usize,
    ) {
        let parsed = CliArgs::try_parse_from(with_base(extra)).unwrap();
        let config = parsed.to_batch_config();

        match field {
            "batch_size" => assert_eq!(config.batch_size, expected_default),
            "max_concurrent" => assert_eq!(config.max_concurrent_batches, expected_default),
            _ => panic!("Unknown field: {}", field),
        }
    }

    // Error handling tests
    #[rstest]
    #[case::missing_config(&["program", "--transactions", "tx.txt"])]
    #[case::no_inputs(&["program", "--config", "filer.toml"])]
    #[case::invalid_strategy(&[
        "program", "--config", "filer.toml", "--transactions", "tx.txt",
        "--strategy", "invalid",
    ])]
    #[case::non_numeric_status(&[
        "program", "--config", "filer.toml", "--transactions", "tx.txt",
        "--status", "approval",
    ])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
