use clap::Parser;
use std::path::PathBuf;

/// Replay bike fleet lifecycle events and report sanctions
#[derive(Parser, Debug)]
#[command(name = "bike-fleet-engine")]
#[command(about = "Replay bike fleet lifecycle events and report sanctions", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing timestamped fleet events
    #[arg(value_name = "INPUT", help = "Path to the input CSV event log")]
    pub input_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_input_file_is_parsed() {
        let parsed = CliArgs::try_parse_from(["program", "events.csv"]).unwrap();
        assert_eq!(parsed.input_file, PathBuf::from("events.csv"));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::extra_positional(&["program", "events.csv", "extra.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
