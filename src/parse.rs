use clap::{Parser, ValueEnum};
use ebird_checklist::config::{DEFAULT_CONCURRENT, DEFAULT_DELAY_MS, DEFAULT_MAX_RETRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// One row per species entry
    Csv,
    /// Full checklist records
    Json,
}

#[derive(Parser)]
#[command(name = "ebird-checklist")]
#[command(about = "A CLI tool for extracting structured records from eBird checklists")]
#[command(version)]
pub(crate) struct Args {
    /// Checklist identifiers, e.g. S136374832
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Base delay between requests in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay: u64,

    /// Maximum number of concurrent requests
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENT)]
    pub concurrent: usize,

    /// Maximum number of retry attempts
    #[arg(short, long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Output filename
    #[arg(short, long, default_value = "checklists.csv")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ebird-checklist", "S1", "S2"]).unwrap();
        assert_eq!(args.identifiers, vec!["S1", "S2"]);
        assert_eq!(args.delay, 500);
        assert_eq!(args.concurrent, 5);
        assert_eq!(args.retries, 3);
        assert_eq!(args.format, Format::Csv);
        assert!(!args.verbose);
    }

    #[test]
    fn test_json_format() {
        let args =
            Args::try_parse_from(["ebird-checklist", "-f", "json", "-o", "out.json", "S1"]).unwrap();
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.output, "out.json");
    }

    #[test]
    fn test_identifiers_required() {
        assert!(Args::try_parse_from(["ebird-checklist"]).is_err());
    }
}
