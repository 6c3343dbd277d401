//! coco2yolo: turn COCO detection splits into YOLO label trees.
//!
//! A dataset root holds one directory per split (`train/`, `valid/`,
//! `test/`), each with a COCO `annotations.coco.json` and its images. For
//! every split the converter writes `labels/<stem>.txt` next to `images/`,
//! in the normalized center format YOLO trainers read.
//!
//! # Modules
//!
//! - [`ir`]: COCO records, lookup indices, box types and the label writer
//! - [`layout`]: moving loose images into `images/`
//! - [`conversion`]: the per-split pipeline and its statistics
//! - [`error`]: Error types for coco2yolo operations

pub mod conversion;
pub mod error;
pub mod ir;
pub mod layout;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use conversion::{ConvertOptions, SplitSummary, DEFAULT_CLASS_NAME, DEFAULT_SPLITS};
pub use error::ConvertError;
use ir::io_coco_json::DEFAULT_ANNOTATIONS_FILE;

/// The coco2yolo CLI application.
#[derive(Parser)]
#[command(name = "coco2yolo")]
#[command(version, about)]
struct Cli {
    /// Dataset root containing one directory per split.
    #[arg(long, env = "COCO2YOLO_ROOT")]
    root: PathBuf,

    /// Splits to convert, each a directory under the root.
    #[arg(long, num_args = 1.., default_values = DEFAULT_SPLITS)]
    splits: Vec<String>,

    /// File name of the COCO document inside each split directory.
    #[arg(long, default_value = DEFAULT_ANNOTATIONS_FILE)]
    annotations: String,

    /// Class name for annotations whose category is missing or unknown.
    #[arg(long, default_value = DEFAULT_CLASS_NAME)]
    default_class: String,

    /// Output format for the per-split report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Convert splits concurrently.
    #[arg(long)]
    parallel: bool,

    /// Exit non-zero when no split was converted.
    #[arg(long)]
    require_any: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One summary line per split.
    Text,
    /// A JSON array with one object per split.
    Json,
}

/// Run the coco2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let opts = ConvertOptions {
        annotations_file: cli.annotations,
        default_class: cli.default_class,
    };
    let summaries = conversion::convert_splits(&cli.root, &cli.splits, &opts, cli.parallel);

    match cli.output {
        OutputFormat::Text => {
            for summary in &summaries {
                println!("{summary}");
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summaries).map_err(ConvertError::ReportWrite)?;
            println!("{json}");
        }
    }

    exit_status(&summaries, cli.require_any)
}

/// Decides the process outcome once every split has been reported.
///
/// Any failed split is an error. Skipped splits are not, unless
/// `require_any` is set and nothing at all was converted.
pub fn exit_status(summaries: &[SplitSummary], require_any: bool) -> Result<(), ConvertError> {
    let failed = summaries.iter().filter(|s| s.is_failed()).count();
    if failed > 0 {
        return Err(ConvertError::SplitsFailed {
            failed,
            total: summaries.len(),
        });
    }

    if require_any && !summaries.iter().any(SplitSummary::is_converted) {
        return Err(ConvertError::NothingConverted {
            skipped: summaries.iter().filter(|s| s.is_skipped()).count(),
        });
    }

    Ok(())
}

/// Logs go to stderr so the report on stdout stays machine-readable.
/// `RUST_LOG` takes precedence over the `-v`/`-q` flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{SkipReason, SplitStatus};
    use clap::CommandFactory;

    fn skipped(split: &str) -> SplitSummary {
        SplitSummary {
            split: split.to_string(),
            status: SplitStatus::Skipped {
                reason: SkipReason::MissingAnnotations {
                    path: PathBuf::from(split).join(DEFAULT_ANNOTATIONS_FILE),
                },
            },
        }
    }

    fn failed(split: &str) -> SplitSummary {
        SplitSummary {
            split: split.to_string(),
            status: SplitStatus::Failed {
                error: "disk full".to_string(),
            },
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_splits() {
        let cli = Cli::try_parse_from(["coco2yolo", "--root", "data"]).unwrap();
        assert_eq!(cli.splits, DEFAULT_SPLITS);
        assert_eq!(cli.annotations, DEFAULT_ANNOTATIONS_FILE);
        assert_eq!(cli.default_class, DEFAULT_CLASS_NAME);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn explicit_splits() {
        let cli =
            Cli::try_parse_from(["coco2yolo", "--root", "data", "--splits", "train", "val"])
                .unwrap();
        assert_eq!(cli.splits, ["train", "val"]);
    }

    #[test]
    fn all_skipped_is_success_unless_required() {
        let summaries = vec![skipped("train"), skipped("valid")];
        assert!(exit_status(&summaries, false).is_ok());
        assert!(matches!(
            exit_status(&summaries, true),
            Err(ConvertError::NothingConverted { skipped: 2 })
        ));
    }

    #[test]
    fn any_failure_is_an_error() {
        let summaries = vec![skipped("train"), failed("valid")];
        assert!(matches!(
            exit_status(&summaries, false),
            Err(ConvertError::SplitsFailed {
                failed: 1,
                total: 2
            })
        ));
    }
}
