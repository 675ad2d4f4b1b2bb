//! Command-line argument definitions for the m.life processor
//!
//! Defines the complete CLI interface using the clap derive API. The
//! arguments translate into an immutable [`Config`] before the pipeline
//! starts; nothing downstream reads CLI state.

use crate::config::Config;
use crate::constants::{DEFAULT_DETECTION_TIMEOUT_SECS, DEFAULT_FUZZY_THRESHOLD, DEFAULT_VITALS_OFFSET_MINUTES};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the m.life export processor
///
/// Consolidates heterogeneous m.life ICU export records into one
/// normalized long-format table, optionally de-identifying text fields.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mlife-processor",
    version,
    about = "Consolidate m.life ICU export records into a normalized long-format table",
    long_about = "Processes sectioned m.life ICU export files into a single normalized \
                  long-format table (timestamp, source_type, category, parameter, value), \
                  reconciling per-source timestamp and aggregation conventions. Optionally \
                  de-identifies text fields via entity recognition and a fuzzy-matched \
                  blacklist before the table is written."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the m.life processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process an export into the normalized output table (main command)
    Process(ProcessArgs),
    /// Validate an export and print diagnostics without writing output
    Check(CheckArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Path to the m.life export file
    #[arg(value_name = "EXPORT", help = "Path to the m.life export file")]
    pub input: PathBuf,

    /// Output path for the normalized table
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "mlife_table.csv",
        help = "Output path for the normalized table"
    )]
    pub output: PathBuf,

    /// De-identify text fields before writing the table
    ///
    /// Requires a language model artifact (see --model). Numeric values
    /// and very short text are never modified.
    #[arg(long = "deidentify", help = "De-identify text fields before writing")]
    pub deidentify: bool,

    /// Path to the language model artifact
    ///
    /// If not specified, the artifact is looked up in the platform data
    /// directory. A missing or corrupt artifact aborts the run at startup.
    #[arg(
        long = "model",
        value_name = "FILE",
        help = "Path to the language model artifact (JSON lexicon)"
    )]
    pub model: Option<PathBuf>,

    /// Path to the blacklist term file (one term per line)
    ///
    /// If not specified, `blacklist.txt` in the working directory is used
    /// when present.
    #[arg(
        short = 'b',
        long = "blacklist",
        value_name = "FILE",
        help = "Path to the blacklist term file"
    )]
    pub blacklist: Option<PathBuf>,

    /// Minimum similarity percentage for fuzzy blacklist matches
    #[arg(
        long = "fuzzy-threshold",
        value_name = "PERCENT",
        default_value_t = DEFAULT_FUZZY_THRESHOLD,
        help = "Minimum similarity percentage (0-100) for fuzzy blacklist matches"
    )]
    pub fuzzy_threshold: f64,

    /// Disable fuzzy matching (exact case-insensitive terms only)
    #[arg(long = "no-fuzzy", help = "Disable fuzzy blacklist matching")]
    pub no_fuzzy: bool,

    /// Minute offset of the hourly vitals interval stamp
    ///
    /// The export stamps hourly vitals buckets at a fixed minute; the
    /// observed default is :50 but the value is site-dependent.
    #[arg(
        long = "vitals-offset",
        value_name = "MINUTE",
        default_value_t = DEFAULT_VITALS_OFFSET_MINUTES,
        help = "Minute offset of the hourly vitals interval stamp"
    )]
    pub vitals_offset: u32,

    /// Per-field detection timeout in seconds (0 disables the bound)
    #[arg(
        long = "detection-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_DETECTION_TIMEOUT_SECS,
        help = "Per-field detection timeout in seconds; 0 disables"
    )]
    pub detection_timeout: u64,

    /// Write a JSON run report (counters and diagnostics)
    #[arg(
        long = "report",
        value_name = "FILE",
        help = "Write a JSON run report with counters and diagnostics"
    )]
    pub report: Option<PathBuf>,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = 0,
        help = "Number of parallel detection workers (0 = auto)"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Path to the m.life export file
    #[arg(value_name = "EXPORT", help = "Path to the m.life export file")]
    pub input: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl ProcessArgs {
    /// Validate argument consistency before the pipeline starts
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }

        if self.workers > 100 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 100".to_string(),
            ));
        }

        if let Some(blacklist) = &self.blacklist {
            if !blacklist.exists() {
                return Err(Error::configuration(format!(
                    "Blacklist file does not exist: {}",
                    blacklist.display()
                )));
            }
        }

        Ok(())
    }

    /// Build the immutable pipeline configuration from the arguments
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default()
            .with_vitals_offset(self.vitals_offset)
            .with_fuzzy_threshold(self.fuzzy_threshold)
            .with_detection_timeout_secs(self.detection_timeout);

        if self.workers > 0 {
            config = config.with_workers(self.workers);
        }

        if self.no_fuzzy {
            config = config.without_fuzzy_matching();
        }

        if self.deidentify {
            let model_path = match &self.model {
                Some(path) => path.clone(),
                None => Config::default_model_path().ok_or_else(|| {
                    Error::configuration(
                        "no --model given and no platform data directory available",
                    )
                })?,
            };
            config = config.with_deidentification(model_path);

            let blacklist_path = match &self.blacklist {
                Some(path) => Some(path.clone()),
                None => {
                    let default = Config::default_blacklist_path();
                    default.exists().then_some(default)
                }
            };
            if let Some(path) = blacklist_path {
                config = config.with_blacklist(path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if progress bars should be shown (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl CheckArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn process_args(input: PathBuf) -> ProcessArgs {
        ProcessArgs {
            input,
            output: PathBuf::from("out.csv"),
            deidentify: false,
            model: None,
            blacklist: None,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            no_fuzzy: false,
            vitals_offset: DEFAULT_VITALS_OFFSET_MINUTES,
            detection_timeout: DEFAULT_DETECTION_TIMEOUT_SECS,
            report: None,
            workers: 0,
            verbose: 0,
            quiet: false,
        }
    }

    fn temp_export() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Vitalwerte]").unwrap();
        file
    }

    #[test]
    fn test_validation_requires_existing_input() {
        let args = process_args(PathBuf::from("/nonexistent/export.csv"));
        assert!(args.validate().is_err());

        let file = temp_export();
        let args = process_args(file.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_workers_limit() {
        let file = temp_export();
        let mut args = process_args(file.path().to_path_buf());
        args.workers = 101;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_to_config_applies_overrides() {
        let file = temp_export();
        let mut args = process_args(file.path().to_path_buf());
        args.vitals_offset = 0;
        args.fuzzy_threshold = 90.0;
        args.workers = 3;
        args.no_fuzzy = true;

        let config = args.to_config().unwrap();
        assert_eq!(config.vitals_offset_minutes, 0);
        assert_eq!(config.deidentify.fuzzy_threshold, 90.0);
        assert_eq!(config.workers, 3);
        assert!(!config.deidentify.fuzzy_matching);
        assert!(!config.deidentify.enabled);
    }

    #[test]
    fn test_to_config_with_deidentification() {
        let file = temp_export();
        let mut args = process_args(file.path().to_path_buf());
        args.deidentify = true;
        args.model = Some(PathBuf::from("lexicon.json"));

        let config = args.to_config().unwrap();
        assert!(config.deidentify.enabled);
        assert_eq!(
            config.deidentify.model_path,
            Some(PathBuf::from("lexicon.json"))
        );
    }

    #[test]
    fn test_to_config_rejects_bad_threshold() {
        let file = temp_export();
        let mut args = process_args(file.path().to_path_buf());
        args.fuzzy_threshold = 150.0;
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_log_level() {
        let file = temp_export();
        let mut args = process_args(file.path().to_path_buf());
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }
}
