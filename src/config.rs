//! Configuration management and validation.
//!
//! Provides the immutable pipeline configuration: interval/aggregation
//! parameters for normalization and the de-identification options.
//! Configuration is passed explicitly through the pipeline; there is no
//! ambient state.

use crate::constants::{
    DEFAULT_BLACKLIST_FILENAME, DEFAULT_DETECTION_TIMEOUT_SECS, DEFAULT_FLUID_WINDOW_MAX_HOURS,
    DEFAULT_FLUID_WINDOW_MIN_HOURS, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MODEL_FILENAME,
    DEFAULT_VITALS_OFFSET_MINUTES, LAB_INTERVAL_MINUTES, RESPIRATORY_INTERVAL_MINUTES,
    VITALS_INTERVAL_MINUTES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// De-identification options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeidentifyConfig {
    /// Run the de-identification stage after consolidation
    pub enabled: bool,

    /// Tolerate spelling variation when matching blacklist terms
    pub fuzzy_matching: bool,

    /// Minimum similarity percentage (0-100) required to flag a fuzzy match
    pub fuzzy_threshold: f64,

    /// Per-field detection timeout in seconds; 0 disables the bound.
    /// On expiry the field is left unredacted and flagged for manual review.
    pub detection_timeout_secs: u64,

    /// Path to the language model artifact; required when enabled
    pub model_path: Option<PathBuf>,

    /// Path to the blacklist term file; optional
    pub blacklist_path: Option<PathBuf>,
}

impl Default for DeidentifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fuzzy_matching: true,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            detection_timeout_secs: DEFAULT_DETECTION_TIMEOUT_SECS,
            model_path: None,
            blacklist_path: None,
        }
    }
}

/// Global configuration for m.life processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vitals first-of-interval bucket length in minutes
    pub vitals_interval_minutes: u32,

    /// Minute offset at which hourly vitals buckets are stamped.
    /// The observed export value is 50; its origin (export-tool default vs.
    /// site configuration) is unconfirmed, so it stays configurable.
    pub vitals_offset_minutes: u32,

    /// Laboratory first-of-interval bucket length in minutes
    pub lab_interval_minutes: u32,

    /// Respiratory settings bucket length in minutes
    pub respiratory_interval_minutes: u32,

    /// Accepted fluid-balance window duration bounds in hours
    pub fluid_window_min_hours: i64,
    pub fluid_window_max_hours: i64,

    /// Number of worker tasks for concurrent detection
    pub workers: usize,

    /// De-identification options
    pub deidentify: DeidentifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vitals_interval_minutes: VITALS_INTERVAL_MINUTES,
            vitals_offset_minutes: DEFAULT_VITALS_OFFSET_MINUTES,
            lab_interval_minutes: LAB_INTERVAL_MINUTES,
            respiratory_interval_minutes: RESPIRATORY_INTERVAL_MINUTES,
            fluid_window_min_hours: DEFAULT_FLUID_WINDOW_MIN_HOURS,
            fluid_window_max_hours: DEFAULT_FLUID_WINDOW_MAX_HOURS,
            workers: num_cpus::get().min(8),
            deidentify: DeidentifyConfig::default(),
        }
    }
}

impl Config {
    /// Create configuration with a custom vitals interval offset
    pub fn with_vitals_offset(mut self, offset_minutes: u32) -> Self {
        self.vitals_offset_minutes = offset_minutes;
        self
    }

    /// Create configuration with a custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom fluid-balance window bounds
    pub fn with_fluid_window_hours(mut self, min_hours: i64, max_hours: i64) -> Self {
        self.fluid_window_min_hours = min_hours;
        self.fluid_window_max_hours = max_hours;
        self
    }

    /// Enable de-identification with the given model artifact
    pub fn with_deidentification(mut self, model_path: PathBuf) -> Self {
        self.deidentify.enabled = true;
        self.deidentify.model_path = Some(model_path);
        self
    }

    /// Create configuration with a blacklist file
    pub fn with_blacklist(mut self, blacklist_path: PathBuf) -> Self {
        self.deidentify.blacklist_path = Some(blacklist_path);
        self
    }

    /// Create configuration with a custom fuzzy threshold
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.deidentify.fuzzy_threshold = threshold;
        self
    }

    /// Disable fuzzy matching (exact case-insensitive blacklist matching only)
    pub fn without_fuzzy_matching(mut self) -> Self {
        self.deidentify.fuzzy_matching = false;
        self
    }

    /// Create configuration with a custom per-field detection timeout
    pub fn with_detection_timeout_secs(mut self, secs: u64) -> Self {
        self.deidentify.detection_timeout_secs = secs;
        self
    }

    /// Validate configuration values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.vitals_interval_minutes == 0
            || self.lab_interval_minutes == 0
            || self.respiratory_interval_minutes == 0
        {
            return Err(Error::configuration(
                "Aggregation interval lengths must be greater than 0".to_string(),
            ));
        }

        if self.vitals_offset_minutes >= self.vitals_interval_minutes {
            return Err(Error::configuration(format!(
                "Vitals offset {} must be smaller than the interval length {}",
                self.vitals_offset_minutes, self.vitals_interval_minutes
            )));
        }

        if self.fluid_window_min_hours <= 0 || self.fluid_window_min_hours > self.fluid_window_max_hours
        {
            return Err(Error::configuration(format!(
                "Invalid fluid window bounds: {}..{} hours",
                self.fluid_window_min_hours, self.fluid_window_max_hours
            )));
        }

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.deidentify.fuzzy_threshold) {
            return Err(Error::configuration(format!(
                "Fuzzy threshold {} must be between 0 and 100",
                self.deidentify.fuzzy_threshold
            )));
        }

        if self.deidentify.enabled && self.deidentify.model_path.is_none() {
            return Err(Error::configuration(
                "De-identification requires a language model path".to_string(),
            ));
        }

        Ok(())
    }

    /// Default blacklist location: `blacklist.txt` in the working directory
    pub fn default_blacklist_path() -> PathBuf {
        PathBuf::from(DEFAULT_BLACKLIST_FILENAME)
    }

    /// Default language model location under the platform data directory
    pub fn default_model_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("mlife-processor").join(DEFAULT_MODEL_FILENAME))
    }
}
