//! Language model artifact loading
//!
//! The entity recognizer works against a versioned lexicon artifact (JSON:
//! model name, version, given/family name lists, title tokens). The
//! artifact is opaque to the rest of the pipeline and loaded exactly once
//! at startup; a missing or corrupt artifact is a fatal configuration
//! error, never a per-record condition.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk artifact layout
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    name: String,
    version: String,
    #[serde(default)]
    given_names: Vec<String>,
    #[serde(default)]
    family_names: Vec<String>,
    #[serde(default)]
    titles: Vec<String>,
}

/// Loaded, validated language model
///
/// Read-only after initialization; safe to share across concurrent
/// detection tasks without synchronization.
#[derive(Debug)]
pub struct LanguageModel {
    pub name: String,
    pub version: String,
    given_names: HashSet<String>,
    family_names: HashSet<String>,
    titles: HashSet<String>,
}

impl LanguageModel {
    /// Load and validate the model artifact
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| Error::language_model(&display, format!("cannot read artifact: {}", e)))?;

        let artifact: ModelArtifact = serde_json::from_str(&content)
            .map_err(|e| Error::language_model(&display, format!("corrupt artifact: {}", e)))?;

        if artifact.name.trim().is_empty() || artifact.version.trim().is_empty() {
            return Err(Error::language_model(
                &display,
                "artifact lacks a model name or version",
            ));
        }

        if artifact.given_names.is_empty() && artifact.family_names.is_empty() {
            return Err(Error::language_model(
                &display,
                "artifact contains no name entries",
            ));
        }

        let model = Self {
            name: artifact.name,
            version: artifact.version,
            given_names: lowercase_set(artifact.given_names),
            family_names: lowercase_set(artifact.family_names),
            titles: lowercase_set(artifact.titles),
        };

        info!(
            "Loaded language model '{}' version {} ({} given names, {} family names, {} titles)",
            model.name,
            model.version,
            model.given_names.len(),
            model.family_names.len(),
            model.titles.len()
        );

        Ok(model)
    }

    /// Check whether a token is a known given name (case-insensitive)
    pub fn is_given_name(&self, token: &str) -> bool {
        self.given_names.contains(&token.to_lowercase())
    }

    /// Check whether a token is a known family name (case-insensitive)
    pub fn is_family_name(&self, token: &str) -> bool {
        self.family_names.contains(&token.to_lowercase())
    }

    /// Check whether a token is a known name of either kind
    pub fn is_name(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        self.given_names.contains(&lower) || self.family_names.contains(&lower)
    }

    /// Check whether a token is a title preceding a name ("Dr", "Frau", ...)
    pub fn is_title(&self, token: &str) -> bool {
        self.titles.contains(&token.trim_end_matches('.').to_lowercase())
    }
}

fn lowercase_set(entries: Vec<String>) -> HashSet<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
