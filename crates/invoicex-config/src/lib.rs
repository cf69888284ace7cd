// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runtime configuration for the invoice pipeline.
//!
//! [`RepoConfig`] carries the repo root the document store and ledgers
//! operate under, the resolver's confidence thresholds, the triage
//! high-value thresholds, and worker concurrency. It loads from a TOML
//! file, builds programmatically via [`Default`], and validates into
//! either hard [`ConfigError`]s or advisory [`ConfigWarning`]s.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or validating a [`RepoConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// No repo root was configured; the current directory will be used.
    MissingRepoRoot,
    /// Worker concurrency was not set; available parallelism will be used.
    MissingConcurrency,
    /// A threshold was set away from its calibrated default (spec.md §9 —
    /// re-calibrating these is a deliberate operator choice, not a bug).
    NonDefaultThreshold {
        /// Name of the threshold field.
        field: String,
        /// The configured value.
        value: f64,
        /// The calibrated default.
        default: f64,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::MissingRepoRoot => {
                write!(f, "no repo_root configured, defaulting to the current directory")
            }
            ConfigWarning::MissingConcurrency => {
                write!(f, "no concurrency configured, defaulting to available parallelism")
            }
            ConfigWarning::NonDefaultThreshold { field, value, default } => {
                write!(f, "'{field}' is {value} (calibrated default is {default})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default `min_confidence` for the PO fuzzy matcher (spec.md §4.3).
pub const DEFAULT_PO_MIN_CONFIDENCE: f64 = 0.7;
/// Default `min_confidence` for the supplier fuzzy matcher (spec.md §4.3).
pub const DEFAULT_SUPPLIER_MIN_CONFIDENCE: f64 = 0.8;
/// Overall-confidence floor below which triage routes to
/// `low_confidence_matches` regardless of validator outcome (spec.md §4.8).
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Overall-confidence floor below which an otherwise-passing invoice still
/// requires manager approval (spec.md §4.8).
pub const DEFAULT_HIGH_VALUE_CONFIDENCE_THRESHOLD: f64 = 0.9;
/// Billing amount above which an otherwise-passing invoice requires manager
/// approval (spec.md §4.8).
pub const DEFAULT_HIGH_VALUE_AMOUNT_THRESHOLD: f64 = 10_000.0;

fn default_po_min_confidence() -> f64 {
    DEFAULT_PO_MIN_CONFIDENCE
}
fn default_supplier_min_confidence() -> f64 {
    DEFAULT_SUPPLIER_MIN_CONFIDENCE
}
fn default_low_confidence_threshold() -> f64 {
    DEFAULT_LOW_CONFIDENCE_THRESHOLD
}
fn default_high_value_confidence_threshold() -> f64 {
    DEFAULT_HIGH_VALUE_CONFIDENCE_THRESHOLD
}
fn default_high_value_amount_threshold() -> f64 {
    DEFAULT_HIGH_VALUE_AMOUNT_THRESHOLD
}

// ---------------------------------------------------------------------------
// Config type
// ---------------------------------------------------------------------------

/// Top-level runtime configuration for the invoice pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RepoConfig {
    /// Root directory the document store and system logs operate under.
    /// Defaults to the current directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_root: Option<String>,

    /// `min_confidence` passed to the PO fuzzy matcher.
    #[serde(default = "default_po_min_confidence")]
    pub po_min_confidence: f64,

    /// `min_confidence` passed to the supplier fuzzy matcher.
    #[serde(default = "default_supplier_min_confidence")]
    pub supplier_min_confidence: f64,

    /// Overall-confidence floor for the `low_confidence_matches` queue.
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,

    /// Overall-confidence floor for the `high_value_approval` queue.
    #[serde(default = "default_high_value_confidence_threshold")]
    pub high_value_confidence_threshold: f64,

    /// Billing-amount ceiling for the `high_value_approval` queue.
    #[serde(default = "default_high_value_amount_threshold")]
    pub high_value_amount_threshold: f64,

    /// Worker pool size for `process-batch`. Defaults to available
    /// parallelism when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            repo_root: None,
            po_min_confidence: DEFAULT_PO_MIN_CONFIDENCE,
            supplier_min_confidence: DEFAULT_SUPPLIER_MIN_CONFIDENCE,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            high_value_confidence_threshold: DEFAULT_HIGH_VALUE_CONFIDENCE_THRESHOLD,
            high_value_amount_threshold: DEFAULT_HIGH_VALUE_AMOUNT_THRESHOLD,
            concurrency: None,
        }
    }
}

impl RepoConfig {
    /// The configured repo root, or the current directory if unset.
    #[must_use]
    pub fn repo_root_path(&self) -> PathBuf {
        self.repo_root
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The configured worker concurrency, or available parallelism if unset.
    #[must_use]
    pub fn worker_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`RepoConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`RepoConfig::default()`].
pub fn load_config(path: Option<&Path>) -> Result<RepoConfig, ConfigError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)
        }
        None => Ok(RepoConfig::default()),
    }
}

/// Parse a TOML string into a [`RepoConfig`].
pub fn parse_toml(content: &str) -> Result<RepoConfig, ConfigError> {
    toml::from_str::<RepoConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_unit_interval(errors: &mut Vec<String>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("'{field}' must be within [0.0, 1.0], got {value}"));
    }
}

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (thresholds outside `[0.0, 1.0]`, a non-positive high-value
/// amount threshold, zero concurrency) come back as a
/// [`ConfigError::ValidationError`]; soft issues come back as warnings.
pub fn validate_config(config: &RepoConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    check_unit_interval(&mut errors, "po_min_confidence", config.po_min_confidence);
    check_unit_interval(&mut errors, "supplier_min_confidence", config.supplier_min_confidence);
    check_unit_interval(&mut errors, "low_confidence_threshold", config.low_confidence_threshold);
    check_unit_interval(
        &mut errors,
        "high_value_confidence_threshold",
        config.high_value_confidence_threshold,
    );

    if config.high_value_amount_threshold <= 0.0 {
        errors.push(format!(
            "'high_value_amount_threshold' must be positive, got {}",
            config.high_value_amount_threshold
        ));
    }

    if let Some(0) = config.concurrency {
        errors.push("'concurrency' must be at least 1".to_string());
    }

    if config.repo_root.is_none() {
        warnings.push(ConfigWarning::MissingRepoRoot);
    }
    if config.concurrency.is_none() {
        warnings.push(ConfigWarning::MissingConcurrency);
    }

    for (field, value, default) in [
        ("po_min_confidence", config.po_min_confidence, DEFAULT_PO_MIN_CONFIDENCE),
        (
            "supplier_min_confidence",
            config.supplier_min_confidence,
            DEFAULT_SUPPLIER_MIN_CONFIDENCE,
        ),
        (
            "low_confidence_threshold",
            config.low_confidence_threshold,
            DEFAULT_LOW_CONFIDENCE_THRESHOLD,
        ),
        (
            "high_value_confidence_threshold",
            config.high_value_confidence_threshold,
            DEFAULT_HIGH_VALUE_CONFIDENCE_THRESHOLD,
        ),
        (
            "high_value_amount_threshold",
            config.high_value_amount_threshold,
            DEFAULT_HIGH_VALUE_AMOUNT_THRESHOLD,
        ),
    ] {
        if (value - default).abs() > f64::EPSILON {
            warnings.push(ConfigWarning::NonDefaultThreshold { field: field.to_string(), value, default });
        }
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}
