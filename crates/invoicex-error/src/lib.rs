// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error taxonomy for the invoicex pipeline.
//!
//! Every [`PipelineError`] carries a stable, machine-readable
//! [`ErrorCode`] plus a human-readable message. The taxonomy is
//! deliberately small: per the pipeline's error handling design, almost
//! every failure mode (missing documents, parse errors, validation
//! failures, duplicate detection) is *data*, represented elsewhere as a
//! `StructuredException` or `ValidationResult`, and never surfaces as a
//! Rust `Err`. The only thing that is allowed to escape as an error is
//! a fatal I/O failure while writing a log or ledger record.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Broad family an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Failures reading or writing append-only logs.
    Log,
    /// Failures reading or writing the JSON document store.
    Store,
    /// Configuration errors.
    Config,
    /// Catch-all for unexpected internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Log => "log",
            Self::Store => "store",
            Self::Config => "config",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Machine-readable, stable error code.
///
/// Each variant serializes to a `SCREAMING_SNAKE_CASE` string that will
/// not change across patch releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Appending a record to a log or ledger file failed.
    LogWriteFailed,
    /// Reading a log file failed (distinct from a torn last line, which
    /// is tolerated silently per the processed-invoice log's read path).
    LogReadFailed,
    /// The configured repo root does not exist or is not a directory.
    StoreRootInvalid,
    /// Configuration failed to load or validate.
    ConfigInvalid,
    /// An unexpected internal error.
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LogWriteFailed => "LOG_WRITE_FAILED",
            Self::LogReadFailed => "LOG_READ_FAILED",
            Self::StoreRootInvalid => "STORE_ROOT_INVALID",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

impl ErrorCode {
    /// The [`ErrorCategory`] this code belongs to.
    #[must_use]
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::LogWriteFailed | Self::LogReadFailed => ErrorCategory::Log,
            Self::StoreRootInvalid => ErrorCategory::Store,
            Self::ConfigInvalid => ErrorCategory::Config,
            Self::Internal => ErrorCategory::Internal,
        }
    }
}

/// The only error type that crosses a crate boundary as `Result::Err`
/// in this pipeline.
///
/// Construct with [`PipelineError::io`] or [`PipelineError::new`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An append-only log or ledger write failed.
    #[error("[{code}] failed to write {path}: {source}", code = ErrorCode::LogWriteFailed)]
    LogWrite {
        /// Path of the file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading a log file failed outright (not a tolerated torn tail).
    #[error("[{code}] failed to read {path}: {source}", code = ErrorCode::LogReadFailed)]
    LogRead {
        /// Path of the file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configured repo root is not usable.
    #[error("[{code}] repo root {path} is not a directory", code = ErrorCode::StoreRootInvalid)]
    StoreRootInvalid {
        /// The offending path.
        path: PathBuf,
    },

    /// Configuration failed to load or validate.
    #[error("[{code}] {reason}", code = ErrorCode::ConfigInvalid)]
    ConfigInvalid {
        /// Human-readable reason.
        reason: String,
    },
}

impl PipelineError {
    /// Wrap an I/O error encountered while writing a log file.
    #[must_use]
    pub fn log_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogWrite {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error encountered while reading a log file.
    #[must_use]
    pub fn log_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogRead {
            path: path.into(),
            source,
        }
    }

    /// Returns the stable [`ErrorCode`] for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LogWrite { .. } => ErrorCode::LogWriteFailed,
            Self::LogRead { .. } => ErrorCode::LogReadFailed,
            Self::StoreRootInvalid { .. } => ErrorCode::StoreRootInvalid,
            Self::ConfigInvalid { .. } => ErrorCode::ConfigInvalid,
        }
    }
}

/// Convenience result type for pipeline I/O operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::LogWriteFailed).unwrap();
        assert_eq!(json, "\"LOG_WRITE_FAILED\"");
    }

    #[test]
    fn category_mapping_is_stable() {
        assert_eq!(ErrorCode::LogWriteFailed.category(), ErrorCategory::Log);
        assert_eq!(ErrorCode::ConfigInvalid.category(), ErrorCategory::Config);
    }

    #[test]
    fn display_includes_code() {
        let err = PipelineError::StoreRootInvalid {
            path: PathBuf::from("/nope"),
        };
        assert!(err.to_string().contains("STORE_ROOT_INVALID"));
    }
}
