//! Error taxonomy for the packing core.
//!
//! Four kinds, matching the service boundary's HTTP status mapping: a
//! validated request that is structurally wrong (`Validation`), a
//! search that exhausted its restarts without a feasible packing
//! (`Constraint`), a search that ran out of wall-clock budget before
//! finding any feasible packing (`Timeout`), and anything else
//! (`Internal`). The mapping itself lives on the error so callers never
//! re-derive it.

use thiserror::Error;

/// An error produced by the packing core.
#[derive(Debug, Error)]
pub enum PackError {
    /// Malformed request or violated static precondition, surfaced before search begins.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the violated precondition.
        message: String,
        /// Optional structured detail (e.g. offending field paths).
        details: Option<serde_json::Value>,
    },

    /// The search loop exhausted its restarts without ever reaching a feasible packing.
    #[error("{0}")]
    Constraint(String),

    /// The wall-clock time budget elapsed before any feasible packing was found.
    #[error("time limit exceeded")]
    Timeout,

    /// Any unclassified failure from the packer adapter or evaluator.
    #[error("{0}")]
    Internal(String),
}

impl PackError {
    /// Builds a `Validation` error with no structured details.
    pub fn validation(message: impl Into<String>) -> Self {
        PackError::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Builds a `Validation` error carrying structured details.
    pub fn validation_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        PackError::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Builds a `Constraint` error.
    pub fn constraint(message: impl Into<String>) -> Self {
        PackError::Constraint(message.into())
    }

    /// Stable machine-readable identifier for this error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            PackError::Validation { .. } => "VALIDATION_ERROR",
            PackError::Constraint(_) => "CONSTRAINT_ERROR",
            PackError::Timeout => "TIMEOUT",
            PackError::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP status this error kind would surface as, at the service boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            PackError::Validation { .. } => 422,
            PackError::Constraint(_) => 400,
            PackError::Timeout => 408,
            PackError::Internal(_) => 500,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PackError>;
