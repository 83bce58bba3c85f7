//! # Error Types
//!
//! Structured error types for pave_core. Every variant carries enough
//! context (field, sheet, stage, path) for a caller to tell the user what
//! to fix without parsing the message.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::errors::{PaveError, PaveResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> PaveResult<()> {
//!     if thickness_mm <= 0.0 {
//!         return Err(PaveError::InvalidInput {
//!             field: "thickness_mm".to_string(),
//!             value: thickness_mm.to_string(),
//!             reason: "Thickness must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pave_core operations
pub type PaveResult<T> = Result<T, PaveError>;

/// Structured error type for pavement design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PaveError {
    /// An input value is invalid (out of range, not numeric, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field or column is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A workbook does not contain a required sheet
    #[error("Missing required sheet: {sheet}")]
    SheetNotFound { sheet: String },

    /// An operation was invoked before the stage it depends on completed
    #[error("Cannot {action}: {missing} has not been provided yet")]
    StageNotReady { action: String, missing: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Report rendering (Typst compile or PDF export) failed
    #[error("Report rendering failed: {reason}")]
    RenderFailed { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PaveError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PaveError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        PaveError::MissingField {
            field: field.into(),
        }
    }

    /// Create a SheetNotFound error
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        PaveError::SheetNotFound {
            sheet: sheet.into(),
        }
    }

    /// Create a StageNotReady error
    pub fn stage_not_ready(action: impl Into<String>, missing: impl Into<String>) -> Self {
        PaveError::StageNotReady {
            action: action.into(),
            missing: missing.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PaveError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(reason: impl Into<String>) -> Self {
        PaveError::RenderFailed {
            reason: reason.into(),
        }
    }

    /// Input problems the user can correct and retry
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaveError::InvalidInput { .. }
                | PaveError::MissingField { .. }
                | PaveError::SheetNotFound { .. }
                | PaveError::StageNotReady { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PaveError::InvalidInput { .. } => "INVALID_INPUT",
            PaveError::MissingField { .. } => "MISSING_FIELD",
            PaveError::SheetNotFound { .. } => "SHEET_NOT_FOUND",
            PaveError::StageNotReady { .. } => "STAGE_NOT_READY",
            PaveError::FileError { .. } => "FILE_ERROR",
            PaveError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PaveError::VersionMismatch { .. } => "VERSION_MISMATCH",
            PaveError::RenderFailed { .. } => "RENDER_FAILED",
            PaveError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for PaveError {
    fn from(e: serde_json::Error) -> Self {
        PaveError::SerializationError {
            reason: e.to_string(),
        }
    }
}
