//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the document search engine, providing the
//! error taxonomy shared by all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from various system components
//! - **Output**: Structured error types with context
//! - **Error Categories**: Input, Capacity, Storage, Configuration, Internal
//!
//! ## Key Features
//! - Invalid query arguments surface as `InvalidInput`, never as panics
//! - Explicit, rejectable capacity bounds surface as `CapacityExceeded`
//! - Absent words/prefixes/empty intersections are NOT errors: the engine
//!   returns `Option`/empty collections and the API layer frames them as
//!   `found: false`
//! - Automatic conversion from storage and serialization error types

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for the document search engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid query or command arguments (empty keyword list, k <= 0, ...)
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// A configured capacity bound would be exceeded
    #[error("Capacity exceeded for {resource}: limit is {limit}")]
    CapacityExceeded { resource: String, limit: usize },

    /// Unknown document identifier
    #[error("Document {document_id} not found")]
    DocumentNotFound { document_id: u64 },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded database errors
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Binary serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Whether the error was caused by the caller's arguments. Used by the
    /// API layer to pick between 400 and 500 responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. }
                | EngineError::CapacityExceeded { .. }
                | EngineError::DocumentNotFound { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { .. } => "input",
            EngineError::CapacityExceeded { .. } => "capacity",
            EngineError::DocumentNotFound { .. } => "input",
            EngineError::Io(_) | EngineError::Database(_) => "storage",
            EngineError::Serialization(_) | EngineError::Json(_) => "serialization",
            EngineError::Config { .. } => "configuration",
            EngineError::Internal { .. } => "internal",
        }
    }
}

/// Helper for the common invalid-argument pattern
#[macro_export]
macro_rules! invalid_input {
    ($field:expr, $reason:expr) => {
        $crate::errors::EngineError::InvalidInput {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    ($field:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::errors::EngineError::InvalidInput {
            field: $field.to_string(),
            reason: format!($fmt, $($arg)*),
        }
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::EngineError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::EngineError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_flagged() {
        let err = EngineError::InvalidInput {
            field: "k".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.category(), "input");

        let err = EngineError::Internal {
            message: "oops".to_string(),
        };
        assert!(!err.is_client_error());
    }

    #[test]
    fn capacity_error_names_resource_and_limit() {
        let err = EngineError::CapacityExceeded {
            resource: "vocabulary".to_string(),
            limit: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Capacity exceeded for vocabulary: limit is 1000"
        );
    }
}
