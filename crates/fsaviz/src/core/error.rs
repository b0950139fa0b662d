//! Core error types for automaton editing
//!
//! Structural failures (missing entities, running without a start state,
//! unparseable save data) are reported through [`AutomatonError`]. Geometry
//! degeneracies are never errors; the curve solver falls back to straight
//! edges instead.

use super::EntityKind;
use thiserror::Error;

/// Result alias used throughout the library
pub type AutomatonResult<T> = std::result::Result<T, AutomatonError>;

/// Core error types for automaton editing and simulation
#[derive(Error, Debug)]
pub enum AutomatonError {
    #[error("Not found: {kind} '{key}'")]
    NotFound { kind: EntityKind, key: String },

    #[error("No start state defined")]
    NoStartDefined,

    #[error("Malformed input in {field} field: {message}")]
    MalformedInput { field: &'static str, message: String },

    #[error("Transition already exists: {key}")]
    TransitionExists { key: String },

    #[error("Dangling reference: {kind} refers to unknown state '{label}'")]
    DanglingReference { kind: EntityKind, label: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AutomatonError {
    /// Create a new not-found error
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create a new malformed-input error for the named save field
    pub fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field,
            message: message.into(),
        }
    }

    /// Create a new dangling-reference error
    pub fn dangling(kind: EntityKind, label: impl Into<String>) -> Self {
        Self::DanglingReference {
            kind,
            label: label.into(),
        }
    }
}
