//! Custom error types for Frost.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`.
//! Routing a message to the wrong handler is a programming error and panics
//! in [`SimulationMessageHandler::handle_message`](crate::SimulationMessageHandler::handle_message);
//! the `MisroutedMessage` variant exists for the non-panicking entry point.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulation scaffold.
#[derive(Debug, Error)]
pub enum SimError {
    // =========================================================================
    // Construction Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Dispatch Errors
    // =========================================================================
    #[error("Message for '{target}' routed to handler '{handler}'")]
    MisroutedMessage { handler: String, target: String },

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Participant already exists: {0}")]
    ParticipantAlreadyExists(String),

    // =========================================================================
    // Stepping Errors
    // =========================================================================
    #[error("No step proposals pending - cannot compute the next step")]
    EmptyStepBuffer,

    #[error("Simulation clock overflow: {now} ns + {step} ns")]
    ClockOverflow { now: u64, step: u64 },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors raised while building values from untrusted input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown operation '{operation}' for role {role}")]
    UnknownOperation { operation: String, role: String },
}

/// Result type alias using SimError.
pub type SimResult<T> = Result<T, SimError>;
