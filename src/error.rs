//! Error types for the event registry and request boundary.
//!
//! The synthesis and report stages are total and never return these; they
//! only surface when looking up events, validating new ones, or parsing
//! request parameters.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Unknown metric category: {0}")]
    UnknownCategory(String),

    #[error("Unknown export format: {0}")]
    UnknownExportFormat(String),
}

impl Error {
    /// Whether the error was caused by a missing resource rather than bad input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EventNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
