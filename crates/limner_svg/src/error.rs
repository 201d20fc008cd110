//! SVG loading error types

use thiserror::Error;

use crate::status::Status;

/// Errors that can occur when loading an SVG document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SvgError {
    /// The engine rejected the document
    #[error("{}", .0.message())]
    Engine(Status),

    /// A `:/` path named a resource that was never registered
    #[error("Bundled resource not found: {0}")]
    ResourceNotFound(String),
}

impl SvgError {
    /// The engine status behind this error, if any
    pub fn status(&self) -> Option<Status> {
        match self {
            SvgError::Engine(status) => Some(*status),
            SvgError::ResourceNotFound(_) => None,
        }
    }
}

impl From<Status> for SvgError {
    fn from(status: Status) -> Self {
        SvgError::Engine(status)
    }
}

/// Result type for limner_svg operations
pub type Result<T> = std::result::Result<T, SvgError>;
