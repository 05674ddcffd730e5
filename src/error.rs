//! Error types for the gallery interaction core.
//!
//! Every failure here is local and non-fatal. Callers inside the frame loop
//! log and swallow these; none of them ever aborts a tick.

use crate::mode::Mode;

/// Errors produced by the registry and the mode controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GalleryError {
    #[error("no interactive object registered with id: {0}")]
    NotFound(String),

    #[error("interactive object already registered with id: {0}")]
    DuplicateId(String),

    #[error("invalid mode transition from {from:?} to {to:?}")]
    InvalidModeTransition { from: Mode, to: Mode },
}

pub type Result<T> = std::result::Result<T, GalleryError>;
