//! Error types for the chop engine
//!
//! Nothing here is fatal: every error leaves the session in its last
//! consistent state. Degenerate tempo input is not an error at all -
//! it is clamped to a safe default at the tempo authority boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading new source material
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source file is missing or the engine cannot read it
    #[error("source material missing or unreadable: {}", .0.display())]
    InvalidSource(PathBuf),

    /// The hosted engine refused to assign the material to a track
    #[error("engine rejected material on track {track}: {reason}")]
    RejectedByEngine { track: &'static str, reason: String },
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;
