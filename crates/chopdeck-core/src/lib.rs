//! Chopdeck Core - Two-track chop/crossfade engine
//!
//! Keeps two copies of the same source material locked to a shared musical
//! tempo, exposes a minimum-hold "chop" gesture that crossfades between
//! them, and preserves the operator's tempo ratio across material changes.
//!
//! The hosted audio graph, controller protocol decoding and all rendering
//! are external collaborators; this crate only orchestrates gain, tempo
//! and timing parameters through the [`backend::AudioBackend`] seam.

pub mod backend;
pub mod chop;
pub mod clock;
pub mod command;
pub mod config;
pub mod crossfade;
pub mod error;
pub mod mapper;
pub mod session;
pub mod sync;
pub mod tempo;
pub mod types;

pub use types::*;
