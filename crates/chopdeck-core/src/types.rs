//! Common types for Chopdeck
//!
//! This module contains the fundamental types shared across the chop
//! engine: track identifiers, playback state, tempo constants and the
//! small unit conversions the rest of the crate is built on.

use std::path::PathBuf;

/// Number of tracks in the chop pair (A and B, same source material)
pub const NUM_TRACKS: usize = 2;

/// Fallback tempo when detection fails or input is degenerate
pub const DEFAULT_BPM: f64 = 120.0;

/// Operator tempo range. Wide on the low end: screwed playback goes
/// well below normal DJ ranges.
pub const MIN_BPM: f64 = 20.0;
pub const MAX_BPM: f64 = 400.0;

/// Gain floor substituted for linear gains at or below zero.
/// Effectively silent; avoids log(0) in the dB conversion.
pub const SILENCE_FLOOR_DB: f32 = -60.0;

/// Track identifiers for the chop pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum TrackId {
    A = 0,
    B = 1,
}

impl TrackId {
    /// Both tracks in order
    pub const ALL: [TrackId; NUM_TRACKS] = [TrackId::A, TrackId::B];

    /// Convert from index (0-1) to TrackId
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(TrackId::A),
            1 => Some(TrackId::B),
            _ => None,
        }
    }

    /// Index into per-track arrays
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TrackId::A => "A",
            TrackId::B => "B",
        }
    }
}

/// Playback state reported by the hosted transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// Handle to source material owned by the hosted engine
///
/// The core performs no file I/O; the path is opaque here and only
/// meaningful to the backend and the tempo analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHandle {
    /// Path as understood by the hosted engine
    pub path: PathBuf,
}

impl SourceHandle {
    /// Create a handle for the given engine-side path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Display name for logs and status lines
    pub fn display_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Continuous control axes consumed by the parameter mappers
///
/// These are already-decoded axes; the physical controller protocol is
/// external (see chopdeck-pad for the decoded event vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    /// Brake trigger, normalized to 0.0 (rest) ..= 1.0 (full)
    BrakeTrigger,
}

/// Duration of one beat in milliseconds at the given tempo
#[inline]
pub fn beat_ms(bpm: f64) -> f64 {
    60_000.0 / bpm
}

/// Convert a linear gain to dB, substituting the silence floor for
/// non-positive input instead of computing log(0)
#[inline]
pub fn gain_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        SILENCE_FLOOR_DB
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_roundtrip() {
        assert_eq!(TrackId::from_index(0), Some(TrackId::A));
        assert_eq!(TrackId::from_index(1), Some(TrackId::B));
        assert_eq!(TrackId::from_index(2), None);
        assert_eq!(TrackId::B.index(), 1);
        assert_eq!(TrackId::A.name(), "A");
    }

    #[test]
    fn test_beat_ms() {
        assert_eq!(beat_ms(120.0), 500.0);
        assert_eq!(beat_ms(60.0), 1000.0);
        // Sync scenario: 128 bpm -> one beat is 468.75 ms
        assert!((beat_ms(128.0) - 468.75).abs() < 1e-9);
    }

    #[test]
    fn test_gain_to_db_floor() {
        assert_eq!(gain_to_db(0.0), SILENCE_FLOOR_DB);
        assert_eq!(gain_to_db(-0.5), SILENCE_FLOOR_DB);
        assert!((gain_to_db(1.0)).abs() < 1e-6);
        assert!((gain_to_db(0.5) + 6.0206).abs() < 0.01);
    }

    #[test]
    fn test_source_display_name() {
        let src = SourceHandle::new("/music/purple_drank.flac");
        assert_eq!(src.display_name(), "purple_drank");
    }
}
