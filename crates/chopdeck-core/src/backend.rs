//! Collaborator seams to the hosted audio engine
//!
//! The core never touches audio buffers. Everything it decides - gains,
//! positions, tempo markers, effect parameters - is delivered through
//! these traits. The hosted engine guarantees that each setter is a
//! thread-safe, non-blocking parameter write on its side; absent sinks
//! (UI construction order is not guaranteed) are a no-op there, never a
//! fault here.

use crate::error::LoadResult;
use crate::types::{PlayState, SourceHandle, TrackId};

/// Effect parameters addressable through the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectParam {
    FlangerSpeed,
    FlangerDepth,
    FlangerWidth,
    PhaserRate,
    PhaserDepth,
    PhaserFeedback,
    /// Tempo-synced delay time in milliseconds
    DelayTimeMs,
}

/// Interface to the hosted audio graph and transport
pub trait AudioBackend {
    /// Check whether the engine can read the given source material
    fn source_is_valid(&self, source: &SourceHandle) -> bool;

    /// Assign source material to a track (both tracks carry the same
    /// material with the same loop length; the engine owns clip setup)
    fn assign_source(&mut self, track: TrackId, source: &SourceHandle) -> LoadResult<()>;

    /// Set a track's gain in dB; a not-yet-created volume sink is a no-op
    fn set_track_volume(&mut self, track: TrackId, gain_db: f32);

    /// Position a track's playback start, in milliseconds
    fn set_playback_position(&mut self, track: TrackId, time_ms: f64);

    /// Insert a tempo marker into the engine's tempo timeline
    fn insert_tempo_marker(&mut self, time_ms: f64, bpm: f64);

    /// Current transport state
    fn play_state(&self) -> PlayState;

    /// Start the transport
    fn start(&mut self);

    /// Stop the transport
    fn stop(&mut self);

    /// Set an effect parameter
    fn set_effect_param(&mut self, param: EffectParam, value: f32);

    /// Apply a temporary playback-rate bend (0.0 = none, 1.0 = stopped);
    /// used by the vinyl brake
    fn set_rate_bend(&mut self, bend: f64);
}

/// Tempo analysis collaborator
///
/// Returns `None` (or a non-positive estimate) when detection fails; the
/// load sequence substitutes the default tempo in that case.
pub trait TempoAnalyzer {
    /// Estimate the tempo of the given source material in BPM
    fn estimate_bpm(&mut self, source: &SourceHandle) -> Option<f64>;
}

/// Backend that swallows every call
///
/// Useful for hosts that wire the session before the engine exists;
/// mirrors the missing-sink rule at the coarsest granularity.
#[derive(Debug, Default)]
pub struct NullBackend {
    playing: bool,
}

impl AudioBackend for NullBackend {
    fn source_is_valid(&self, _source: &SourceHandle) -> bool {
        true
    }

    fn assign_source(&mut self, _track: TrackId, _source: &SourceHandle) -> LoadResult<()> {
        Ok(())
    }

    fn set_track_volume(&mut self, _track: TrackId, _gain_db: f32) {}

    fn set_playback_position(&mut self, _track: TrackId, _time_ms: f64) {}

    fn insert_tempo_marker(&mut self, _time_ms: f64, _bpm: f64) {}

    fn play_state(&self) -> PlayState {
        if self.playing {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    fn start(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn set_effect_param(&mut self, _param: EffectParam, _value: f32) {}

    fn set_rate_bend(&mut self, _bend: f64) {}
}

/// Analyzer that always reports the same estimate
#[derive(Debug, Clone, Copy)]
pub struct FixedAnalyzer(pub Option<f64>);

impl TempoAnalyzer for FixedAnalyzer {
    fn estimate_bpm(&mut self, _source: &SourceHandle) -> Option<f64> {
        self.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backend_transport() {
        let mut backend = NullBackend::default();
        assert_eq!(backend.play_state(), PlayState::Stopped);
        backend.start();
        assert_eq!(backend.play_state(), PlayState::Playing);
        backend.stop();
        assert_eq!(backend.play_state(), PlayState::Stopped);
    }

    #[test]
    fn test_fixed_analyzer() {
        let mut analyzer = FixedAnalyzer(Some(128.0));
        let src = SourceHandle::new("/x.flac");
        assert_eq!(analyzer.estimate_bpm(&src), Some(128.0));
    }
}
