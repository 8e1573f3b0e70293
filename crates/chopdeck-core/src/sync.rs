//! Track synchronization - loading one source onto both tracks
//!
//! Both tracks always carry the same material. Track B trails track A
//! by exactly one beat of the source's base tempo, so flipping the
//! crossfader between them produces the chopped, beat-displaced echo.
//!
//! The load path re-anchors the tempo authority: the listener's chosen
//! tempo ratio survives a load, the absolute BPM does not.

use log::{info, warn};

use crate::backend::{AudioBackend, TempoAnalyzer};
use crate::crossfade::Crossfader;
use crate::error::{LoadError, LoadResult};
use crate::tempo::TempoAuthority;
use crate::types::{beat_ms, SourceHandle, TrackId, DEFAULT_BPM};

/// Outcome of a successful load, for display and logging
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMaterial {
    pub source: SourceHandle,
    /// Detected (or fallback) base tempo of the material
    pub base_bpm: f64,
    /// Effective tempo after the ratio re-anchor
    pub current_bpm: f64,
    /// Track B's trailing offset behind track A
    pub offset_ms: f64,
}

/// Load `source` onto both tracks and re-establish the one-beat offset.
///
/// The sequence is ordered so that a rejection from either track leaves
/// tempo and fader state untouched. Clip state is the engine's: if it
/// rejects the second track after accepting the first, rolling back the
/// first clip is its job, the same as any other mid-edit failure on its
/// side of the seam. Analysis failure is not an error: the material
/// gets the default tempo and the session keeps going.
pub fn load_material<B, A>(
    source: SourceHandle,
    backend: &mut B,
    analyzer: &mut A,
    tempo: &mut TempoAuthority,
    fader: &mut Crossfader,
    autoplay: bool,
) -> LoadResult<LoadedMaterial>
where
    B: AudioBackend + ?Sized,
    A: TempoAnalyzer + ?Sized,
{
    if !backend.source_is_valid(&source) {
        return Err(LoadError::InvalidSource(source.path));
    }

    let base_bpm = match analyzer.estimate_bpm(&source) {
        Some(bpm) if bpm.is_finite() && bpm > 0.0 => bpm,
        _ => {
            warn!(
                "no tempo estimate for {}, assuming {} BPM",
                source.display_name(),
                DEFAULT_BPM
            );
            DEFAULT_BPM
        }
    };

    for track in TrackId::ALL {
        backend
            .assign_source(track, &source)
            .map_err(|e| match e {
                LoadError::RejectedByEngine { reason, .. } => LoadError::RejectedByEngine {
                    track: track.name(),
                    reason,
                },
                other => other,
            })?;
    }

    // Re-anchor: base moves to the new material, ratio is preserved
    tempo.set_base_bpm(base_bpm);

    // One beat of the material's own tempo, independent of the ratio
    let offset_ms = beat_ms(base_bpm);

    backend.insert_tempo_marker(0.0, base_bpm);
    backend.set_playback_position(TrackId::A, 0.0);
    backend.set_playback_position(TrackId::B, offset_ms);

    // Fresh material starts fully on track A
    fader.set_position(0.0);
    fader.apply(backend);

    if autoplay {
        backend.start();
    }

    let loaded = LoadedMaterial {
        base_bpm,
        current_bpm: tempo.current_bpm(),
        offset_ms,
        source,
    };
    info!(
        "loaded {} at {:.2} BPM, track B offset {:.2} ms",
        loaded.source.display_name(),
        loaded.base_bpm,
        loaded.offset_ms
    );
    Ok(loaded)
}
