//! Tempo authority - base tempo, effective tempo and their ratio
//!
//! Single source of truth for tempo. The base tempo is re-anchored only
//! when new material loads; the effective (current) tempo moves only via
//! explicit operator input. Re-anchoring the base rescales the current
//! tempo so the operator's speed ratio survives material changes.

use crate::types::{DEFAULT_BPM, MAX_BPM, MIN_BPM};

/// Named speed presets as ratios against the base tempo
pub const TEMPO_PRESETS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Tolerance for ratio comparisons against presets
pub const RATIO_EPSILON: f64 = 0.001;

/// Owns the base and effective tempo of the deck pair
///
/// Invariants: both tempos are finite and positive at all times, so
/// `ratio()` is always well-defined and positive.
#[derive(Debug, Clone)]
pub struct TempoAuthority {
    /// Tempo detected from / assigned to the loaded material
    base_bpm: f64,
    /// Operator-controlled tempo actually driving playback
    current_bpm: f64,
}

impl TempoAuthority {
    /// Create an authority anchored at the given tempo (ratio 1.0)
    pub fn new(initial_bpm: f64) -> Self {
        let bpm = sanitize_bpm(initial_bpm);
        Self {
            base_bpm: bpm,
            current_bpm: bpm,
        }
    }

    /// Tempo of the loaded material
    pub fn base_bpm(&self) -> f64 {
        self.base_bpm
    }

    /// Effective playback tempo
    pub fn current_bpm(&self) -> f64 {
        self.current_bpm
    }

    /// Current speed ratio relative to the material's base tempo
    pub fn ratio(&self) -> f64 {
        self.current_bpm / self.base_bpm
    }

    /// Re-anchor the base tempo for newly loaded material
    ///
    /// The effective tempo is rescaled to preserve the previously active
    /// ratio: loading new material must not silently reset a manual
    /// tempo offset. Non-positive input is substituted with the default
    /// tempo rather than propagating a degenerate divisor.
    pub fn set_base_bpm(&mut self, bpm: f64) {
        let ratio = self.ratio();
        self.base_bpm = sanitize_bpm(bpm).clamp(MIN_BPM, MAX_BPM);
        self.current_bpm = (self.base_bpm * ratio).clamp(MIN_BPM, MAX_BPM);
    }

    /// Set the operator-controlled tempo
    pub fn set_current_bpm(&mut self, bpm: f64) {
        self.current_bpm = sanitize_bpm(bpm).clamp(MIN_BPM, MAX_BPM);
    }

    /// Check whether the deck sits at a named speed within tolerance
    pub fn is_at_ratio(&self, target: f64, epsilon: f64) -> bool {
        (self.ratio() - target).abs() < epsilon
    }

    /// The active named preset, if the ratio matches one
    pub fn active_preset(&self) -> Option<f64> {
        TEMPO_PRESETS
            .iter()
            .copied()
            .find(|&p| self.is_at_ratio(p, RATIO_EPSILON))
    }
}

impl Default for TempoAuthority {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

/// Substitute the safe default for non-positive or non-finite tempo
fn sanitize_bpm(bpm: f64) -> f64 {
    if bpm.is_finite() && bpm > 0.0 {
        bpm
    } else {
        log::warn!("invalid tempo {bpm} bpm, substituting {DEFAULT_BPM}");
        DEFAULT_BPM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_ratio_is_unity() {
        let tempo = TempoAuthority::new(140.0);
        assert_eq!(tempo.base_bpm(), 140.0);
        assert_eq!(tempo.current_bpm(), 140.0);
        assert_eq!(tempo.ratio(), 1.0);
    }

    #[test]
    fn test_ratio_preserved_across_base_change() {
        let mut tempo = TempoAuthority::new(120.0);
        tempo.set_current_bpm(150.0);
        let ratio_before = tempo.ratio();
        assert!((ratio_before - 1.25).abs() < 1e-9);

        // Load scenario from the contract: new base 100 -> current 125
        tempo.set_base_bpm(100.0);
        assert_eq!(tempo.base_bpm(), 100.0);
        assert!((tempo.current_bpm() - 125.0).abs() < 1e-9);
        assert!((tempo.ratio() - ratio_before).abs() < RATIO_EPSILON);
    }

    #[test]
    fn test_invalid_tempo_substituted() {
        let mut tempo = TempoAuthority::new(0.0);
        assert_eq!(tempo.base_bpm(), DEFAULT_BPM);

        tempo.set_base_bpm(-30.0);
        assert_eq!(tempo.base_bpm(), DEFAULT_BPM);
        assert!(tempo.ratio() > 0.0);

        tempo.set_current_bpm(f64::NAN);
        assert_eq!(tempo.current_bpm(), DEFAULT_BPM);
    }

    #[test]
    fn test_current_tempo_clamped() {
        let mut tempo = TempoAuthority::new(120.0);
        tempo.set_current_bpm(1000.0);
        assert_eq!(tempo.current_bpm(), MAX_BPM);
        tempo.set_current_bpm(5.0);
        assert_eq!(tempo.current_bpm(), MIN_BPM);
    }

    #[test]
    fn test_preset_detection() {
        let mut tempo = TempoAuthority::new(120.0);
        assert_eq!(tempo.active_preset(), Some(1.0));
        assert!(tempo.is_at_ratio(1.0, RATIO_EPSILON));

        tempo.set_current_bpm(60.0);
        assert_eq!(tempo.active_preset(), Some(0.5));

        tempo.set_current_bpm(100.0);
        assert_eq!(tempo.active_preset(), None);
        assert!(!tempo.is_at_ratio(1.0, RATIO_EPSILON));
    }
}
