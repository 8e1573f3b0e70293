//! Crossfade controller - equal-power position to per-track dB gains
//!
//! Owns a scalar position in [0, 1] (0.0 = track A fully audible,
//! 1.0 = track B fully audible) and converts it to two dB gains with an
//! equal-power law, so the combined power stays constant across the
//! sweep and the midpoint has no perceived volume dip.

use std::f32::consts::FRAC_PI_2;

use crate::backend::AudioBackend;
use crate::types::{gain_to_db, SILENCE_FLOOR_DB, TrackId};

/// Equal-power linear gains for a crossfade position in [0, 1]
///
/// `gain_a^2 + gain_b^2 == 1` for every position.
#[inline]
pub fn equal_power_gains(position: f32) -> (f32, f32) {
    let p = position.clamp(0.0, 1.0);
    ((p * FRAC_PI_2).cos(), (p * FRAC_PI_2).sin())
}

/// Crossfader between the two tracks of the chop pair
#[derive(Debug, Clone)]
pub struct Crossfader {
    /// Position in [0, 1]; mutated by the chop gesture or operator drag
    position: f32,
    /// dB substituted for a fully-killed side
    floor_db: f32,
}

impl Crossfader {
    /// Create a crossfader resting on track A
    pub fn new(floor_db: f32) -> Self {
        Self {
            position: 0.0,
            floor_db,
        }
    }

    /// Current position
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Set the position, clamped to [0, 1]
    pub fn set_position(&mut self, position: f32) {
        self.position = position.clamp(0.0, 1.0);
    }

    /// Flip to the opposite extreme around the 0.5 midpoint
    ///
    /// Positions at or below the midpoint land on 1.0, above it on 0.0.
    /// Returns the new position.
    pub fn flip(&mut self) -> f32 {
        self.position = if self.position <= 0.5 { 1.0 } else { 0.0 };
        self.position
    }

    /// Per-track gains in dB at the current position
    ///
    /// A fully-killed side reports the silence floor instead of -inf.
    pub fn gains_db(&self) -> (f32, f32) {
        let (lin_a, lin_b) = equal_power_gains(self.position);
        (self.floor(lin_a), self.floor(lin_b))
    }

    /// Push the current gains to both track volume sinks
    pub fn apply<B: AudioBackend + ?Sized>(&self, backend: &mut B) {
        let (db_a, db_b) = self.gains_db();
        backend.set_track_volume(TrackId::A, db_a);
        backend.set_track_volume(TrackId::B, db_b);
    }

    fn floor(&self, linear: f32) -> f32 {
        if linear <= 0.0 {
            self.floor_db
        } else {
            gain_to_db(linear)
        }
    }
}

impl Default for Crossfader {
    fn default() -> Self {
        Self::new(SILENCE_FLOOR_DB)
    }
}
