//! Continuous parameter mappers - stick axes to effect parameters
//!
//! Each stick keeps its last x/y readings and maps the distance from
//! center onto a secondary parameter. The two effects deliberately use
//! different curves and ceilings: flanger width is the squared
//! normalized distance capped at 0.99, phaser feedback is the raw
//! distance capped at 0.70. They are not interchangeable.
//!
//! Axis updates are O(1), never block, and carry no ordering dependency
//! between the x and y updates of one stick.

use crate::backend::{AudioBackend, EffectParam};

/// Multiplier from a [-1, 1] axis onto rate/depth style parameters
pub const STICK_PARAM_SCALE: f32 = 10.0;

/// Ceiling for the flanger width curve
pub const FLANGER_WIDTH_CEILING: f32 = 0.99;

/// Ceiling for the phaser feedback curve
pub const PHASER_FEEDBACK_CEILING: f32 = 0.70;

/// Time constant of the brake spring-back ramp, in milliseconds
const BRAKE_SPRING_TAU_MS: f64 = 150.0;

/// Bend below this is treated as fully released
const BRAKE_REST_EPSILON: f32 = 0.005;

/// Last known x/y of one stick with derived distance measures
#[derive(Debug, Clone, Copy, Default)]
pub struct StickState {
    x: f32,
    y: f32,
}

impl StickState {
    /// Update the x reading, clamped to [-1, 1]
    pub fn set_x(&mut self, value: f32) {
        self.x = value.clamp(-1.0, 1.0);
    }

    /// Update the y reading, clamped to [-1, 1]
    pub fn set_y(&mut self, value: f32) {
        self.y = value.clamp(-1.0, 1.0);
    }

    /// Euclidean distance from center, in [0, sqrt(2)]
    pub fn distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance normalized so full diagonal deflection maps to 1.0
    pub fn normalized_distance(&self) -> f32 {
        self.distance() / std::f32::consts::SQRT_2
    }
}

/// Left stick -> flanger speed/depth, width from squared distance
#[derive(Debug, Clone, Copy, Default)]
pub struct FlangerMapper {
    stick: StickState,
}

impl FlangerMapper {
    /// Handle a left-stick x move
    pub fn on_x<B: AudioBackend + ?Sized>(&mut self, value: f32, backend: &mut B) {
        self.stick.set_x(value);
        backend.set_effect_param(EffectParam::FlangerSpeed, value * STICK_PARAM_SCALE);
        backend.set_effect_param(EffectParam::FlangerWidth, self.width());
    }

    /// Handle a left-stick y move
    pub fn on_y<B: AudioBackend + ?Sized>(&mut self, value: f32, backend: &mut B) {
        self.stick.set_y(value);
        backend.set_effect_param(EffectParam::FlangerDepth, value * STICK_PARAM_SCALE);
        backend.set_effect_param(EffectParam::FlangerWidth, self.width());
    }

    /// Width from the squared normalized distance, capped at 0.99
    pub fn width(&self) -> f32 {
        let n = self.stick.normalized_distance();
        (n * n).clamp(0.0, FLANGER_WIDTH_CEILING)
    }
}

/// Right stick -> phaser rate/depth, feedback from linear distance
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaserMapper {
    stick: StickState,
}

impl PhaserMapper {
    /// Handle a right-stick x move
    pub fn on_x<B: AudioBackend + ?Sized>(&mut self, value: f32, backend: &mut B) {
        self.stick.set_x(value);
        backend.set_effect_param(EffectParam::PhaserRate, value * STICK_PARAM_SCALE);
        backend.set_effect_param(EffectParam::PhaserFeedback, self.feedback());
    }

    /// Handle a right-stick y move
    pub fn on_y<B: AudioBackend + ?Sized>(&mut self, value: f32, backend: &mut B) {
        self.stick.set_y(value);
        backend.set_effect_param(EffectParam::PhaserDepth, value * STICK_PARAM_SCALE);
        backend.set_effect_param(EffectParam::PhaserFeedback, self.feedback());
    }

    /// Feedback from the raw distance, capped at 0.70
    pub fn feedback(&self) -> f32 {
        self.stick.distance().clamp(0.0, PHASER_FEEDBACK_CEILING)
    }
}

/// Vinyl brake driven by an analog trigger
///
/// Holding the trigger bends the playback rate down; letting go starts
/// a spring-back ramp that the advisory tick advances until the bend
/// decays to rest. The ramp is a feel effect, not a correctness path.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrakeMapper {
    /// Kept in f32 like the trigger reading; widened only at the sink
    bend: f32,
    springing: bool,
}

impl BrakeMapper {
    /// Handle a trigger reading in [0, 1]
    pub fn on_trigger<B: AudioBackend + ?Sized>(&mut self, value: f32, backend: &mut B) {
        let value = value.clamp(0.0, 1.0);
        if value < 0.01 && self.bend > 0.0 {
            // Trigger returned to rest with a bend active: spring back
            self.springing = true;
        } else if value >= 0.01 {
            self.springing = false;
            self.bend = value;
            backend.set_rate_bend(f64::from(self.bend));
        }
    }

    /// Advance the spring-back ramp by `dt_ms`
    pub fn tick<B: AudioBackend + ?Sized>(&mut self, dt_ms: f64, backend: &mut B) {
        if !self.springing {
            return;
        }
        self.bend *= (-dt_ms / BRAKE_SPRING_TAU_MS).exp() as f32;
        if self.bend < BRAKE_REST_EPSILON {
            self.bend = 0.0;
            self.springing = false;
        }
        backend.set_rate_bend(f64::from(self.bend));
    }

    /// Current rate bend (0.0 = none)
    pub fn bend(&self) -> f32 {
        self.bend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testutil::RecordingBackend;

    #[test]
    fn test_flanger_width_squared_curve() {
        let mut backend = RecordingBackend::default();
        let mut flanger = FlangerMapper::default();

        flanger.on_x(1.0, &mut backend);
        flanger.on_y(1.0, &mut backend);

        // Full diagonal: normalized distance 1.0, squared 1.0, capped at 0.99
        assert_eq!(flanger.width(), FLANGER_WIDTH_CEILING);
        assert_eq!(
            backend.last_param(EffectParam::FlangerWidth),
            Some(FLANGER_WIDTH_CEILING)
        );
        assert_eq!(
            backend.last_param(EffectParam::FlangerSpeed),
            Some(STICK_PARAM_SCALE)
        );

        // Half deflection on one axis: (0.5/sqrt(2))^2 = 0.125
        let mut flanger = FlangerMapper::default();
        flanger.on_x(0.5, &mut backend);
        assert!((flanger.width() - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_phaser_feedback_linear_curve() {
        let mut backend = RecordingBackend::default();
        let mut phaser = PhaserMapper::default();

        phaser.on_x(0.5, &mut backend);
        // Linear distance, not squared
        assert!((phaser.feedback() - 0.5).abs() < 1e-6);

        phaser.on_y(1.0, &mut backend);
        // Distance sqrt(1.25) ~ 1.118, capped at 0.70
        assert_eq!(phaser.feedback(), PHASER_FEEDBACK_CEILING);
        assert_eq!(
            backend.last_param(EffectParam::PhaserFeedback),
            Some(PHASER_FEEDBACK_CEILING)
        );
    }

    #[test]
    fn test_axis_order_independence() {
        let mut backend = RecordingBackend::default();

        let mut xy = FlangerMapper::default();
        xy.on_x(0.3, &mut backend);
        xy.on_y(-0.7, &mut backend);

        let mut yx = FlangerMapper::default();
        yx.on_y(-0.7, &mut backend);
        yx.on_x(0.3, &mut backend);

        assert_eq!(xy.width(), yx.width());
    }

    #[test]
    fn test_axis_input_clamped() {
        let mut backend = RecordingBackend::default();
        let mut phaser = PhaserMapper::default();
        phaser.on_x(5.0, &mut backend);
        phaser.on_y(-5.0, &mut backend);
        // Readings clamp to the unit square before distance is derived
        assert_eq!(phaser.feedback(), PHASER_FEEDBACK_CEILING);
    }

    #[test]
    fn test_brake_spring_back() {
        let mut backend = RecordingBackend::default();
        let mut brake = BrakeMapper::default();

        brake.on_trigger(0.8, &mut backend);
        assert_eq!(brake.bend(), 0.8);
        // The sink sees the f32 reading widened, nothing else
        assert!((backend.rate_bends.last().unwrap() - 0.8).abs() < 1e-6);

        // Release: no immediate write, the ramp takes over
        brake.on_trigger(0.0, &mut backend);
        assert_eq!(brake.bend(), 0.8);

        let mut ticks = 0;
        while brake.bend() > 0.0 {
            brake.tick(33.0, &mut backend);
            ticks += 1;
            assert!(ticks < 100, "spring never settled");
        }
        assert_eq!(backend.rate_bends.last(), Some(&0.0));
    }

    #[test]
    fn test_brake_tick_idle_is_silent() {
        let mut backend = RecordingBackend::default();
        let mut brake = BrakeMapper::default();
        brake.tick(33.0, &mut backend);
        assert!(backend.rate_bends.is_empty());
    }
}
