//! Axis normalization for decoded pad values
//!
//! Input drivers hand over raw axis readings in whatever range the
//! device reports (signed 16-bit for sticks, unsigned 8-bit for most
//! triggers). This module converts them to the [-1, 1] / [0, 1] ranges
//! the mapping layer expects and applies a center deadzone so idle
//! sticks do not drip noise into the effect mappers.

/// Default stick deadzone as a fraction of full deflection
pub const DEFAULT_DEADZONE: f32 = 0.08;

/// Normalize a signed 16-bit stick reading to [-1, 1]
pub fn stick_from_i16(raw: i16) -> f32 {
    // i16::MIN maps slightly past -1.0; clamp rather than special-case
    (f32::from(raw) / f32::from(i16::MAX)).clamp(-1.0, 1.0)
}

/// Normalize an unsigned 8-bit trigger reading to [0, 1]
pub fn trigger_from_u8(raw: u8) -> f32 {
    f32::from(raw) / 255.0
}

/// Apply a center deadzone, rescaling so the usable range still spans
/// the full output range
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    let deadzone = deadzone.clamp(0.0, 0.99);
    let magnitude = value.abs();
    if magnitude < deadzone {
        return 0.0;
    }
    let rescaled = (magnitude - deadzone) / (1.0 - deadzone);
    rescaled.min(1.0).copysign(value)
}
