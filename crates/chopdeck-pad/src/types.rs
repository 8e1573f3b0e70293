//! Decoded gamepad event vocabulary
//!
//! These types abstract over the physical controller protocol: the
//! host's input driver decodes raw reports into [`PadEvent`]s, and the
//! mapping layer turns those into session commands. Nothing here knows
//! about HID descriptors or evdev codes.

use serde::{Deserialize, Serialize};

/// Digital controls on a standard dual-stick pad
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadButton {
    /// Bottom face button (A on Xbox layouts, Cross on PlayStation)
    South,
    /// Right face button
    East,
    /// Left face button
    West,
    /// Top face button
    North,
    LeftBumper,
    RightBumper,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Select,
}

/// Analog controls on a standard dual-stick pad
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

/// One decoded controller interaction
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PadEvent {
    ButtonDown(PadButton),
    ButtonUp(PadButton),
    /// Axis moved; sticks report [-1, 1], triggers [0, 1]
    AxisMoved(PadAxis, f32),
}

impl PadAxis {
    /// Whether this axis is a unipolar trigger rather than a stick axis
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::LeftTrigger | Self::RightTrigger)
    }
}
