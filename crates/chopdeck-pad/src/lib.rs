//! Gamepad front end for chopdeck
//!
//! Consumes already-decoded controller events (buttons, sticks,
//! triggers) and translates them into session commands through a
//! serde-configurable mapping profile. Physical protocol decoding
//! (evdev, HID, whatever the host uses) stays outside this crate;
//! the boundary is the [`PadEvent`] vocabulary.

pub mod mapping;
pub mod normalize;
pub mod types;

pub use mapping::{load_profile, save_profile, PadAction, PadProfile};
pub use types::{PadAxis, PadButton, PadEvent};
