//! Button-to-action mapping
//!
//! Buttons are remappable through a YAML profile; the analog routing
//! (sticks to the effect mappers, right trigger to the brake) is fixed
//! because the session's axis vocabulary is positional, not semantic.
//!
//! The chop action is the one stateful mapping: its button produces a
//! press command on the down edge and a release command on the up
//! edge, so the gesture machine sees the full hold.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use chopdeck_core::command::SessionCommand;
use chopdeck_core::types::ControlAxis;

use crate::normalize::{apply_deadzone, DEFAULT_DEADZONE};
use crate::types::{PadAxis, PadButton, PadEvent};

const PROFILE_DIR: &str = "chopdeck";
const PROFILE_FILE: &str = "pad.yaml";

/// Actions a button can be mapped to
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PadAction {
    /// Chop gesture (press and release both forwarded)
    Chop,
    /// Start the transport
    Start,
    /// Stop the transport
    Stop,
    /// Jump to a tempo ratio over the base
    TempoRatio { ratio: f64 },
    /// Throw the crossfader to an absolute position
    Crossfade { position: f32 },
}

/// A controller layout: button assignments plus stick tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PadProfile {
    pub buttons: HashMap<PadButton, PadAction>,
    /// Center deadzone applied to stick axes before mapping
    pub stick_deadzone: f32,
}

impl Default for PadProfile {
    fn default() -> Self {
        let mut buttons = HashMap::new();
        buttons.insert(PadButton::South, PadAction::Chop);
        buttons.insert(PadButton::Start, PadAction::Start);
        buttons.insert(PadButton::Select, PadAction::Stop);
        // Dpad walks the common tempo presets
        buttons.insert(PadButton::DpadDown, PadAction::TempoRatio { ratio: 0.5 });
        buttons.insert(PadButton::DpadLeft, PadAction::TempoRatio { ratio: 0.75 });
        buttons.insert(PadButton::DpadUp, PadAction::TempoRatio { ratio: 1.0 });
        buttons.insert(PadButton::DpadRight, PadAction::TempoRatio { ratio: 1.25 });
        // Bumpers throw the fader hard to either track
        buttons.insert(PadButton::LeftBumper, PadAction::Crossfade { position: 0.0 });
        buttons.insert(PadButton::RightBumper, PadAction::Crossfade { position: 1.0 });
        Self {
            buttons,
            stick_deadzone: DEFAULT_DEADZONE,
        }
    }
}

impl PadProfile {
    /// Translate one decoded event into a session command.
    ///
    /// Returns `None` for unmapped buttons, axis noise inside the
    /// deadzone is forwarded as zero so a released stick parks the
    /// effect parameters.
    pub fn translate(&self, event: PadEvent) -> Option<SessionCommand> {
        match event {
            PadEvent::ButtonDown(button) => match self.buttons.get(&button)? {
                PadAction::Chop => Some(SessionCommand::ChopPress),
                PadAction::Start => Some(SessionCommand::Start),
                PadAction::Stop => Some(SessionCommand::Stop),
                PadAction::TempoRatio { ratio } => {
                    Some(SessionCommand::ApplyTempoRatio(*ratio))
                }
                PadAction::Crossfade { position } => {
                    Some(SessionCommand::SetCrossfade(*position))
                }
            },
            PadEvent::ButtonUp(button) => match self.buttons.get(&button)? {
                PadAction::Chop => Some(SessionCommand::ChopRelease),
                _ => None,
            },
            PadEvent::AxisMoved(axis, value) => {
                let (axis, value) = self.route_axis(axis, value)?;
                Some(SessionCommand::Axis { axis, value })
            }
        }
    }

    fn route_axis(&self, axis: PadAxis, value: f32) -> Option<(ControlAxis, f32)> {
        let target = match axis {
            PadAxis::LeftStickX => ControlAxis::LeftStickX,
            PadAxis::LeftStickY => ControlAxis::LeftStickY,
            PadAxis::RightStickX => ControlAxis::RightStickX,
            PadAxis::RightStickY => ControlAxis::RightStickY,
            PadAxis::RightTrigger => ControlAxis::BrakeTrigger,
            PadAxis::LeftTrigger => return None,
        };
        let value = if axis.is_trigger() {
            value.clamp(0.0, 1.0)
        } else {
            apply_deadzone(value.clamp(-1.0, 1.0), self.stick_deadzone)
        };
        Some((target, value))
    }
}

fn profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PROFILE_DIR).join(PROFILE_FILE))
}

/// Load the pad profile, falling back to the default layout.
pub fn load_profile() -> PadProfile {
    let Some(path) = profile_path() else {
        warn!("no config directory on this platform, using default layout");
        return PadProfile::default();
    };
    if !path.exists() {
        info!("no pad profile at {}, using default layout", path.display());
        return PadProfile::default();
    }
    match fs::read_to_string(&path) {
        Ok(text) => match serde_yaml::from_str(&text) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("failed to parse {}: {}, using default layout", path.display(), e);
                PadProfile::default()
            }
        },
        Err(e) => {
            warn!("failed to read {}: {}, using default layout", path.display(), e);
            PadProfile::default()
        }
    }
}

/// Write the pad profile back to disk.
pub fn save_profile(profile: &PadProfile) -> anyhow::Result<()> {
    let path = profile_path().context("no config directory on this platform")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = serde_yaml::to_string(profile).context("serializing pad profile")?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    info!("saved pad profile to {}", path.display());
    Ok(())
}
