//! Session configuration, persisted as YAML
//!
//! Loading is tolerant: a missing or unreadable file logs a warning and
//! yields the defaults, so a stale config never blocks startup.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::chop::DEFAULT_CHOP_UNIT_BEATS;
use crate::types::SILENCE_FLOOR_DB;

const CONFIG_DIR: &str = "chopdeck";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start the transport as soon as material loads
    pub autoplay: bool,
    /// Minimum chop hold, in beats of the effective tempo
    pub chop_unit_beats: f64,
    /// Gain floor applied to the quiet side of the crossfade
    pub crossfade_floor_db: f32,
    /// Directory the host's browse dialog opens in. The dialog lives
    /// outside this crate; the field only persists the choice for it.
    pub library_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            chop_unit_beats: DEFAULT_CHOP_UNIT_BEATS,
            crossfade_floor_db: SILENCE_FLOOR_DB,
            library_dir: None,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config, falling back to defaults on any failure.
pub fn load_config() -> SessionConfig {
    let Some(path) = config_path() else {
        warn!("no config directory on this platform, using defaults");
        return SessionConfig::default();
    };
    if !path.exists() {
        info!("no config at {}, using defaults", path.display());
        return SessionConfig::default();
    }
    match fs::read_to_string(&path) {
        Ok(text) => match serde_yaml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to parse {}: {}, using defaults", path.display(), e);
                SessionConfig::default()
            }
        },
        Err(e) => {
            warn!("failed to read {}: {}, using defaults", path.display(), e);
            SessionConfig::default()
        }
    }
}

/// Write the config back to disk, creating the directory if needed.
pub fn save_config(config: &SessionConfig) -> anyhow::Result<()> {
    let path = config_path().context("no config directory on this platform")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = serde_yaml::to_string(config).context("serializing config")?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    info!("saved config to {}", path.display());
    Ok(())
}
