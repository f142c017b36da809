use std::{fs, io, sync::Arc};

use devlinks_lib::fs::config_dir;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{components::navbar::Section, config::theme::Theme};

mod theme;

const FILE_NAME: &str = "gui.toml";

/// Handle to the GUI configuration
pub type Cfg = Arc<RwLock<GuiConfig>>;

/// Front end preferences, serialized to TOML.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
    /// Editor section that was open last
    pub section: Section,
}

impl GuiConfig {
    /// Load the configuration, falling back to the defaults if it is missing or unreadable.
    pub fn load() -> Self {
        let contents = config_dir().and_then(|dir| fs::read_to_string(dir.join(FILE_NAME)));

        match contents {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(%err, "Ignoring invalid GUI configuration");
                Self::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save();
                cfg
            }
            Err(err) => {
                warn!(%err, "Failed to read GUI configuration");
                Self::default()
            }
        }
    }

    /// Write the configuration out. Failures are logged, the GUI keeps working without it.
    pub fn save(&self) {
        let result = toml::to_string_pretty(self)
            .map_err(io::Error::other)
            .and_then(|contents| fs::write(config_dir()?.join(FILE_NAME), contents));

        if let Err(err) = result {
            warn!(%err, "Failed to save GUI configuration");
        }
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}
