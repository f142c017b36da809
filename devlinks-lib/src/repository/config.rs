use std::{fs, io, path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fs::{config_dir, data_dir};

const FILE_NAME: &str = "core.toml";

/// Handle to the backend's core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access configuration: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The backend's core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Shortest password accepted when creating an account
    min_password_length: usize,
    /// Where uploaded files are kept. Defaults to a folder in the data directory.
    storage_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            storage_dir: None,
        }
    }
}

impl CoreConfig {
    /// Load the configuration file, writing out the defaults if there isn't one yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_dir()?.join(FILE_NAME);

        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)?;

        Ok(())
    }

    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    pub fn storage_dir(&self) -> io::Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("storage")),
        }
    }

    /// Configuration for tests, storing files in a fresh temporary directory.
    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self {
            storage_dir: Some(
                tempfile::tempdir()
                    .expect("temporary directory must be creatable")
                    .keep(),
            ),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::CoreConfig;

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: CoreConfig = toml::from_str("min_password_length = 10").unwrap();

        assert_eq!(cfg.min_password_length(), 10);
        assert_eq!(cfg.storage_dir, None);
    }
}
