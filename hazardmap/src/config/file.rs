//! Configuration file handling for ~/.hazardmap/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::measure::ReachableAreaConfig;
use crate::search::SearchConfig;
use crate::tile::SamplerConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.hazardmap/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.hazardmap/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    /// Search configuration built from `[search]`.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_threshold(self.search.threshold)
            .with_distance(self.search.distance)
    }

    /// Sampler configuration built from `[hazard]`.
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig::default()
            .with_max_zoom(self.hazard.max_sample_zoom)
            .with_tile_size(self.hazard.tile_size)
    }

    /// Reachable-area configuration built from `[reachable_area]`.
    pub fn reachable_config(&self) -> ReachableAreaConfig {
        ReachableAreaConfig::default()
            .with_min_zoom(self.reachable_area.min_zoom)
            .with_circle_steps(self.reachable_area.circle_steps)
    }
}

/// Get the path to the config directory (~/.hazardmap).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hazardmap")
}

/// Get the path to the config file (~/.hazardmap/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.search.threshold, DEFAULT_SEARCH_THRESHOLD);
        assert_eq!(config.search.distance, DEFAULT_SEARCH_DISTANCE);
        assert_eq!(config.hazard.max_sample_zoom, 17);
        assert_eq!(config.hazard.tile_size, 256);
        assert!(config.hazard.legend_file.is_none());
        assert_eq!(config.reachable_area.min_zoom, 13.0);
        assert_eq!(config.reachable_area.circle_steps, 32);
        assert!(config.data.shelter_files.is_empty());
        assert!(config.logging.file.ends_with("hazardmap.log"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_runtime_configs() {
        let mut config = ConfigFile::default();
        config.search.threshold = 0.4;
        config.hazard.max_sample_zoom = 16;
        config.reachable_area.circle_steps = 64;

        assert_eq!(config.search_config().threshold(), 0.4);
        assert_eq!(config.sampler_config().max_zoom(), 16);
        assert_eq!(config.sampler_config().tile_size(), 256);
        assert_eq!(config.reachable_config().circle_steps(), 64);
    }
}
