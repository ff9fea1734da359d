//! JSON Settings Store
//!
//! Handles reading and writing the analysis settings file. Keys absent from
//! the file fall back to their defaults. A file that cannot be parsed or
//! holds out-of-range values is left on disk and defaults are used until the
//! settings are next saved.

use std::fs;
use std::path::{Path, PathBuf};

use contract_review_core::AnalysisConfig;

use crate::models::settings::SettingsUpdate;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir};

/// Settings store backed by a JSON file
#[derive(Debug)]
pub struct SettingsStore {
    config_path: PathBuf,
    config: AnalysisConfig,
}

impl SettingsStore {
    /// Open the store at `~/.contract-review/config.json`
    pub fn new() -> AppResult<Self> {
        Self::open(config_path()?)
    }

    /// Open the store at an explicit path, loading existing settings or
    /// writing defaults
    pub fn open(config_path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = config_path.into();
        if let Some(parent) = config_path.parent() {
            ensure_dir(parent)?;
        }

        let config = if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => config,
                Err(AppError::Io(e)) => return Err(AppError::Io(e)),
                Err(e) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        error = %e,
                        "Invalid settings file, using defaults"
                    );
                    AnalysisConfig::default()
                }
            }
        } else {
            let default_config = AnalysisConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        tracing::debug!(path = %config_path.display(), "Settings loaded");

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load settings from a file
    fn load_from_file(path: &Path) -> AppResult<AnalysisConfig> {
        let content = fs::read_to_string(path)?;
        Ok(AnalysisConfig::from_json(&content)?)
    }

    /// Save settings to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AnalysisConfig) -> AppResult<()> {
        let content = config.to_json_pretty()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current settings
    pub fn get_config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Get a clone of the current settings
    pub fn get_config_clone(&self) -> AnalysisConfig {
        self.config.clone()
    }

    /// Update the settings with a partial update.
    ///
    /// An update that fails validation is not applied.
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AnalysisConfig> {
        let mut candidate = self.config.clone();
        update.apply_to(&mut candidate);
        Self::save_to_file(&self.config_path, &candidate)?;
        self.config = candidate;
        Ok(self.config.clone())
    }

    /// Save the current settings to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reload settings from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = AnalysisConfig::default();
        self.save()?;
        Ok(())
    }
}
