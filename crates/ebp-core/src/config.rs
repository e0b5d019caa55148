use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::ReportLayout;
use crate::scoring::{DEFAULT_SCORING_ENDPOINT, DEFAULT_TIMEOUT};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory (~/.local/share/ebp)
    pub data_dir: PathBuf,
    /// User settings file
    pub settings_file: PathBuf,
    /// Default directory for exported reports
    pub export_dir: PathBuf,
}

impl Config {
    /// Load configuration or use defaults
    pub fn load_or_default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ebp");

        Self {
            settings_file: data_dir.join("settings.json"),
            export_dir: data_dir.join("exports"),
            data_dir,
        }
    }

    /// Configuration rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            settings_file: data_dir.join("settings.json"),
            export_dir: data_dir.join("exports"),
            data_dir,
        }
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }
}

/// User settings, persisted as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scoring_endpoint: String,
    pub request_timeout_secs: u64,
    /// Score column labels for exported reports. Must match the rubric.
    pub export_columns: Option<Vec<String>>,
    pub include_summary_columns: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring_endpoint: DEFAULT_SCORING_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            export_columns: None,
            include_summary_columns: false,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to load settings: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read settings file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse settings JSON")?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the settings without using them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.scoring_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("scoring_endpoint is empty".to_string()));
        }
        self.report_layout().map(|_| ())
    }

    /// Report layout described by these settings.
    pub fn report_layout(&self) -> Result<ReportLayout, ConfigError> {
        match &self.export_columns {
            Some(columns) => ReportLayout::with_columns(columns, self.include_summary_columns),
            None => Ok(ReportLayout::new(self.include_summary_columns)),
        }
    }
}
