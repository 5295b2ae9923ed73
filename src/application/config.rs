use crate::domain::PickerOptions;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct Config {
    pub options_path: PathBuf,
    pub overrides: PickerOptions,
    pub theme: String,
}

impl Config {
    /// `DATEPICKER_OPTIONS` points at a JSON overrides file, defaulting to
    /// `<config dir>/datepicker/options.json`. `DATEPICKER_THEME` picks the
    /// terminal theme.
    pub fn from_env() -> Result<Self> {
        let options_path = std::env::var("DATEPICKER_OPTIONS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("datepicker")
                    .join("options.json")
            });

        let theme = std::env::var("DATEPICKER_THEME").unwrap_or_else(|_| "dark".to_string());
        let overrides = Self::load_overrides(&options_path)?;

        Ok(Self {
            options_path,
            overrides,
            theme,
        })
    }

    /// A missing file means no overrides; an unreadable or malformed one is an error.
    pub fn load_overrides(path: &Path) -> Result<PickerOptions> {
        if !path.exists() {
            log::debug!("No options file at {}, using defaults", path.display());
            return Ok(PickerOptions::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        let overrides = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse options file {}", path.display()))?;
        log::debug!("Loaded options from {}", path.display());
        Ok(overrides)
    }
}
