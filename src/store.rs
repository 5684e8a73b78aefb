use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::settings::ScannerSettings;

/// JSON-file home of [`ScannerSettings`]. A kiosk without the file runs on
/// defaults, which match the deployed page.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ScannerSettings> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(ScannerSettings::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading settings from {}", self.path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing settings json in {}", self.path.display()))
    }

    pub fn save(&self, settings: &ScannerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing settings to {}", self.path.display()))
    }
}
