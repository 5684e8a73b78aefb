use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decoder::DecoderConfig;

/// Everything the scanner page hard-coded, as one persisted document.
/// Defaults reproduce the deployed page exactly, so a missing settings
/// file changes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Same-origin relay that forwards the card check.
    pub check_endpoint: String,
    /// Phrase whose presence in the check document means "valid".
    pub validity_marker: String,
    /// Quiet period before an identical payload is accepted again.
    pub clear_delay_ms: u64,
    /// How long the background flash cue stays up.
    pub flash_duration_ms: u64,
    pub decoder: DecoderConfig,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            check_endpoint: "http://127.0.0.1:8000/proxy-card-check".to_string(),
            validity_marker: "This membership card is valid".to_string(),
            clear_delay_ms: 4000,
            flash_duration_ms: 600,
            decoder: DecoderConfig::default(),
        }
    }
}

impl ScannerSettings {
    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }
}
