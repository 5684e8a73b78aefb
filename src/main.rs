//! Console front end for the scanner: decode reports come from stdin
//! instead of a camera. A line with text is a decoded payload, an empty
//! line is a frame with nothing in it, EOF ends the scan.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cardgate::{
    ConsolePanel, ConsoleSound, DecodeReport, Decoder, DecoderConfig, ProxyValidator,
    ScanController, ScanSounds, SettingsStore,
};

const SETTINGS_PATH: &str = "cardgate.json";

/// Stand-in camera that reads decode reports off stdin.
struct StdinDecoder {
    task: Option<JoinHandle<()>>,
}

impl StdinDecoder {
    fn new() -> Self {
        Self { task: None }
    }
}

impl Decoder for StdinDecoder {
    fn start(
        &mut self,
        config: &DecoderConfig,
        reports: mpsc::Sender<DecodeReport>,
    ) -> Result<()> {
        debug!(fps = config.target_fps, "stdin decoder standing in for the camera");
        self.task = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let report = match line.trim() {
                    "" => DecodeReport::NoDetection,
                    payload => DecodeReport::Decoded(payload.to_string()),
                };
                if reports.send(report).await.is_err() {
                    break;
                }
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cardgate=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = SettingsStore::new(SETTINGS_PATH).load()?;
    let validator = ProxyValidator::new(&settings.check_endpoint)
        .context("configuring the card check endpoint")?;

    let mut controller = ScanController::new(
        Box::new(StdinDecoder::new()),
        Arc::new(validator),
        ScanSounds::new(
            Box::new(ConsoleSound::new("positive beep")),
            Box::new(ConsoleSound::new("negative beep")),
        ),
        Box::new(ConsolePanel::default()),
        settings,
    );
    controller.run().await
}
