use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One report per processed camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeReport {
    /// A machine-readable code was read out of the frame.
    Decoded(String),
    /// Nothing decodable in view (the code left the frame, or never was
    /// there). Fires continuously at the capture rate.
    NoDetection,
}

/// Which camera the decoder should prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Rear camera, pointing away from the operator.
    Environment,
    /// Front camera.
    User,
}

/// Detection box the decoder scans within, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub width: u32,
    pub height: u32,
}

/// Capture configuration handed to [`Decoder::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub facing: CameraFacing,
    pub target_fps: u32,
    pub detection_box: DetectionBox,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Environment,
            target_fps: 10,
            detection_box: DetectionBox {
                width: 1000,
                height: 1000,
            },
        }
    }
}

/// The continuous decode source. In deployment this wraps a camera feed and
/// a QR library; the controller only ever sees the report stream.
pub trait Decoder: Send {
    /// Begin capture, delivering one [`DecodeReport`] per processed frame
    /// on `reports`. Dropping the sender ends the scan session.
    fn start(&mut self, config: &DecoderConfig, reports: mpsc::Sender<DecodeReport>) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}

/// Deterministic decoder that replays a fixed script of delayed reports,
/// then hangs up. Used by the demo wiring and the integration tests.
pub struct ScriptedDecoder {
    script: Vec<(Duration, DecodeReport)>,
    task: Option<JoinHandle<()>>,
}

impl ScriptedDecoder {
    pub fn new(script: Vec<(Duration, DecodeReport)>) -> Self {
        Self { script, task: None }
    }
}

impl Decoder for ScriptedDecoder {
    fn start(&mut self, _config: &DecoderConfig, reports: mpsc::Sender<DecodeReport>) -> Result<()> {
        let script = std::mem::take(&mut self.script);
        self.task = Some(tokio::spawn(async move {
            for (delay, report) in script {
                tokio::time::sleep(delay).await;
                if reports.send(report).await.is_err() {
                    return;
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
