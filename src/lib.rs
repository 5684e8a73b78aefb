//! Debounced QR membership-card scan validation.
//!
//! `cardgate` drives the scan flow of a door-side membership scanner: a
//! camera decoder reports frames, accepted payloads are checked against
//! the membership site through its proxy endpoint, and the operator gets
//! one message, one colour flash and one cue sound per settled check. A
//! `ready`/`last_code` gate keeps the card held in front of the camera
//! from being checked over and over, with a four second quiet period
//! before the same card may trigger again.
//!
//! [`controller::ScanController`] owns the flow; the camera, the remote
//! check, the result panel and the cue sounds are all trait seams, so
//! the whole flow runs under test against scripted stand-ins.

pub mod audio;
pub mod controller;
pub mod decoder;
pub mod model;
pub mod panel;
pub mod settings;
pub mod store;
pub mod validator;

pub use audio::{ConsoleSound, ScanSounds, SoundPlayer};
pub use controller::ScanController;
pub use decoder::{
    CameraFacing, DecodeReport, Decoder, DecoderConfig, DetectionBox, ScriptedDecoder,
};
pub use model::{FeedbackTone, ScanFeedback, ScanOutcome, ScanPhase, ScanSession};
pub use panel::{ConsolePanel, ResultPanel};
pub use settings::ScannerSettings;
pub use store::SettingsStore;
pub use validator::{CardValidator, ProxyValidator, ValidateError};
