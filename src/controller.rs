//! The scan/validate/debounce state machine.
//!
//! Decoder reports and internal events (validation settlements, timer
//! expiries) are serialized onto one event loop, so the session fields
//! need no locking: the `ready`/`last_code` gate is the only concurrency
//! control the flow has, or needs. Validation runs as a spawned task, so
//! the loop never blocks on the network: while a request is out, decode
//! successes stay gated but no-detection reports still reopen the gate.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audio::ScanSounds;
use crate::decoder::{DecodeReport, Decoder};
use crate::model::{ScanFeedback, ScanOutcome, ScanPhase, ScanSession};
use crate::panel::ResultPanel;
use crate::settings::ScannerSettings;
use crate::validator::CardValidator;

const CHANNEL_DEPTH: usize = 32;

/// Events looped back onto the controller by its own spawned work.
#[derive(Debug)]
enum LoopEvent {
    Settled {
        payload: String,
        outcome: ScanOutcome,
    },
    ClearLastCode,
    FlashExpired,
}

/// Owns the scan session and every collaborator seam; see the module docs
/// for the concurrency story.
pub struct ScanController {
    session: ScanSession,
    decoder: Box<dyn Decoder>,
    validator: Arc<dyn CardValidator>,
    sounds: ScanSounds,
    panel: Box<dyn ResultPanel>,
    settings: ScannerSettings,
    events_tx: mpsc::Sender<LoopEvent>,
    // Taken by the first `run`; its absence is the "already started" guard.
    events_rx: Option<mpsc::Receiver<LoopEvent>>,
}

impl ScanController {
    pub fn new(
        decoder: Box<dyn Decoder>,
        validator: Arc<dyn CardValidator>,
        sounds: ScanSounds,
        panel: Box<dyn ResultPanel>,
        settings: ScannerSettings,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_DEPTH);
        Self {
            session: ScanSession::new(),
            decoder,
            validator,
            sounds,
            panel,
            settings,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.session.phase()
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Prime the cue sounds, start capture, then pump events until the
    /// decoder hangs up its report channel (the page-navigation analog).
    /// Calling `run` on a controller that already ran is a no-op.
    pub async fn run(&mut self) -> Result<()> {
        let Some(mut events_rx) = self.events_rx.take() else {
            debug!("scanner already started; ignoring repeat run");
            return Ok(());
        };

        let (reports_tx, mut reports_rx) = mpsc::channel(CHANNEL_DEPTH);
        // Audio first: capture must not start until both cues are primed.
        self.sounds.prime_all();
        if let Err(err) = self.decoder.start(&self.settings.decoder, reports_tx) {
            // A failed start leaves the scanner restartable.
            self.events_rx = Some(events_rx);
            return Err(err);
        }
        self.panel.scanner_started();
        info!(phase = self.session.phase().label(), "scanner started");

        loop {
            tokio::select! {
                report = reports_rx.recv() => match report {
                    Some(DecodeReport::Decoded(payload)) => self.on_decode_success(payload),
                    Some(DecodeReport::NoDetection) => self.on_decode_failure(),
                    None => {
                        // Capture ended: settle whatever already looped
                        // back, then stop. Timers still pending are moot.
                        while let Ok(event) = events_rx.try_recv() {
                            self.on_event(event);
                        }
                        break;
                    }
                },
                Some(event) = events_rx.recv() => self.on_event(event),
            }
        }

        if let Err(err) = self.decoder.stop() {
            warn!(error = %err, "decoder did not stop cleanly");
        }
        info!("decoder hung up; scanner finished");
        Ok(())
    }

    /// A frame decoded to `payload`. Gated: only a non-empty payload that
    /// differs from the code still in view triggers a validation, and only
    /// while the gate is open. A suppressed report is rate-limiting, not
    /// an error.
    fn on_decode_success(&mut self, payload: String) {
        if !self.session.accepts(&payload) {
            debug!(payload = %payload, "decode suppressed by scan gate");
            return;
        }
        self.session.note_trigger(&payload);
        debug!(payload = %payload, "validation dispatched");

        let validator = Arc::clone(&self.validator);
        let marker = self.settings.validity_marker.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = match validator.fetch_check(&payload).await {
                Ok(body) => ScanOutcome::classify(&body, &marker),
                Err(err) => {
                    debug!(payload = %payload, error = %err, "card check request failed");
                    ScanOutcome::NetworkError
                }
            };
            // The loop owning the receiver may be gone; nothing to do then.
            let _ = events.send(LoopEvent::Settled { payload, outcome }).await;
        });
    }

    /// A frame with nothing decodable in it. Reopens the gate so a
    /// different code can trigger immediately; `last_code` keeps the same
    /// code suppressed until its quiet period ends.
    fn on_decode_failure(&mut self) {
        self.session.note_no_detection();
    }

    fn on_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Settled { payload, outcome } => self.on_settled(payload, outcome),
            LoopEvent::ClearLastCode => {
                self.session.clear_last_code();
                debug!("quiet period over; identical payloads accepted again");
            }
            LoopEvent::FlashExpired => self.panel.clear_flash(),
        }
    }

    /// One validation settled. Exactly one message, one flash, one sound,
    /// whatever the outcome; then the quiet-period timer is armed.
    fn on_settled(&mut self, payload: String, outcome: ScanOutcome) {
        info!(payload = %payload, outcome = ?outcome, "scan settled");
        self.session.note_settled();

        let feedback = ScanFeedback::for_outcome(outcome);
        self.panel.render(&feedback);
        self.panel.flash(feedback.tone);
        self.sounds.play_tone(feedback.tone);

        self.arm_timer(LoopEvent::FlashExpired, self.settings.flash_duration());
        self.arm_timer(LoopEvent::ClearLastCode, self.settings.clear_delay());
    }

    fn arm_timer(&self, event: LoopEvent, after: Duration) {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(event).await;
        });
    }
}
