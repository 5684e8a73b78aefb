/// Observable phase of the scan flow, derived from [`ScanSession`] fields.
///
/// Gating never consults the phase; it exists so logs and tests can name
/// where the machine is without a second source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Validating,
    AwaitingClear,
}

impl ScanPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Validating => "validating",
            ScanPhase::AwaitingClear => "awaiting-clear",
        }
    }
}

/// How one validation attempt settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Valid,
    Invalid,
    NetworkError,
}

impl ScanOutcome {
    /// Apply the validity test to a fetched check document: the body is
    /// valid iff it contains the marker phrase. There is no structured
    /// contract with the check server beyond this substring.
    pub fn classify(body: &str, marker: &str) -> Self {
        if body.contains(marker) {
            ScanOutcome::Valid
        } else {
            ScanOutcome::Invalid
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScanOutcome::Valid => "✅ CARD VALID",
            ScanOutcome::Invalid => "❌ CARD INVALID",
            ScanOutcome::NetworkError => "❌ FAILED TO VALIDATE",
        }
    }

    pub fn tone(&self) -> FeedbackTone {
        match self {
            ScanOutcome::Valid => FeedbackTone::Green,
            ScanOutcome::Invalid | ScanOutcome::NetworkError => FeedbackTone::Red,
        }
    }
}

/// Colour cue accompanying a rendered outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Green,
    Red,
}

impl FeedbackTone {
    /// CSS class a DOM embedder would toggle for the background flash.
    pub fn flash_class(&self) -> &'static str {
        match self {
            FeedbackTone::Green => "flash-green",
            FeedbackTone::Red => "flash-red",
        }
    }
}

/// What the panel is asked to show for one settled scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanFeedback {
    pub message: &'static str,
    pub tone: FeedbackTone,
}

impl ScanFeedback {
    pub fn for_outcome(outcome: ScanOutcome) -> Self {
        Self {
            message: outcome.message(),
            tone: outcome.tone(),
        }
    }
}

/// The transient scan state: one per controller, alive for the page view.
///
/// `ready` and `last_code` are the whole duplicate-suppression gate.
/// `inflight` only feeds the derived [`ScanPhase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    ready: bool,
    last_code: Option<String>,
    inflight: usize,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            ready: true,
            last_code: None,
            inflight: 0,
        }
    }

    /// Whether a decode report for `payload` should trigger a validation:
    /// non-empty, gate open, and not the code still sitting in view.
    pub fn accepts(&self, payload: &str) -> bool {
        !payload.is_empty() && self.ready && self.last_code.as_deref() != Some(payload)
    }

    /// Close the gate and remember the payload so repeat frames of the same
    /// code stay suppressed.
    pub fn note_trigger(&mut self, payload: &str) {
        self.ready = false;
        self.last_code = Some(payload.to_owned());
        self.inflight += 1;
    }

    /// Nothing decodable in view: a different code may trigger immediately.
    /// The last accepted code stays suppressed until its quiet period ends.
    pub fn note_no_detection(&mut self) {
        self.ready = true;
    }

    pub fn note_settled(&mut self) {
        self.inflight = self.inflight.saturating_sub(1);
    }

    /// Quiet period over: an identical payload is acceptable again.
    pub fn clear_last_code(&mut self) {
        self.last_code = None;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    pub fn phase(&self) -> ScanPhase {
        if self.inflight > 0 {
            ScanPhase::Validating
        } else if self.last_code.is_some() {
            ScanPhase::AwaitingClear
        } else {
            ScanPhase::Idle
        }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn classify_needs_the_marker_phrase() {
        let marker = "This membership card is valid";
        assert_eq!(
            ScanOutcome::classify("This membership card is valid for Jane", marker),
            ScanOutcome::Valid
        );
        assert_eq!(ScanOutcome::classify("invalid", marker), ScanOutcome::Invalid);
        assert_eq!(ScanOutcome::classify("", marker), ScanOutcome::Invalid);
    }

    #[test]
    fn every_outcome_renders_one_message_and_tone() {
        let valid = ScanFeedback::for_outcome(ScanOutcome::Valid);
        assert_eq!(valid.message, "✅ CARD VALID");
        assert_eq!(valid.tone, FeedbackTone::Green);

        let invalid = ScanFeedback::for_outcome(ScanOutcome::Invalid);
        assert_eq!(invalid.message, "❌ CARD INVALID");
        assert_eq!(invalid.tone, FeedbackTone::Red);

        let failed = ScanFeedback::for_outcome(ScanOutcome::NetworkError);
        assert_eq!(failed.message, "❌ FAILED TO VALIDATE");
        assert_eq!(failed.tone, FeedbackTone::Red);
    }

    #[test]
    fn fresh_session_accepts_any_nonempty_payload() {
        let session = ScanSession::new();
        assert!(session.accepts("CARD123"));
        assert!(!session.accepts(""));
        assert_eq!(session.phase(), ScanPhase::Idle);
    }

    #[test]
    fn trigger_closes_the_gate_for_everything() {
        let mut session = ScanSession::new();
        session.note_trigger("CARD123");
        assert!(!session.accepts("CARD123"));
        assert!(!session.accepts("CARD999"), "gate is closed, not per-code");
        assert_eq!(session.phase(), ScanPhase::Validating);
    }

    #[test]
    fn no_detection_reopens_for_different_codes_only() {
        let mut session = ScanSession::new();
        session.note_trigger("CARD123");
        session.note_no_detection();
        assert!(!session.accepts("CARD123"), "same code still suppressed");
        assert!(session.accepts("CARD999"));
    }

    #[test]
    fn clearing_last_code_readmits_the_same_payload() {
        let mut session = ScanSession::new();
        session.note_trigger("CARD123");
        session.note_settled();
        session.note_no_detection();
        assert_eq!(session.phase(), ScanPhase::AwaitingClear);

        session.clear_last_code();
        assert_eq!(session.phase(), ScanPhase::Idle);
        assert!(session.accepts("CARD123"));
    }

    #[test]
    fn phase_tracks_inflight_over_last_code() {
        let mut session = ScanSession::new();
        session.note_trigger("A");
        session.note_no_detection();
        session.note_trigger("B");
        session.note_settled();
        // One request still out: validating wins over awaiting-clear.
        assert_eq!(session.phase(), ScanPhase::Validating);
        session.note_settled();
        assert_eq!(session.phase(), ScanPhase::AwaitingClear);
    }
}
