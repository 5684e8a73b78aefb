use anyhow::Result;
use tracing::{debug, warn};

use crate::model::FeedbackTone;

/// One preloaded sound asset.
pub trait SoundPlayer: Send {
    /// Warm the asset up so the first real playback is instant. Platforms
    /// may refuse until the user has interacted with the page; callers
    /// treat a refusal as non-fatal.
    fn prime(&mut self) -> Result<()>;

    /// Rewind to the start so a replay is audible even if the previous
    /// playback has not finished.
    fn reset(&mut self);

    fn play(&mut self) -> Result<()>;
}

/// The positive/negative cue pair. Allocated once for the life of the
/// scanner; replays only ever reset the playback position.
pub struct ScanSounds {
    valid: Box<dyn SoundPlayer>,
    invalid: Box<dyn SoundPlayer>,
}

impl ScanSounds {
    pub fn new(valid: Box<dyn SoundPlayer>, invalid: Box<dyn SoundPlayer>) -> Self {
        Self { valid, invalid }
    }

    /// Prime both cues before capture starts. Refusals are logged and
    /// swallowed: a muted kiosk still has to scan.
    pub fn prime_all(&mut self) {
        for (label, sound) in [("valid", &mut self.valid), ("invalid", &mut self.invalid)] {
            if let Err(err) = sound.prime() {
                warn!(sound = label, error = %err, "sound priming refused");
            }
        }
    }

    /// Reset-then-play the cue for `tone`. Playback rejection is swallowed;
    /// it never affects the rendered outcome.
    pub fn play_tone(&mut self, tone: FeedbackTone) {
        let sound = match tone {
            FeedbackTone::Green => &mut self.valid,
            FeedbackTone::Red => &mut self.invalid,
        };
        sound.reset();
        if let Err(err) = sound.play() {
            debug!(error = %err, "sound playback rejected");
        }
    }
}

/// Terminal stand-in that marks playback in the output instead of making
/// noise.
pub struct ConsoleSound {
    label: &'static str,
}

impl ConsoleSound {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl SoundPlayer for ConsoleSound {
    fn prime(&mut self) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self) {}

    fn play(&mut self) -> Result<()> {
        println!("[sound] {}", self.label);
        Ok(())
    }
}
