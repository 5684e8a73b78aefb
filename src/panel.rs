use crate::model::{FeedbackTone, ScanFeedback};

/// Where scan results land: the result line and flash surface of the
/// scanner page in deployment, a recording stub in tests.
pub trait ResultPanel: Send {
    /// Capture is up; tear down any "tap to start" help copy.
    fn scanner_started(&mut self);

    /// Show the message for one settled scan.
    fn render(&mut self, feedback: &ScanFeedback);

    /// Raise the background flash cue.
    fn flash(&mut self, tone: FeedbackTone);

    /// Drop the flash cue again. The controller arms this a fixed delay
    /// after [`ResultPanel::flash`].
    fn clear_flash(&mut self);
}

/// Terminal panel for the demo binary: colours the message the way the
/// page colours its result line.
#[derive(Debug, Default)]
pub struct ConsolePanel;

impl ResultPanel for ConsolePanel {
    fn scanner_started(&mut self) {
        println!("scanner running; present a card");
    }

    fn render(&mut self, feedback: &ScanFeedback) {
        let colour = match feedback.tone {
            FeedbackTone::Green => "\x1b[32m",
            FeedbackTone::Red => "\x1b[31m",
        };
        println!("{colour}{}\x1b[0m", feedback.message);
    }

    fn flash(&mut self, tone: FeedbackTone) {
        println!("[{}]", tone.flash_class());
    }

    fn clear_flash(&mut self) {
        println!("[flash-off]");
    }
}
