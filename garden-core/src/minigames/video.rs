//! Free-form story video: the child describes a story and gets a short
//! storyboard back. Nothing to win or lose.

use super::{Action, Rejection, Round, Verdict};
use crate::content::ImageRef;

/// Frames requested per story.
pub const FRAME_COUNT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct VideoRound {
    prompt: String,
    frames: Vec<ImageRef>,
    generating: bool,
}

impl VideoRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn frames(&self) -> &[ImageRef] {
        &self.frames
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Show a finished storyboard.
    pub fn show_frames(&mut self, frames: Vec<ImageRef>) {
        self.frames = frames;
        self.generating = false;
    }

    /// Give up on the pending storyboard.
    pub fn cancel_generation(&mut self) {
        self.generating = false;
    }
}

impl Round for VideoRound {
    /// Accepts a non-empty prompt and starts generating. The session turns
    /// `Progress` into a frames request.
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::SubmitPrompt(text) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        if self.generating {
            return Verdict::Rejected(Rejection::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Verdict::Rejected(Rejection::Invalid);
        }
        self.prompt = text.to_string();
        self.frames.clear();
        self.generating = true;
        Verdict::Progress
    }

    fn host_message(&self) -> String {
        "Ne videosu yapalım? İster söyle, ister yaz.".to_string()
    }
}
