//! Character creator.
//!
//! The child names a character and either describes it out loud or draws
//! it. The creator builds the image prompt, waits for the portrait and
//! turns the result into a [`Character`] for the roster.

use crate::character::Character;
use crate::content::{ContentError, ImagePrompt, ImageRef};
use crate::session::{SessionId, Ticket};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorStep {
    Input,
    Generating,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Voice,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatorError {
    #[error("the character creator is not open")]
    NotOpen,

    #[error("the character needs a name first")]
    MissingName,

    #[error("draw something first")]
    MissingSketch,

    #[error("not possible while {0:?}")]
    WrongStep(CreatorStep),
}

#[derive(Debug, Clone)]
pub struct CharacterCreator {
    id: SessionId,
    epoch: u64,
    step: CreatorStep,
    mode: InputMode,
    name: String,
    description: String,
    sketch: Option<Vec<u8>>,
    preview: Option<ImageRef>,
    guide: String,
}

impl Default for CharacterCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterCreator {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            epoch: 0,
            step: CreatorStep::Input,
            mode: InputMode::Voice,
            name: String::new(),
            description: String::new(),
            sketch: None,
            preview: None,
            guide: "Dinliyorum...".to_string(),
        }
    }

    pub fn step(&self) -> CreatorStep {
        self.step
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn preview(&self) -> Option<&ImageRef> {
        self.preview.as_ref()
    }

    /// On-screen hint for the child.
    pub fn guide(&self) -> &str {
        &self.guide
    }

    /// Ticket of the current portrait request.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            session: self.id,
            epoch: self.epoch,
        }
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Feed spoken text. The first phrase names the character; later
    /// phrases describe it (voice mode only).
    pub fn hear(&mut self, transcript: &str) {
        let text = transcript.trim();
        if text.is_empty() || self.step != CreatorStep::Input {
            return;
        }
        if self.name.is_empty() {
            self.name = text.to_string();
            self.guide = format!("Adı {text} olsun!");
        } else if self.mode == InputMode::Voice {
            self.description = text.to_string();
            self.guide = "Harika! Şimdi oluşturabiliriz.".to_string();
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into().trim().to_string();
    }

    /// Attach a drawing (PNG bytes) and switch to draw mode.
    pub fn set_sketch(&mut self, png: Vec<u8>) {
        self.sketch = Some(png);
        self.mode = InputMode::Draw;
    }

    /// Build the portrait prompt and wait for the result. Allowed from the
    /// input step, or from the preview to try again.
    pub fn begin_generation(&mut self) -> Result<(Ticket, ImagePrompt), CreatorError> {
        if self.step == CreatorStep::Generating {
            return Err(CreatorError::WrongStep(self.step));
        }
        if self.name.is_empty() {
            return Err(CreatorError::MissingName);
        }

        let prompt = match self.mode {
            InputMode::Voice => {
                ImagePrompt::text(format!("Name: {}. Desc: {}", self.name, self.description))
            }
            InputMode::Draw => {
                let sketch = self.sketch.clone().ok_or(CreatorError::MissingSketch)?;
                ImagePrompt::with_sketch(
                    format!("Name: {}. Based on this child's drawing.", self.name),
                    sketch,
                )
            }
        };

        self.epoch += 1;
        self.step = CreatorStep::Generating;
        self.preview = None;
        self.guide = "Sihir yapılıyor... ✨".to_string();
        Ok((self.ticket(), prompt))
    }

    /// Show the generated portrait, or a placeholder if generation failed.
    pub fn finish_generation(&mut self, result: Result<ImageRef, ContentError>) {
        if self.step != CreatorStep::Generating {
            return;
        }
        let image = result.unwrap_or_else(|e| {
            warn!(error = %e, name = %self.name, "portrait generation failed, using placeholder");
            ImageRef::placeholder(self.epoch)
        });
        self.preview = Some(image);
        self.step = CreatorStep::Preview;
        self.guide = "İşte karakterin!".to_string();
    }

    /// The finished character, with a fresh id and no stickers.
    pub fn save(&self) -> Result<Character, CreatorError> {
        match (&self.step, &self.preview) {
            (CreatorStep::Preview, Some(image)) => Ok(Character::new(
                self.name.clone(),
                self.description.clone(),
                image.clone(),
            )),
            _ => Err(CreatorError::WrongStep(self.step)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_flow() {
        let mut creator = CharacterCreator::new();
        creator.hear("  Limon ");
        assert_eq!(creator.name(), "Limon");
        assert_eq!(creator.guide(), "Adı Limon olsun!");
        creator.hear("sarı elbiseli bir kedi");
        assert_eq!(creator.description(), "sarı elbiseli bir kedi");

        let (ticket, prompt) = creator.begin_generation().unwrap();
        assert_eq!(ticket, creator.ticket());
        assert_eq!(prompt.description, "Name: Limon. Desc: sarı elbiseli bir kedi");
        assert!(prompt.reference_sketch.is_none());
        assert_eq!(creator.step(), CreatorStep::Generating);

        creator.finish_generation(Ok(ImageRef::new("data:image/png;base64,AAAA")));
        let character = creator.save().unwrap();
        assert_eq!(character.name, "Limon");
        assert!(character.stickers().is_empty());
        assert!(!character.image.is_placeholder());
    }

    #[test]
    fn test_draw_mode_uses_sketch_and_ignores_description() {
        let mut creator = CharacterCreator::new();
        creator.hear("Boncuk");
        creator.set_sketch(vec![0x89, 0x50]);
        creator.hear("this is ignored");
        assert_eq!(creator.description(), "");

        let (_, prompt) = creator.begin_generation().unwrap();
        assert_eq!(prompt.description, "Name: Boncuk. Based on this child's drawing.");
        assert_eq!(prompt.reference_sketch, Some(vec![0x89, 0x50]));
    }

    #[test]
    fn test_needs_name() {
        let mut creator = CharacterCreator::new();
        assert_eq!(creator.begin_generation().unwrap_err(), CreatorError::MissingName);
        creator.set_name("Pamuk");
        creator.set_mode(InputMode::Draw);
        assert_eq!(creator.begin_generation().unwrap_err(), CreatorError::MissingSketch);
    }

    #[test]
    fn test_failed_generation_gives_placeholder() {
        let mut creator = CharacterCreator::new();
        creator.set_name("Pamuk");
        creator.begin_generation().unwrap();
        creator.finish_generation(Err(ContentError::Unavailable));
        assert_eq!(creator.step(), CreatorStep::Preview);
        assert!(creator.preview().unwrap().is_placeholder());
    }

    #[test]
    fn test_save_requires_preview() {
        let mut creator = CharacterCreator::new();
        creator.set_name("Pamuk");
        assert_eq!(
            creator.save().unwrap_err(),
            CreatorError::WrongStep(CreatorStep::Input)
        );
        creator.begin_generation().unwrap();
        assert!(creator.save().is_err());
        assert!(creator.begin_generation().is_err());
    }
}
