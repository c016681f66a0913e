//! Story ordering: put three picture cards in the order they happened.

use super::{Action, Rejection, Round, Verdict};
use crate::content::{ImagePrompt, ImageRef};
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};

/// Prompts for the three story steps, in the correct order.
pub fn step_prompts() -> Vec<ImagePrompt> {
    [
        "Step 1: A cute bunny sleeping in bed. 3d render style.",
        "Step 2: A cute bunny eating breakfast carrot. 3d render style.",
        "Step 3: A cute bunny playing outside. 3d render style.",
    ]
    .into_iter()
    .map(ImagePrompt::text)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCard {
    /// Position in the story, starting at 1.
    pub id: u32,
    pub image: ImageRef,
}

#[derive(Debug, Clone)]
pub struct StoryRound {
    cards: Vec<StoryCard>,
    picked: Vec<u32>,
}

impl StoryRound {
    /// `images` must be in story order; the cards are shown shuffled.
    pub fn generate(images: Vec<ImageRef>, rng: &mut GardenRng) -> Self {
        let mut cards: Vec<StoryCard> = images
            .into_iter()
            .zip(1..)
            .map(|(image, id)| StoryCard { id, image })
            .collect();
        rng.shuffle(&mut cards);
        Self {
            cards,
            picked: Vec::new(),
        }
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[StoryCard] {
        &self.cards
    }

    /// Ids picked so far.
    pub fn picked(&self) -> &[u32] {
        &self.picked
    }
}

impl Round for StoryRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::PickStoryCard(id) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        if !self.cards.iter().any(|c| c.id == *id) {
            return Verdict::Rejected(Rejection::Invalid);
        }
        if self.picked.len() == self.cards.len() {
            return Verdict::Rejected(Rejection::Busy);
        }
        if self.picked.contains(id) {
            return Verdict::Rejected(Rejection::AlreadyDone);
        }
        self.picked.push(*id);

        if self.picked.len() < self.cards.len() {
            return Verdict::Continue;
        }
        if self.picked.iter().copied().eq(1..=self.cards.len() as u32) {
            Verdict::Win
        } else {
            Verdict::Fail
        }
    }

    fn settle(&mut self) {
        self.picked.clear();
    }

    fn host_message(&self) -> String {
        "Hikayeyi sıraya diz!".to_string()
    }
}
