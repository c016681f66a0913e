//! Memory match: find the pairs.
//!
//! The round opens with a preview where every card is face-up and input
//! is locked. The session ends the preview with [`MemoryRound::end_preview`].
//! After that at most two unmatched cards are ever face-up at once.

use super::{cute_animals, Action, Animal, Rejection, Round, Verdict};
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};

/// Number of distinct animals on the board.
pub const PAIRS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Cards with the same pair id match.
    pub pair: usize,
    pub animal: Animal,
    pub matched: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryRound {
    cards: Vec<Card>,
    flipped: Vec<usize>,
    previewing: bool,
}

impl MemoryRound {
    pub fn generate(rng: &mut GardenRng) -> Self {
        let animals = rng.pick_distinct(&cute_animals(), PAIRS);
        let mut cards: Vec<Card> = animals
            .into_iter()
            .enumerate()
            .flat_map(|(pair, animal)| {
                let card = Card {
                    pair,
                    animal,
                    matched: false,
                };
                [card.clone(), card]
            })
            .collect();
        rng.shuffle(&mut cards);
        Self::from_cards(cards)
    }

    /// A round over a fixed deck, starting in preview.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            flipped: Vec::new(),
            previewing: true,
        }
    }

    pub fn end_preview(&mut self) {
        self.previewing = false;
    }

    pub fn in_preview(&self) -> bool {
        self.previewing
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Whether the card at `index` is currently visible.
    pub fn is_face_up(&self, index: usize) -> bool {
        self.previewing
            || self.flipped.contains(&index)
            || self.cards.get(index).is_some_and(|c| c.matched)
    }

    /// Face-up cards that are not yet matched.
    pub fn face_up_unmatched(&self) -> usize {
        if self.previewing {
            self.cards.iter().filter(|c| !c.matched).count()
        } else {
            self.flipped.len()
        }
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count()
    }
}

impl Round for MemoryRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::FlipCard(index) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        let index = *index;
        if self.previewing || self.flipped.len() >= 2 {
            return Verdict::Rejected(Rejection::Busy);
        }
        let Some(card) = self.cards.get(index) else {
            return Verdict::Rejected(Rejection::Invalid);
        };
        if card.matched || self.flipped.contains(&index) {
            return Verdict::Rejected(Rejection::AlreadyDone);
        }
        self.flipped.push(index);

        let &[first, second] = self.flipped.as_slice() else {
            return Verdict::Continue;
        };
        if self.cards[first].pair != self.cards[second].pair {
            // Both stay face-up until settled.
            return Verdict::Fail;
        }
        self.cards[first].matched = true;
        self.cards[second].matched = true;
        self.flipped.clear();

        if self.matched_count() == self.cards.len() {
            Verdict::Win
        } else {
            Verdict::Progress
        }
    }

    fn settle(&mut self) {
        self.flipped.clear();
    }

    fn host_message(&self) -> String {
        "Kartlara iyi bak! Ezberle!".to_string()
    }
}
