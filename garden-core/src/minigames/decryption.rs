//! Symbol-to-number code puzzle.
//!
//! A legend maps three pictures to three distinct digits. The player reads
//! a sequence of pictures and types the matching digits.

use super::{fallback_animals, Action, Rejection, Round, Verdict};
use crate::character::Character;
use crate::content::ImageRef;
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};

/// Number of glyphs in the legend and slots in the answer.
pub const CODE_LENGTH: usize = 3;

/// A picture in the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub name: String,
    pub image: ImageRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub glyph: Glyph,
    pub digit: u8,
}

#[derive(Debug, Clone)]
pub struct DecryptionRound {
    legend: Vec<LegendEntry>,
    /// Indices into `legend`, in the order the player must decode them.
    question: Vec<usize>,
    inputs: Vec<Option<u8>>,
}

impl DecryptionRound {
    /// Build a round from an explicit legend and question.
    ///
    /// Question entries index into `legend`.
    pub fn new(legend: Vec<LegendEntry>, question: Vec<usize>) -> Self {
        let inputs = vec![None; question.len()];
        Self {
            legend,
            question,
            inputs,
        }
    }

    /// Roster characters first (up to three), topped up with built-in
    /// animals, each given a distinct digit from 1 to 9.
    pub fn generate(roster: &[Character], rng: &mut GardenRng) -> Self {
        let mut glyphs: Vec<Glyph> = roster
            .iter()
            .take(CODE_LENGTH)
            .map(|c| Glyph {
                name: c.name.clone(),
                image: c.image.clone(),
            })
            .collect();
        let needed = CODE_LENGTH - glyphs.len();
        glyphs.extend(fallback_animals().into_iter().take(needed).map(|a| Glyph {
            name: a.name,
            image: a.image,
        }));

        let digits: Vec<u8> = (1..=9).collect();
        let digits = rng.pick_distinct(&digits, CODE_LENGTH);

        let legend = glyphs
            .into_iter()
            .zip(digits)
            .map(|(glyph, digit)| LegendEntry { glyph, digit })
            .collect();
        let indices: Vec<usize> = (0..CODE_LENGTH).collect();
        let question = rng.shuffled(&indices);

        Self::new(legend, question)
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// The glyphs to decode, in order.
    pub fn question(&self) -> impl Iterator<Item = &Glyph> {
        self.question.iter().map(|&i| &self.legend[i].glyph)
    }

    pub fn inputs(&self) -> &[Option<u8>] {
        &self.inputs
    }

    /// The digits the player has to type.
    pub fn solution(&self) -> Vec<u8> {
        self.question.iter().map(|&i| self.legend[i].digit).collect()
    }
}

impl Round for DecryptionRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::EnterDigit(digit) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        if !(1..=9).contains(digit) {
            return Verdict::Rejected(Rejection::Invalid);
        }
        let Some(slot) = self.inputs.iter().position(Option::is_none) else {
            return Verdict::Rejected(Rejection::Busy);
        };
        self.inputs[slot] = Some(*digit);

        if self.inputs.iter().any(Option::is_none) {
            return Verdict::Continue;
        }
        let typed: Vec<u8> = self.inputs.iter().flatten().copied().collect();
        if typed == self.solution() {
            Verdict::Win
        } else {
            Verdict::Fail
        }
    }

    fn settle(&mut self) {
        self.inputs.iter_mut().for_each(|slot| *slot = None);
    }

    fn host_message(&self) -> String {
        "Resimlerin sayılarını bul ve şifreyi çöz!".to_string()
    }
}
