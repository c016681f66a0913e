//! What comes next in `A B A B ?`.

use super::{Action, Rejection, Round, Verdict};
use crate::shuffle::GardenRng;

pub const FRUITS: [&str; 4] = ["🍎", "🍌", "🍇", "🍓"];

#[derive(Debug, Clone)]
pub struct PatternRound {
    sequence: Vec<String>,
    options: Vec<String>,
    answer: String,
}

impl PatternRound {
    pub fn generate(rng: &mut GardenRng) -> Self {
        let picked = rng.pick_distinct(&FRUITS, 3);
        let (a, b, distractor) = (picked[0], picked[1], picked[2]);

        let sequence = [a, b, a, b].map(String::from).to_vec();
        let options = rng.shuffled(&[a, b, distractor].map(String::from));
        Self {
            sequence,
            options,
            answer: a.to_string(),
        }
    }

    /// The visible part of the sequence; the next item is missing.
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

impl Round for PatternRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::ChooseOption(i) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        match self.options.get(*i) {
            None => Verdict::Rejected(Rejection::Invalid),
            Some(choice) if *choice == self.answer => Verdict::Win,
            Some(_) => Verdict::Fail,
        }
    }

    fn host_message(&self) -> String {
        "Sırada ne var?".to_string()
    }
}
