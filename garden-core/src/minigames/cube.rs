//! Cube net folding: pick the folded cube that matches the unfolded net.

use super::{Action, Rejection, Round, Verdict};
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};

/// Pastel face colours.
pub const COLORS: [&str; 6] = [
    "#fca5a5", "#93c5fd", "#86efac", "#fcd34d", "#c4b5fd", "#fdba74",
];

/// Three visible faces of a folded cube: top, front, right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeView {
    pub top: String,
    pub front: String,
    pub right: String,
}

impl CubeView {
    fn from_net(net: &[String], [top, front, right]: [usize; 3]) -> Self {
        Self {
            top: net[top].clone(),
            front: net[front].clone(),
            right: net[right].clone(),
        }
    }
}

/// Net face indices of the correct fold.
const CORRECT: [usize; 3] = [2, 3, 0];
/// Net face indices of the distractor folds.
const WRONG: [[usize; 3]; 3] = [[2, 5, 3], [0, 4, 1], [1, 3, 0]];

#[derive(Debug, Clone)]
pub struct CubeRound {
    net: Vec<String>,
    options: Vec<CubeView>,
    answer: usize,
}

impl CubeRound {
    pub fn generate(rng: &mut GardenRng) -> Self {
        let net = rng.shuffled(&COLORS.map(String::from));

        let mut options: Vec<(bool, CubeView)> = std::iter::once(CORRECT)
            .chain(WRONG)
            .enumerate()
            .map(|(i, faces)| (i == 0, CubeView::from_net(&net, faces)))
            .collect();
        rng.shuffle(&mut options);

        let answer = options.iter().position(|(correct, _)| *correct).unwrap_or(0);
        let options = options.into_iter().map(|(_, view)| view).collect();
        Self {
            net,
            options,
            answer,
        }
    }

    /// Colours of the unfolded net, in face order.
    pub fn net(&self) -> &[String] {
        &self.net
    }

    pub fn options(&self) -> &[CubeView] {
        &self.options
    }

    pub fn answer(&self) -> usize {
        self.answer
    }
}

impl Round for CubeRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        match action {
            Action::ChooseOption(i) if *i >= self.options.len() => {
                Verdict::Rejected(Rejection::Invalid)
            }
            Action::ChooseOption(i) if *i == self.answer => Verdict::Win,
            Action::ChooseOption(_) => Verdict::Fail,
            _ => Verdict::Rejected(Rejection::WrongGame),
        }
    }

    fn host_message(&self) -> String {
        "Hangi küp bu şeklin kapalı halidir?".to_string()
    }
}
