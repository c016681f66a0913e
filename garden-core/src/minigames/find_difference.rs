//! Spot the differences between two copies of a scene.
//!
//! The scene itself is a generated image (or a placeholder); the
//! differences are emoji markers laid over the second copy.

use super::{Action, Rejection, Round, Verdict};
use crate::content::ImageRef;
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};

pub const SCENE_PROMPT: &str =
    "A simple cute cartoon forest scene with a tree and grass. White background, high quality, 3d render style.";

pub const MARKER_EMOJIS: [&str; 6] = ["🍄", "🦋", "🌸", "🐞", "🐌", "🐦"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub id: usize,
    pub emoji: String,
    /// Horizontal position, percent of the image width.
    pub x: f32,
    /// Vertical position, percent of the image height.
    pub y: f32,
    pub found: bool,
}

#[derive(Debug, Clone)]
pub struct FindDifferenceRound {
    background: ImageRef,
    differences: Vec<Difference>,
}

impl FindDifferenceRound {
    /// 3 to 5 markers, each somewhere in the middle 60% of the scene.
    pub fn generate(background: ImageRef, rng: &mut GardenRng) -> Self {
        let count = rng.range(3..=5) as usize;
        let emojis = rng.pick_distinct(&MARKER_EMOJIS, count);
        let differences = emojis
            .into_iter()
            .enumerate()
            .map(|(id, emoji)| Difference {
                id,
                emoji: emoji.to_string(),
                x: rng.float(20.0, 80.0),
                y: rng.float(20.0, 80.0),
                found: false,
            })
            .collect();
        Self {
            background,
            differences,
        }
    }

    pub fn background(&self) -> &ImageRef {
        &self.background
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    pub fn found_count(&self) -> usize {
        self.differences.iter().filter(|d| d.found).count()
    }
}

impl Round for FindDifferenceRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::ClickDifference(id) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        let Some(difference) = self.differences.iter_mut().find(|d| d.id == *id) else {
            return Verdict::Rejected(Rejection::Invalid);
        };
        if difference.found {
            return Verdict::Rejected(Rejection::AlreadyDone);
        }
        difference.found = true;

        if self.differences.iter().all(|d| d.found) {
            Verdict::Win
        } else {
            Verdict::Progress
        }
    }

    fn host_message(&self) -> String {
        "İki resim arasındaki farkları bul!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_in_bounds() {
        for seed in 0..30 {
            let round = FindDifferenceRound::generate(ImageRef::placeholder(seed), &mut GardenRng::seeded(seed));
            let n = round.differences().len();
            assert!((3..=5).contains(&n), "got {n} markers");
            for d in round.differences() {
                assert!((20.0..80.0).contains(&d.x));
                assert!((20.0..80.0).contains(&d.y));
                assert!(MARKER_EMOJIS.contains(&d.emoji.as_str()));
                assert!(!d.found);
            }
        }
    }

    #[test]
    fn test_markers_are_distinct() {
        for seed in 0..30 {
            let round = FindDifferenceRound::generate(ImageRef::placeholder(seed), &mut GardenRng::seeded(seed));
            let mut emojis: Vec<&str> = round.differences().iter().map(|d| d.emoji.as_str()).collect();
            let n = emojis.len();
            emojis.sort();
            emojis.dedup();
            assert_eq!(emojis.len(), n, "repeated marker for seed {seed}");
        }
    }

    #[test]
    fn test_find_all_wins() {
        let mut round = FindDifferenceRound::generate(ImageRef::new("scene"), &mut GardenRng::seeded(1));
        let n = round.differences().len();
        for id in 0..n - 1 {
            assert_eq!(round.evaluate(&Action::ClickDifference(id)), Verdict::Progress);
        }
        assert_eq!(round.found_count(), n - 1);
        assert_eq!(round.evaluate(&Action::ClickDifference(n - 1)), Verdict::Win);
    }

    #[test]
    fn test_repeat_and_unknown_are_not_failures() {
        let mut round = FindDifferenceRound::generate(ImageRef::new("scene"), &mut GardenRng::seeded(2));
        round.evaluate(&Action::ClickDifference(0));
        assert_eq!(
            round.evaluate(&Action::ClickDifference(0)),
            Verdict::Rejected(Rejection::AlreadyDone)
        );
        assert_eq!(
            round.evaluate(&Action::ClickDifference(42)),
            Verdict::Rejected(Rejection::Invalid)
        );
        assert_eq!(round.found_count(), 1);
    }
}
