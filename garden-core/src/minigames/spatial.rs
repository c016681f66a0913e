//! Which way is the animal facing?

use super::{cute_animals, Action, Animal, Direction, Rejection, Round, Verdict};
use crate::shuffle::GardenRng;

#[derive(Debug, Clone)]
pub struct SpatialRound {
    animal: Animal,
    target: Direction,
    options: Vec<Direction>,
}

impl SpatialRound {
    pub fn generate(rng: &mut GardenRng) -> Self {
        let animals = cute_animals();
        let animal = rng
            .pick_one(&animals)
            .cloned()
            .unwrap_or_else(|| animals[0].clone());
        Self::with_animal(animal, rng)
    }

    fn with_animal(animal: Animal, rng: &mut GardenRng) -> Self {
        let target = rng.pick_one(&Direction::ALL).copied().unwrap_or(Direction::Up);
        let wrong: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != target)
            .collect();
        let mut options = rng.pick_distinct(&wrong, 2);
        options.push(target);
        rng.shuffle(&mut options);
        Self {
            animal,
            target,
            options,
        }
    }

    pub fn animal(&self) -> &Animal {
        &self.animal
    }

    pub fn target(&self) -> Direction {
        self.target
    }

    pub fn options(&self) -> &[Direction] {
        &self.options
    }
}

impl Round for SpatialRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::ChooseOption(i) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        match self.options.get(*i) {
            None => Verdict::Rejected(Rejection::Invalid),
            Some(dir) if *dir == self.target => Verdict::Win,
            Some(_) => Verdict::Fail,
        }
    }

    fn host_message(&self) -> String {
        format!("{} ne tarafa bakıyor?", self.animal.name)
    }
}
