//! Minigame rounds.
//!
//! Each minigame is a small reducer over its own round state: it takes one
//! player [`Action`] and reports a [`Verdict`]. The game session turns
//! verdicts into lives, levels and announcements. Rounds never sleep; any
//! feedback delay before a failure is handled by the session, which calls
//! [`Round::settle`] once the player has seen the wrong answer.

pub mod cube;
pub mod decryption;
pub mod find_difference;
pub mod labyrinth;
pub mod memory;
pub mod pattern;
pub mod puzzle;
pub mod spatial;
pub mod story;
pub mod video;

use crate::character::Character;
use crate::content::{ContentGenerator, ImagePrompt, ImageRef};
use crate::mode::MinigameKind;
use crate::shuffle::GardenRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use cube::CubeRound;
pub use decryption::DecryptionRound;
pub use find_difference::FindDifferenceRound;
pub use labyrinth::{Cell, Direction, LabyrinthRound, Maze, MazeError, Position};
pub use memory::MemoryRound;
pub use pattern::PatternRound;
pub use puzzle::PuzzleRound;
pub use spatial::SpatialRound;
pub use story::StoryRound;
pub use video::VideoRound;

/// A player action on the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Decryption: type a digit into the next empty slot.
    EnterDigit(u8),
    /// Cube, pattern and spatial direction: pick an option by index.
    ChooseOption(usize),
    /// Memory match: turn a card over.
    FlipCard(usize),
    /// Labyrinth: step one cell.
    Move(Direction),
    /// Story: pick the next card by its id.
    PickStoryCard(u32),
    /// Puzzle: drop a piece onto a board slot.
    DropPiece { piece: usize, slot: usize },
    /// Find the difference: tap a marker.
    ClickDifference(usize),
    /// Video creator: spoken or typed story text.
    SubmitPrompt(String),
}

/// Why an action was refused without costing a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The action doesn't apply to this minigame.
    WrongGame,
    /// Out-of-range index or digit.
    Invalid,
    /// Already found, placed, picked or matched.
    AlreadyDone,
    /// Input is locked: preview running or a pair is still showing.
    Busy,
    /// Labyrinth: a wall is in the way.
    Wall,
    /// Labyrinth: the move would leave the grid.
    OffGrid,
    /// Puzzle: the piece belongs to a different slot.
    WrongSlot,
}

/// Result of evaluating one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Accepted, nothing to report yet (e.g. a digit typed, a step taken).
    Continue,
    /// A correct partial answer (a pair matched, a difference found).
    Progress,
    /// Refused; round state unchanged.
    Rejected(Rejection),
    Win,
    Fail,
}

/// Behaviour shared by every minigame round.
pub trait Round {
    /// Apply one player action.
    fn evaluate(&mut self, action: &Action) -> Verdict;

    /// Reset the input after a failure was shown to the player.
    fn settle(&mut self) {}

    /// What the host says when the round starts.
    fn host_message(&self) -> String;
}

/// The current round of whichever minigame is active.
#[derive(Debug, Clone)]
pub enum RoundState {
    Decryption(DecryptionRound),
    Cube(CubeRound),
    Pattern(PatternRound),
    Story(StoryRound),
    FindDifference(FindDifferenceRound),
    MemoryMatch(MemoryRound),
    Puzzle(PuzzleRound),
    SpatialDirection(SpatialRound),
    Labyrinth(LabyrinthRound),
    VideoCreator(VideoRound),
}

impl RoundState {
    pub fn kind(&self) -> MinigameKind {
        match self {
            RoundState::Decryption(_) => MinigameKind::Decryption,
            RoundState::Cube(_) => MinigameKind::Cube,
            RoundState::Pattern(_) => MinigameKind::Pattern,
            RoundState::Story(_) => MinigameKind::Story,
            RoundState::FindDifference(_) => MinigameKind::FindDifference,
            RoundState::MemoryMatch(_) => MinigameKind::MemoryMatch,
            RoundState::Puzzle(_) => MinigameKind::Puzzle,
            RoundState::SpatialDirection(_) => MinigameKind::SpatialDirection,
            RoundState::Labyrinth(_) => MinigameKind::Labyrinth,
            RoundState::VideoCreator(_) => MinigameKind::VideoCreator,
        }
    }

    fn round(&self) -> &dyn Round {
        match self {
            RoundState::Decryption(r) => r,
            RoundState::Cube(r) => r,
            RoundState::Pattern(r) => r,
            RoundState::Story(r) => r,
            RoundState::FindDifference(r) => r,
            RoundState::MemoryMatch(r) => r,
            RoundState::Puzzle(r) => r,
            RoundState::SpatialDirection(r) => r,
            RoundState::Labyrinth(r) => r,
            RoundState::VideoCreator(r) => r,
        }
    }

    fn round_mut(&mut self) -> &mut dyn Round {
        match self {
            RoundState::Decryption(r) => r,
            RoundState::Cube(r) => r,
            RoundState::Pattern(r) => r,
            RoundState::Story(r) => r,
            RoundState::FindDifference(r) => r,
            RoundState::MemoryMatch(r) => r,
            RoundState::Puzzle(r) => r,
            RoundState::SpatialDirection(r) => r,
            RoundState::Labyrinth(r) => r,
            RoundState::VideoCreator(r) => r,
        }
    }

    pub fn evaluate(&mut self, action: &Action) -> Verdict {
        self.round_mut().evaluate(action)
    }

    pub fn settle(&mut self) {
        self.round_mut().settle()
    }

    pub fn host_message(&self) -> String {
        self.round().host_message()
    }
}

/// A named picture used by several minigames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub name: String,
    pub image: ImageRef,
}

const ANIMAL_BASE: &str =
    "https://raw.githubusercontent.com/Tarikul-Islam-Anik/Animated-Fluent-Emojis/master/Emojis/Animals";

/// Built-in animal pictures; no generation needed.
pub fn cute_animals() -> Vec<Animal> {
    [
        ("Tavşan", "Rabbit%20Face.png"),
        ("Tilki", "Fox.png"),
        ("Kurbağa", "Frog.png"),
        ("Kedi", "Cat%20Face.png"),
        ("Panda", "Panda.png"),
        ("Unicorn", "Unicorn.png"),
        ("Penguen", "Penguin.png"),
        ("Koala", "Koala.png"),
    ]
    .into_iter()
    .map(animal)
    .collect()
}

/// Stand-ins for roster characters when fewer than needed exist.
pub fn fallback_animals() -> Vec<Animal> {
    [
        ("Tavşan", "Rabbit%20Face.png"),
        ("Tilki", "Fox.png"),
        ("Panda", "Panda.png"),
        ("Kedi", "Cat%20Face.png"),
        ("Koala", "Koala.png"),
        ("Penguen", "Penguin.png"),
    ]
    .into_iter()
    .map(animal)
    .collect()
}

fn animal((name, file): (&str, &str)) -> Animal {
    Animal {
        name: name.to_string(),
        image: ImageRef::new(format!("{ANIMAL_BASE}/{file}")),
    }
}

/// Build a fresh round for `kind`.
///
/// Procedural parts come from `rng`; images come from `generator`, with a
/// placeholder substituted for every failed request.
pub async fn setup_round(
    kind: MinigameKind,
    roster: &[Character],
    rng: &mut GardenRng,
    generator: &dyn ContentGenerator,
) -> RoundState {
    match kind {
        MinigameKind::Decryption => RoundState::Decryption(DecryptionRound::generate(roster, rng)),
        MinigameKind::Cube => RoundState::Cube(CubeRound::generate(rng)),
        MinigameKind::Pattern => RoundState::Pattern(PatternRound::generate(rng)),
        MinigameKind::MemoryMatch => RoundState::MemoryMatch(MemoryRound::generate(rng)),
        MinigameKind::SpatialDirection => {
            RoundState::SpatialDirection(SpatialRound::generate(rng))
        }
        MinigameKind::Labyrinth => RoundState::Labyrinth(LabyrinthRound::new(Maze::classic())),
        MinigameKind::VideoCreator => RoundState::VideoCreator(VideoRound::new()),
        MinigameKind::Story => {
            let prompts = story::step_prompts();
            let images = futures::future::join_all(
                prompts.iter().map(|p| generator.generate_image(p)),
            )
            .await;
            let images = images
                .into_iter()
                .map(|result| image_or_placeholder(result, rng, "story step"))
                .collect();
            RoundState::Story(StoryRound::generate(images, rng))
        }
        MinigameKind::FindDifference => {
            let prompt = ImagePrompt::text(find_difference::SCENE_PROMPT);
            let background =
                image_or_placeholder(generator.generate_image(&prompt).await, rng, "scene");
            RoundState::FindDifference(FindDifferenceRound::generate(background, rng))
        }
        MinigameKind::Puzzle => {
            let prompt = ImagePrompt::text(puzzle::IMAGE_PROMPT);
            let image =
                image_or_placeholder(generator.generate_image(&prompt).await, rng, "puzzle");
            RoundState::Puzzle(PuzzleRound::generate(image, rng))
        }
    }
}

pub(crate) fn image_or_placeholder(
    result: Result<ImageRef, crate::content::ContentError>,
    rng: &mut GardenRng,
    what: &str,
) -> ImageRef {
    match result {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, what, "image generation failed, using placeholder");
            ImageRef::placeholder(rng.next_seed())
        }
    }
}
