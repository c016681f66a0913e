//! Voice command interpretation.
//!
//! Maps a finalized utterance to a navigation target. Matching is
//! substring based and first-match-wins, in priority order:
//!
//! 1. home keywords move one level up the navigation hierarchy
//! 2. at the menu, character / to-game keywords
//! 3. in game selection or inside a minigame, the minigame keyword table
//!    scanned in [`MinigameKind::ALL`] order
//!
//! The interpreter is a pure function of `(mode, normalize(utterance))`.

use crate::mode::{MinigameKind, NavigationMode};
use serde::{Deserialize, Serialize};

/// Normalize raw transcript text into an utterance: trimmed, lower-cased,
/// with runs of whitespace collapsed to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keywords for one minigame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameKeywords {
    pub kind: MinigameKind,
    pub keywords: Vec<String>,
}

/// The keyword vocabulary recognised by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub home: Vec<String>,
    pub character: Vec<String>,
    pub to_game: Vec<String>,
    pub games: Vec<GameKeywords>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for KeywordTable {
    fn default() -> Self {
        let game = |kind, list: &[&str]| GameKeywords {
            kind,
            keywords: words(list),
        };

        Self {
            home: words(&["ana sayfa", "menü", "geri", "home", "menu", "back"]),
            character: words(&["karakter", "character"]),
            to_game: words(&["oyuna", "play", "game"]),
            games: vec![
                game(MinigameKind::Decryption, &["şifre", "code"]),
                game(MinigameKind::Cube, &["küp", "cube"]),
                game(MinigameKind::Pattern, &["örüntü", "pattern"]),
                game(MinigameKind::Story, &["hikaye", "story"]),
                game(MinigameKind::FindDifference, &["fark", "difference"]),
                game(MinigameKind::MemoryMatch, &["hafıza", "memory"]),
                game(MinigameKind::Puzzle, &["puzzle"]),
                game(MinigameKind::SpatialDirection, &["yön", "direction"]),
                game(MinigameKind::Labyrinth, &["labirent", "maze"]),
                game(MinigameKind::VideoCreator, &["video"]),
            ],
        }
    }
}

impl KeywordTable {
    /// Keywords registered for a minigame (empty if none).
    pub fn keywords_for(&self, kind: MinigameKind) -> &[String] {
        self.games
            .iter()
            .find(|g| g.kind == kind)
            .map(|g| g.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// First minigame, in table scan order, with a keyword in the utterance.
    pub fn match_minigame(&self, utterance: &str) -> Option<MinigameKind> {
        MinigameKind::ALL
            .into_iter()
            .find(|kind| contains_any(utterance, self.keywords_for(*kind)))
    }
}

fn contains_any(utterance: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && utterance.contains(&normalize(k)))
}

/// Interpret an utterance in the context of the current mode.
///
/// Returns the target mode, or `None` for "no change". The utterance is
/// normalized here, so callers may pass raw transcript text.
pub fn interpret(
    mode: NavigationMode,
    utterance: &str,
    keywords: &KeywordTable,
) -> Option<NavigationMode> {
    let cmd = normalize(utterance);
    if cmd.is_empty() {
        return None;
    }

    if contains_any(&cmd, &keywords.home) {
        return mode.parent();
    }

    match mode {
        NavigationMode::Menu => {
            if contains_any(&cmd, &keywords.character) {
                Some(NavigationMode::CharacterCreator)
            } else if contains_any(&cmd, &keywords.to_game) {
                Some(NavigationMode::GameSelection)
            } else {
                None
            }
        }
        // The child dictates free text here; only home keywords apply.
        NavigationMode::CharacterCreator => None,
        NavigationMode::GameSelection | NavigationMode::Game(_) => {
            keywords.match_minigame(&cmd).map(NavigationMode::Game)
        }
    }
}
