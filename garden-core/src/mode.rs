//! Navigation modes and the minigame catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten minigames reachable from the game selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameKind {
    Decryption,
    Cube,
    Pattern,
    Story,
    FindDifference,
    MemoryMatch,
    Puzzle,
    SpatialDirection,
    Labyrinth,
    VideoCreator,
}

impl MinigameKind {
    /// All minigames, in the order the voice keyword table is scanned.
    pub const ALL: [MinigameKind; 10] = [
        MinigameKind::Decryption,
        MinigameKind::Cube,
        MinigameKind::Pattern,
        MinigameKind::Story,
        MinigameKind::FindDifference,
        MinigameKind::MemoryMatch,
        MinigameKind::Puzzle,
        MinigameKind::SpatialDirection,
        MinigameKind::Labyrinth,
        MinigameKind::VideoCreator,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MinigameKind::Decryption => "Şifre",
            MinigameKind::Cube => "Küp",
            MinigameKind::Pattern => "Örüntü",
            MinigameKind::Story => "Hikaye",
            MinigameKind::FindDifference => "Fark Bul",
            MinigameKind::MemoryMatch => "Hafıza",
            MinigameKind::Puzzle => "Puzzle",
            MinigameKind::SpatialDirection => "Yön",
            MinigameKind::Labyrinth => "Labirent",
            MinigameKind::VideoCreator => "Video",
        }
    }

    /// Animal icon shown on the selection screen; doubles as the reward sticker.
    pub fn icon(&self) -> &'static str {
        match self {
            MinigameKind::Decryption => "🐰",
            MinigameKind::Cube => "🐿️",
            MinigameKind::Pattern => "🦉",
            MinigameKind::Story => "🐻",
            MinigameKind::FindDifference => "🦊",
            MinigameKind::MemoryMatch => "🐢",
            MinigameKind::Puzzle => "🦋",
            MinigameKind::SpatialDirection => "🐌",
            MinigameKind::Labyrinth => "🦔",
            MinigameKind::VideoCreator => "🐦",
        }
    }

    /// Lives a session of this minigame starts with, at least.
    pub fn min_lives(&self) -> u32 {
        match self {
            MinigameKind::MemoryMatch => 5,
            _ => 3,
        }
    }

    /// Whether the minigame is scored at all.
    pub fn is_scored(&self) -> bool {
        !matches!(self, MinigameKind::VideoCreator)
    }

    /// Parse a loose identifier such as `"memory"` or `"find_difference"`.
    pub fn from_slug(slug: &str) -> Option<MinigameKind> {
        let slug = slug.trim().to_lowercase().replace(['-', ' '], "_");
        let kind = match slug.as_str() {
            "decryption" | "code" => MinigameKind::Decryption,
            "cube" => MinigameKind::Cube,
            "pattern" => MinigameKind::Pattern,
            "story" => MinigameKind::Story,
            "find_difference" | "difference" | "diff" => MinigameKind::FindDifference,
            "memory_match" | "memory" => MinigameKind::MemoryMatch,
            "puzzle" => MinigameKind::Puzzle,
            "spatial_direction" | "direction" | "spatial" => MinigameKind::SpatialDirection,
            "labyrinth" | "maze" => MinigameKind::Labyrinth,
            "video_creator" | "video" => MinigameKind::VideoCreator,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for MinigameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The screen the player is on. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NavigationMode {
    #[default]
    Menu,
    GameSelection,
    CharacterCreator,
    Game(MinigameKind),
}

impl NavigationMode {
    /// The screen one level up the hierarchy, if any.
    pub fn parent(&self) -> Option<NavigationMode> {
        match self {
            NavigationMode::Menu => None,
            NavigationMode::GameSelection | NavigationMode::CharacterCreator => {
                Some(NavigationMode::Menu)
            }
            NavigationMode::Game(_) => Some(NavigationMode::GameSelection),
        }
    }

    pub fn minigame(&self) -> Option<MinigameKind> {
        match self {
            NavigationMode::Game(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_game(&self) -> bool {
        matches!(self, NavigationMode::Game(_))
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::Menu => write!(f, "Menu"),
            NavigationMode::GameSelection => write!(f, "Game Selection"),
            NavigationMode::CharacterCreator => write!(f, "Character Creator"),
            NavigationMode::Game(kind) => write!(f, "Game: {kind}"),
        }
    }
}
