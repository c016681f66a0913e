//! Player-made characters and the in-memory roster.

use crate::content::ImageRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A character made in the character creator.
///
/// Immutable once created, apart from the stickers it earns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub description: String,
    pub image: ImageRef,
    stickers: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>, description: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            description: description.into(),
            image,
            stickers: Vec::new(),
        }
    }

    pub fn stickers(&self) -> &[String] {
        &self.stickers
    }

    pub fn award_sticker(&mut self, sticker: impl Into<String>) {
        self.stickers.push(sticker.into());
    }
}

/// Characters created during this run, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, character: Character) {
        self.characters.push(character);
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn as_slice(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Give every character the same sticker.
    pub fn award_all(&mut self, sticker: &str) {
        for character in &mut self.characters {
            character.award_sticker(sticker);
        }
    }
}
