//! Voice-driven puzzle garden for young children.
//!
//! This crate provides:
//! - A voice command interpreter and shared voice context
//! - Navigation between the menu, game selection, character creator and minigames
//! - Game sessions with lives, levels and timed feedback
//! - Ten minigames, each a pure reducer over its round state
//! - A content boundary for generated images, with placeholder fallbacks
//!
//! # Quick Start
//!
//! ```ignore
//! use garden_core::{Garden, GardenConfig, GardenInput, LogAnnouncer, NavigationMode, PlaceholderGenerator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut garden = Garden::new(
//!         GardenConfig::new(),
//!         Arc::new(PlaceholderGenerator),
//!         Arc::new(LogAnnouncer),
//!     );
//!     garden.start();
//!     garden.hear("oyuna başla");
//!     garden.settle().await;
//!     assert_eq!(garden.navigator().mode(), NavigationMode::GameSelection);
//! }
//! ```

pub mod character;
pub mod command;
pub mod config;
pub mod content;
pub mod creator;
pub mod effect;
pub mod minigames;
pub mod mode;
pub mod navigation;
pub mod phrases;
pub mod runtime;
pub mod session;
pub mod shuffle;
pub mod testing;
pub mod voice;

// Primary public API
pub use character::{Character, CharacterId, Roster};
pub use command::{interpret, normalize, KeywordTable};
pub use config::{ConfigError, GardenConfig, RetryPolicy, SessionRules, Timings};
pub use content::{ContentError, ContentGenerator, ImagePrompt, ImageRef, PlaceholderGenerator};
pub use creator::{CharacterCreator, CreatorError, CreatorStep, InputMode};
pub use effect::{Effect, SessionTimer, Timer};
pub use minigames::{Action, Rejection, RoundState, Verdict};
pub use mode::{MinigameKind, NavigationMode};
pub use navigation::Navigator;
pub use runtime::{Garden, GardenError, GardenEvent, GardenInput};
pub use session::{ContentRequest, Delivery, GameSession, SessionId, SessionPhase, Ticket};
pub use testing::{MockGenerator, RecordingAnnouncer, ScriptedSpeech, TestHarness};
pub use voice::{
    Announcer, CommandSubscription, ListenerExit, LogAnnouncer, SpeechSource, TranscriptEvent,
    VoiceContext, VoiceEngine, VoiceError,
};
