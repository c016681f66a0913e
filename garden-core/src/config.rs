//! Garden configuration.
//!
//! Every delay in the game is a tunable UX constant rather than a timing
//! contract, so they all live here together with the session rules, the
//! voice keyword table and the speech restart policy.

use crate::command::KeywordTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lives and level bounds for game sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    /// Number of levels per minigame; `max_level + 1` means completed.
    pub max_level: u32,
    /// Lives a session starts with (minigames may raise this).
    pub default_lives: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_level: 10,
            default_lives: 3,
        }
    }
}

/// UX delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub level_load_ms: u64,
    pub win_advance_ms: u64,
    pub decryption_feedback_ms: u64,
    pub story_feedback_ms: u64,
    pub memory_mismatch_ms: u64,
    pub memory_preview_ms: u64,
    pub menu_welcome_ms: u64,
    pub selection_welcome_ms: u64,
    pub command_clear_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            level_load_ms: 500,
            win_advance_ms: 2000,
            decryption_feedback_ms: 500,
            story_feedback_ms: 1000,
            memory_mismatch_ms: 1000,
            memory_preview_ms: 3000,
            menu_welcome_ms: 800,
            selection_welcome_ms: 500,
            command_clear_ms: 2000,
        }
    }
}

impl Timings {
    /// All delays zero; handy for driving state machines in tests.
    pub fn instant() -> Self {
        Self {
            level_load_ms: 0,
            win_advance_ms: 0,
            decryption_feedback_ms: 0,
            story_feedback_ms: 0,
            memory_mismatch_ms: 0,
            memory_preview_ms: 0,
            menu_welcome_ms: 0,
            selection_welcome_ms: 0,
            command_clear_ms: 0,
        }
    }

    pub fn level_load(&self) -> Duration {
        Duration::from_millis(self.level_load_ms)
    }

    pub fn win_advance(&self) -> Duration {
        Duration::from_millis(self.win_advance_ms)
    }

    pub fn decryption_feedback(&self) -> Duration {
        Duration::from_millis(self.decryption_feedback_ms)
    }

    pub fn story_feedback(&self) -> Duration {
        Duration::from_millis(self.story_feedback_ms)
    }

    pub fn memory_mismatch(&self) -> Duration {
        Duration::from_millis(self.memory_mismatch_ms)
    }

    pub fn memory_preview(&self) -> Duration {
        Duration::from_millis(self.memory_preview_ms)
    }

    pub fn menu_welcome(&self) -> Duration {
        Duration::from_millis(self.menu_welcome_ms)
    }

    pub fn selection_welcome(&self) -> Duration {
        Duration::from_millis(self.selection_welcome_ms)
    }

    pub fn command_clear(&self) -> Duration {
        Duration::from_millis(self.command_clear_ms)
    }
}

/// Restart policy for the speech recognizer.
///
/// A recognition segment that ends is restarted after `base_delay_ms`.
/// A start that fails is retried after `base_delay_ms * 2^(attempt - 1)`
/// (exponent capped at 10). After `max_attempts` consecutive failed starts
/// the listener gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Backoff before restart number `attempt` (1-based).
    pub fn delay(&self, attempt: usize) -> Duration {
        if self.base_delay_ms == 0 {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(10) as u32;
        Duration::from_millis(self.base_delay_ms.saturating_mul(1_u64 << exponent))
    }
}

/// Top-level configuration for a garden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    pub rules: SessionRules,
    pub timings: Timings,
    pub keywords: KeywordTable,
    pub voice: RetryPolicy,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl GardenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Build a config from environment variables.
    ///
    /// `GARDEN_CONFIG` names a JSON file to start from; `GARDEN_SEED`,
    /// `GARDEN_MAX_LEVEL` and `GARDEN_VOICE_RETRIES` override single fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("GARDEN_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Some(seed) = env_parse::<u64>("GARDEN_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(max_level) = env_parse::<u32>("GARDEN_MAX_LEVEL")? {
            if max_level == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "GARDEN_MAX_LEVEL".to_string(),
                    value: "0".to_string(),
                });
            }
            config.rules.max_level = max_level;
        }
        if let Some(retries) = env_parse::<usize>("GARDEN_VOICE_RETRIES")? {
            config.voice.max_attempts = retries;
        }

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.rules.max_level = max_level;
        self
    }

    pub fn with_default_lives(mut self, lives: u32) -> Self {
        self.rules.default_lives = lives;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.voice = policy;
        self
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
