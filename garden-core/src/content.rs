//! Content-generation boundary.
//!
//! The garden asks an external service for images (characters, puzzle
//! backgrounds) and short ordered image sequences (story frames). The
//! service is opaque: anything implementing [`ContentGenerator`] works.
//! Failures never block a game; callers substitute placeholders.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from the content generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("content service unavailable")]
    Unavailable,

    #[error("content service returned nothing")]
    Empty,

    #[error("content service error: {0}")]
    Backend(String),
}

/// Reference to a rendered image: a URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Deterministic stand-in image used when generation fails.
    pub fn placeholder(seed: u64) -> Self {
        Self(format!("https://picsum.photos/200/200?random={seed}"))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with("https://picsum.photos/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePrompt {
    pub description: String,
    /// A child's drawing (PNG bytes) to turn into a rendered character.
    pub reference_sketch: Option<Vec<u8>>,
}

impl ImagePrompt {
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            reference_sketch: None,
        }
    }

    pub fn with_sketch(description: impl Into<String>, sketch: Vec<u8>) -> Self {
        Self {
            description: description.into(),
            reference_sketch: Some(sketch),
        }
    }
}

/// Prompts for an `count`-frame storyboard of `story`.
pub fn scene_prompts(story: &str, count: usize) -> Vec<String> {
    let base = format!(
        "A cute, pastel, 3D rendered scene for a kids story. Story context: \"{story}\". \
         Toy-like, soft lighting, magic garden theme, no text in the image."
    );
    (1..=count)
        .map(|scene| {
            let beat = match (scene, count) {
                (1, _) => "The beginning. Establish the characters and setting.",
                (s, c) if s == c => "The end. The conclusion of the moment.",
                _ => "The middle. The action is happening.",
            };
            format!("{base} Scene {scene}: {beat}")
        })
        .collect()
}

/// An external image generation service.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Render one image.
    async fn generate_image(&self, prompt: &ImagePrompt) -> Result<ImageRef, ContentError>;

    /// Render an ordered sequence of `count` frames for a story.
    ///
    /// Frames are requested concurrently and returned all together, or
    /// not at all if any of them fails.
    async fn generate_frames(
        &self,
        story: &str,
        count: usize,
    ) -> Result<Vec<ImageRef>, ContentError> {
        let prompts: Vec<ImagePrompt> = scene_prompts(story, count)
            .into_iter()
            .map(ImagePrompt::text)
            .collect();
        let frames = try_join_all(prompts.iter().map(|p| self.generate_image(p))).await?;
        if frames.is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(frames)
    }
}

/// A generator with no backend. Every request fails, so every caller
/// falls back to its placeholder content.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

#[async_trait]
impl ContentGenerator for PlaceholderGenerator {
    async fn generate_image(&self, _prompt: &ImagePrompt) -> Result<ImageRef, ContentError> {
        Err(ContentError::Unavailable)
    }
}
