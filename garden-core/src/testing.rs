//! Testing utilities for the garden.
//!
//! This module provides tools for integration testing:
//! - `MockGenerator` for scripted content generation without a backend
//! - `RecordingAnnouncer` to capture what the garden says
//! - `ScriptedSpeech` for a speech source fed from a script
//! - `TestHarness` for driving the navigator step by step
//! - Assertion helpers for verifying game state

use crate::config::{GardenConfig, Timings};
use crate::content::{ContentError, ContentGenerator, ImagePrompt, ImageRef};
use crate::effect::Effect;
use crate::minigames::{Action, RoundState};
use crate::mode::NavigationMode;
use crate::navigation::Navigator;
use crate::session::{ContentRequest, SessionPhase};
use crate::voice::{Announcer, SpeechSource, TranscriptEvent, VoiceError};
use async_trait::async_trait;
use futures::executor::block_on;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Content
// ============================================================================

/// A content generator with scripted results.
///
/// Queued results are returned in order; once the queue is empty every
/// request gets the default result. Every prompt is recorded.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    queue: Arc<Mutex<VecDeque<Result<ImageRef, ContentError>>>>,
    default: Result<ImageRef, ContentError>,
    prompts: Arc<Mutex<Vec<ImagePrompt>>>,
}

impl MockGenerator {
    /// Every request succeeds with a fixed image.
    pub fn succeeding() -> Self {
        Self::with_default(Ok(ImageRef::new("mock://image")))
    }

    /// Every request fails.
    pub fn failing() -> Self {
        Self::with_default(Err(ContentError::Unavailable))
    }

    fn with_default(default: Result<ImageRef, ContentError>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            default,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a result for the next request.
    pub fn push(&self, result: Result<ImageRef, ContentError>) -> &Self {
        lock(&self.queue).push_back(result);
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<ImagePrompt> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate_image(&self, prompt: &ImagePrompt) -> Result<ImageRef, ContentError> {
        lock(&self.prompts).push(prompt.clone());
        let next = lock(&self.queue).pop_front();
        next.unwrap_or_else(|| self.default.clone())
    }
}

// ============================================================================
// Voice
// ============================================================================

/// Records every announcement.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnnouncer {
    said: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn said(&self) -> Vec<String> {
        lock(&self.said).clone()
    }

    pub fn last(&self) -> Option<String> {
        lock(&self.said).last().cloned()
    }

    pub fn contains(&self, text: &str) -> bool {
        lock(&self.said).iter().any(|s| s == text)
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
        lock(&self.said).push(text.to_string());
    }
}

/// One scripted recognition segment.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Deliver these events, then end the segment.
    Events(Vec<TranscriptEvent>),
    /// Fail to start.
    Error(VoiceError),
}

/// A speech source that plays back segments. When the script runs out,
/// every start fails with [`VoiceError::Recognition`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpeech {
    script: Arc<Mutex<VecDeque<Segment>>>,
    starts: Arc<Mutex<usize>>,
    stops: Arc<Mutex<usize>>,
}

impl ScriptedSpeech {
    pub fn new(script: Vec<Segment>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Self::default()
        }
    }

    /// One segment of final utterances.
    pub fn saying(utterances: &[&str]) -> Self {
        Self::new(vec![Segment::Events(
            utterances
                .iter()
                .map(|u| TranscriptEvent::Final(u.to_string()))
                .collect(),
        )])
    }

    /// Number of times the source was started.
    pub fn starts(&self) -> usize {
        *lock(&self.starts)
    }

    pub fn stops(&self) -> usize {
        *lock(&self.stops)
    }
}

#[async_trait]
impl SpeechSource for ScriptedSpeech {
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, VoiceError> {
        *lock(&self.starts) += 1;
        let segment = lock(&self.script).pop_front();
        match segment {
            Some(Segment::Events(events)) => {
                let (tx, rx) = mpsc::channel(events.len().max(1));
                for event in events {
                    let _ = tx.try_send(event);
                }
                Ok(rx)
            }
            Some(Segment::Error(e)) => Err(e),
            None => Err(VoiceError::Recognition("script exhausted".to_string())),
        }
    }

    async fn stop(&self) {
        *lock(&self.stops) += 1;
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Drives a [`Navigator`] without a runtime.
///
/// Timers fire as soon as the harness is told to flush, and content
/// requests are fulfilled with the mock generator by blocking on them.
pub struct TestHarness {
    pub navigator: Navigator,
    pub generator: MockGenerator,
    /// Everything announced so far.
    pub announced: Vec<String>,
    pending: VecDeque<Effect>,
}

impl TestHarness {
    /// A seeded navigator with default rules and instant timings.
    pub fn new() -> Self {
        Self::with_config(GardenConfig::new().with_seed(42).with_timings(Timings::instant()))
    }

    pub fn with_config(config: GardenConfig) -> Self {
        Self {
            navigator: Navigator::new(config),
            generator: MockGenerator::succeeding(),
            announced: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn with_generator(mut self, generator: MockGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Queue effects without running them.
    pub fn absorb(&mut self, effects: Vec<Effect>) -> &mut Self {
        for effect in effects {
            match effect {
                Effect::Announce(text) => self.announced.push(text),
                other => self.pending.push_back(other),
            }
        }
        self
    }

    /// Run the oldest pending effect. Returns `false` if nothing was pending.
    pub fn step(&mut self) -> bool {
        let Some(effect) = self.pending.pop_front() else {
            return false;
        };
        let effects = match effect {
            Effect::Schedule { timer, .. } => self.navigator.on_timer(timer),
            Effect::Request(request) => {
                let delivery = block_on(request.fulfill(&self.generator));
                self.navigator.on_content(delivery)
            }
            Effect::Announce(text) => {
                self.announced.push(text);
                Vec::new()
            }
        };
        self.absorb(effects);
        true
    }

    /// Fire every pending timer and fulfil every pending request, including
    /// the ones they cause, until nothing is left.
    pub fn flush(&mut self) -> &mut Self {
        while self.step() {}
        self
    }

    /// Pending effects that have not run yet.
    pub fn pending(&self) -> impl Iterator<Item = &Effect> {
        self.pending.iter()
    }

    /// Take the next pending content request without fulfilling it.
    pub fn take_request(&mut self) -> Option<ContentRequest> {
        let index = self
            .pending
            .iter()
            .position(|e| matches!(e, Effect::Request(_)))?;
        match self.pending.remove(index) {
            Some(Effect::Request(request)) => Some(request),
            _ => None,
        }
    }

    pub fn say(&mut self, utterance: &str) -> &mut Self {
        let effects = self.navigator.handle_utterance(utterance);
        self.absorb(effects).flush()
    }

    pub fn open(&mut self, mode: NavigationMode) -> &mut Self {
        let effects = self.navigator.open(mode);
        self.absorb(effects).flush()
    }

    pub fn back(&mut self) -> &mut Self {
        let effects = self.navigator.back();
        self.absorb(effects).flush()
    }

    pub fn act(&mut self, action: Action) -> &mut Self {
        let effects = self.navigator.act(&action);
        self.absorb(effects).flush()
    }

    pub fn restart(&mut self) -> &mut Self {
        let effects = self.navigator.restart();
        self.absorb(effects).flush()
    }

    pub fn mode(&self) -> NavigationMode {
        self.navigator.mode()
    }

    pub fn phase(&self) -> Option<SessionPhase> {
        self.navigator.session().map(|s| s.phase())
    }

    pub fn lives(&self) -> Option<u32> {
        self.navigator.session().map(|s| s.lives())
    }

    pub fn level(&self) -> Option<u32> {
        self.navigator.session().map(|s| s.level())
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.navigator.session().and_then(|s| s.round())
    }

    pub fn last_announced(&self) -> Option<&str> {
        self.announced.last().map(String::as_str)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Collect the announcements from a batch of effects.
pub fn announcements(effects: &[Effect]) -> Vec<&str> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Announce(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Assert the navigator is on `mode`.
#[track_caller]
pub fn assert_mode(harness: &TestHarness, mode: NavigationMode) {
    let actual = harness.mode();
    assert_eq!(actual, mode, "Expected mode {mode}, got {actual}");
}

/// Assert the active session is in `phase`.
#[track_caller]
pub fn assert_phase(harness: &TestHarness, phase: SessionPhase) {
    assert_eq!(
        harness.phase(),
        Some(phase),
        "Expected session phase {phase:?}"
    );
}

/// Assert the active session has `lives` lives.
#[track_caller]
pub fn assert_lives(harness: &TestHarness, lives: u32) {
    assert_eq!(harness.lives(), Some(lives), "Expected {lives} lives");
}

/// Assert the active session is on `level`.
#[track_caller]
pub fn assert_level(harness: &TestHarness, level: u32) {
    assert_eq!(harness.level(), Some(level), "Expected level {level}");
}

/// Assert something was announced.
#[track_caller]
pub fn assert_announced(harness: &TestHarness, text: &str) {
    assert!(
        harness.announced.iter().any(|s| s == text),
        "Expected '{text}' to be announced, got {:?}",
        harness.announced
    );
}
