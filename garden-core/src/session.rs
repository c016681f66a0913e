//! Game session state machine.
//!
//! One session exists per visit to a minigame. It owns lives, level and
//! the current round, and turns round verdicts into phase changes. Every
//! delayed step is returned as an [`Effect`] carrying a [`Ticket`]; a
//! timer or content delivery whose ticket no longer matches is dropped.

use crate::character::Character;
use crate::config::{SessionRules, Timings};
use crate::content::{ContentError, ContentGenerator, ImagePrompt, ImageRef};
use crate::effect::{Effect, SessionTimer};
use crate::minigames::{setup_round, video, Action, Rejection, RoundState, Verdict};
use crate::mode::MinigameKind;
use crate::phrases;
use crate::shuffle::GardenRng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique identifier of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the owner of an async result: a session and one of its
/// level loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub session: SessionId,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the level (or a storyboard) to arrive. Input disabled.
    Loading,
    Playing,
    /// A wrong answer is being shown. Input disabled.
    Feedback,
    /// Level won; the next one loads shortly.
    Won,
    /// Out of lives. Only a restart is possible.
    GameOver,
    /// Every level is done.
    Completed,
}

// ============================================================================
// Content requests
// ============================================================================

/// Content needed to start a level.
#[derive(Debug, Clone)]
pub struct LevelRequest {
    pub ticket: Ticket,
    pub kind: MinigameKind,
    pub roster: Vec<Character>,
    /// Seed for the round's procedural parts.
    pub seed: u64,
}

/// A storyboard for the video creator.
#[derive(Debug, Clone)]
pub struct FramesRequest {
    pub ticket: Ticket,
    pub prompt: String,
    pub count: usize,
}

/// A portrait for the character creator.
#[derive(Debug, Clone)]
pub struct PortraitRequest {
    pub ticket: Ticket,
    pub prompt: ImagePrompt,
}

#[derive(Debug, Clone)]
pub enum ContentRequest {
    Level(LevelRequest),
    Frames(FramesRequest),
    Portrait(PortraitRequest),
}

/// A fulfilled content request, ready to hand back to the session.
#[derive(Debug, Clone)]
pub enum Delivery {
    Level { ticket: Ticket, round: RoundState },
    /// Empty when the storyboard could not be generated.
    Frames { ticket: Ticket, frames: Vec<ImageRef> },
    Portrait {
        ticket: Ticket,
        image: Result<ImageRef, ContentError>,
    },
}

impl Delivery {
    pub fn ticket(&self) -> Ticket {
        match self {
            Delivery::Level { ticket, .. }
            | Delivery::Frames { ticket, .. }
            | Delivery::Portrait { ticket, .. } => *ticket,
        }
    }
}

impl ContentRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            ContentRequest::Level(r) => r.ticket,
            ContentRequest::Frames(r) => r.ticket,
            ContentRequest::Portrait(r) => r.ticket,
        }
    }

    /// Run the request against `generator`.
    ///
    /// Never fails: generation errors are replaced by placeholder content
    /// (levels) or an empty storyboard (frames). Portrait errors are passed
    /// on to the creator, which picks its own fallback.
    pub async fn fulfill(self, generator: &dyn ContentGenerator) -> Delivery {
        match self {
            ContentRequest::Level(request) => {
                let mut rng = GardenRng::seeded(request.seed);
                let round = setup_round(request.kind, &request.roster, &mut rng, generator).await;
                Delivery::Level {
                    ticket: request.ticket,
                    round,
                }
            }
            ContentRequest::Frames(request) => {
                let frames = match generator.generate_frames(&request.prompt, request.count).await {
                    Ok(frames) => frames,
                    Err(e) => {
                        warn!(error = %e, "storyboard generation failed");
                        Vec::new()
                    }
                };
                Delivery::Frames {
                    ticket: request.ticket,
                    frames,
                }
            }
            ContentRequest::Portrait(request) => Delivery::Portrait {
                ticket: request.ticket,
                image: generator.generate_image(&request.prompt).await,
            },
        }
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    kind: MinigameKind,
    rules: SessionRules,
    timings: Timings,
    roster: Vec<Character>,
    rng: GardenRng,
    lives: u32,
    level: u32,
    phase: SessionPhase,
    /// Bumped on every level load.
    epoch: u64,
    round: Option<RoundState>,
}

impl GameSession {
    /// A session at level 1 with full lives. Nothing happens until
    /// [`GameSession::start`].
    pub fn new(
        kind: MinigameKind,
        rules: SessionRules,
        timings: Timings,
        roster: Vec<Character>,
        rng: GardenRng,
    ) -> Self {
        let lives = entry_lives(&rules, kind);
        Self {
            id: SessionId::new(),
            kind,
            rules,
            timings,
            roster,
            rng,
            lives,
            level: 1,
            phase: SessionPhase::Loading,
            epoch: 0,
            round: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> MinigameKind {
        self.kind
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives the session started with.
    pub fn max_lives(&self) -> u32 {
        entry_lives(&self.rules, self.kind)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.rules.max_level
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Ticket of the current level load.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            session: self.id,
            epoch: self.epoch,
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        info!(session = %self.id, kind = %self.kind, lives = self.lives, "session started");
        self.load_level()
    }

    fn load_level(&mut self) -> Vec<Effect> {
        self.round = None;
        if self.level > self.rules.max_level {
            info!(session = %self.id, kind = %self.kind, "all levels completed");
            self.phase = SessionPhase::Completed;
            return vec![Effect::announce(phrases::COMPLETED)];
        }

        self.epoch += 1;
        self.phase = SessionPhase::Loading;
        info!(session = %self.id, level = self.level, "loading level");
        vec![Effect::schedule(
            self.timings.level_load(),
            SessionTimer::Setup(self.ticket()),
        )]
    }

    pub fn on_timer(&mut self, timer: SessionTimer) -> Vec<Effect> {
        if timer.ticket() != self.ticket() {
            debug!(?timer, "dropping stale timer");
            return Vec::new();
        }

        match timer {
            SessionTimer::Setup(ticket) if self.phase == SessionPhase::Loading => {
                vec![Effect::Request(ContentRequest::Level(LevelRequest {
                    ticket,
                    kind: self.kind,
                    roster: self.roster.clone(),
                    seed: self.rng.next_seed(),
                }))]
            }
            SessionTimer::PreviewEnd(_) => match &mut self.round {
                Some(RoundState::MemoryMatch(round)) if round.in_preview() => {
                    round.end_preview();
                    vec![Effect::announce(phrases::MEMORY_GO)]
                }
                _ => Vec::new(),
            },
            SessionTimer::Settle(_) if self.phase == SessionPhase::Feedback => {
                if let Some(round) = &mut self.round {
                    round.settle();
                }
                self.handle_fail()
            }
            SessionTimer::Advance(_) if self.phase == SessionPhase::Won => {
                self.level += 1;
                self.load_level()
            }
            _ => {
                debug!(?timer, phase = ?self.phase, "timer does not apply in this phase");
                Vec::new()
            }
        }
    }

    /// Install delivered content.
    pub fn on_content(&mut self, delivery: Delivery) -> Vec<Effect> {
        if delivery.ticket() != self.ticket() || self.phase != SessionPhase::Loading {
            debug!(ticket = ?delivery.ticket(), "dropping stale delivery");
            return Vec::new();
        }

        match delivery {
            Delivery::Level { round, .. } => {
                if self.round.is_some() || round.kind() != self.kind {
                    debug!("dropping unexpected level delivery");
                    return Vec::new();
                }
                let mut effects = vec![Effect::announce(round.host_message())];
                if matches!(round, RoundState::MemoryMatch(_)) {
                    effects.push(Effect::schedule(
                        self.timings.memory_preview(),
                        SessionTimer::PreviewEnd(self.ticket()),
                    ));
                }
                self.round = Some(round);
                self.phase = SessionPhase::Playing;
                effects
            }
            Delivery::Portrait { .. } => {
                debug!("dropping portrait delivered to a game session");
                Vec::new()
            }
            Delivery::Frames { frames, .. } => {
                let Some(RoundState::VideoCreator(round)) = &mut self.round else {
                    debug!("dropping frames outside the video creator");
                    return Vec::new();
                };
                self.phase = SessionPhase::Playing;
                if frames.is_empty() {
                    round.cancel_generation();
                    vec![Effect::announce(phrases::VIDEO_ERROR)]
                } else {
                    round.show_frames(frames);
                    vec![Effect::announce(phrases::VIDEO_READY)]
                }
            }
        }
    }

    /// Apply a player action. Ignored unless the session is playing.
    pub fn act(&mut self, action: &Action) -> Vec<Effect> {
        if self.phase != SessionPhase::Playing {
            debug!(?action, phase = ?self.phase, "input disabled");
            return Vec::new();
        }
        let Some(round) = &mut self.round else {
            return Vec::new();
        };

        let verdict = round.evaluate(action);
        debug!(?action, ?verdict, "evaluated");
        match verdict {
            Verdict::Continue => Vec::new(),
            Verdict::Progress => self.on_progress(),
            Verdict::Rejected(rejection) => self.on_rejected(rejection),
            Verdict::Win => {
                info!(session = %self.id, level = self.level, "level won");
                self.phase = SessionPhase::Won;
                vec![
                    Effect::announce(phrases::WIN),
                    Effect::schedule(self.timings.win_advance(), SessionTimer::Advance(self.ticket())),
                ]
            }
            Verdict::Fail => match self.feedback_delay() {
                Some(delay) => {
                    self.phase = SessionPhase::Feedback;
                    vec![Effect::schedule(delay, SessionTimer::Settle(self.ticket()))]
                }
                None => self.handle_fail(),
            },
        }
    }

    /// Start over after running out of lives.
    pub fn restart(&mut self) -> Vec<Effect> {
        if self.phase != SessionPhase::GameOver {
            return Vec::new();
        }
        self.lives = self.max_lives();
        self.level = 1;
        info!(session = %self.id, "restarting");
        self.load_level()
    }

    fn handle_fail(&mut self) -> Vec<Effect> {
        if self.lives > 1 {
            self.lives -= 1;
            self.phase = SessionPhase::Playing;
            debug!(lives = self.lives, "life lost");
            vec![Effect::announce(phrases::RETRY)]
        } else {
            self.lives = 0;
            self.phase = SessionPhase::GameOver;
            info!(session = %self.id, level = self.level, "game over");
            vec![Effect::announce(phrases::GAME_OVER)]
        }
    }

    fn on_progress(&mut self) -> Vec<Effect> {
        match self.kind {
            MinigameKind::FindDifference => vec![Effect::announce(phrases::DIFFERENCE_FOUND)],
            MinigameKind::MemoryMatch => vec![Effect::announce(phrases::PAIR_FOUND)],
            MinigameKind::Puzzle => vec![Effect::announce(phrases::PIECE_PLACED)],
            MinigameKind::VideoCreator => {
                let Some(RoundState::VideoCreator(round)) = &self.round else {
                    return Vec::new();
                };
                let request = FramesRequest {
                    ticket: self.ticket(),
                    prompt: round.prompt().to_string(),
                    count: video::FRAME_COUNT,
                };
                self.phase = SessionPhase::Loading;
                vec![
                    Effect::announce(phrases::VIDEO_DRAWING),
                    Effect::Request(ContentRequest::Frames(request)),
                ]
            }
            _ => Vec::new(),
        }
    }

    fn on_rejected(&self, rejection: Rejection) -> Vec<Effect> {
        let cue = match (self.kind, rejection) {
            (_, Rejection::Wall) => phrases::WALL,
            (_, Rejection::WrongSlot) => phrases::WRONG_SLOT,
            (MinigameKind::VideoCreator, Rejection::Invalid) => phrases::VIDEO_EMPTY,
            _ => return Vec::new(),
        };
        vec![Effect::announce(cue)]
    }

    /// How long a wrong answer stays visible before it costs a life.
    fn feedback_delay(&self) -> Option<Duration> {
        match self.kind {
            MinigameKind::Decryption => Some(self.timings.decryption_feedback()),
            MinigameKind::Story => Some(self.timings.story_feedback()),
            MinigameKind::MemoryMatch => Some(self.timings.memory_mismatch()),
            _ => None,
        }
    }
}

fn entry_lives(rules: &SessionRules, kind: MinigameKind) -> u32 {
    rules.default_lives.max(kind.min_lives())
}
