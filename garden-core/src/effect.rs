//! Side effects requested by the state machines.
//!
//! The navigator and the game session never sleep, spawn or call out.
//! They return effects and the runtime carries them out, feeding results
//! back in as events.

use crate::session::{ContentRequest, Ticket};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Effect {
    /// Say something through the announcer.
    Announce(String),

    /// Fire `timer` once `after` has elapsed.
    Schedule { after: Duration, timer: Timer },

    /// Ask the content generator for a level or a storyboard.
    Request(ContentRequest),
}

impl Effect {
    pub fn announce(text: impl Into<String>) -> Self {
        Effect::Announce(text.into())
    }

    pub fn schedule(after: Duration, timer: impl Into<Timer>) -> Self {
        Effect::Schedule {
            after,
            timer: timer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Session(SessionTimer),
    /// Welcome message for the screen entered at navigation `epoch`.
    Welcome { epoch: u64 },
}

/// Delayed steps of a game session. Each carries the ticket of the level
/// that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimer {
    /// Loading delay is over; request the level content.
    Setup(Ticket),
    /// Memory match preview is over.
    PreviewEnd(Ticket),
    /// The wrong answer has been shown long enough.
    Settle(Ticket),
    /// Win celebration is over; go to the next level.
    Advance(Ticket),
}

impl SessionTimer {
    pub fn ticket(&self) -> Ticket {
        match *self {
            SessionTimer::Setup(t)
            | SessionTimer::PreviewEnd(t)
            | SessionTimer::Settle(t)
            | SessionTimer::Advance(t) => t,
        }
    }
}

impl From<SessionTimer> for Timer {
    fn from(timer: SessionTimer) -> Self {
        Timer::Session(timer)
    }
}
