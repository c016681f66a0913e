//! Async driver for the garden.
//!
//! [`Garden`] owns the navigator and carries out the effects it returns:
//! announcements go straight to the announcer, timers and content requests
//! become spawned tasks that report back over a channel. Events are
//! handled one at a time, so the state machines never see concurrency.

use crate::config::{ConfigError, GardenConfig};
use crate::content::ContentGenerator;
use crate::creator::CreatorError;
use crate::effect::{Effect, Timer};
use crate::minigames::Action;
use crate::mode::NavigationMode;
use crate::navigation::Navigator;
use crate::session::Delivery;
use crate::voice::{Announcer, CommandSubscription, VoiceError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GardenError {
    #[error("character creator: {0}")]
    Creator(#[from] CreatorError),

    #[error("voice: {0}")]
    Voice(#[from] VoiceError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// Something that finished in the background.
#[derive(Debug)]
pub enum GardenEvent {
    Timer(Timer),
    Delivered(Delivery),
}

/// An on-screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GardenInput {
    Open(NavigationMode),
    Back,
    Act(Action),
    Restart,
    FinishCompleted,
    /// Typed text, handled like a spoken utterance.
    Say(String),
    NameCharacter(String),
    DescribeCharacter(String),
    /// A drawing for the character creator, as PNG bytes.
    Sketch(Vec<u8>),
    GenerateCharacter,
    SaveCharacter,
}

pub struct Garden {
    navigator: Navigator,
    generator: Arc<dyn ContentGenerator>,
    announcer: Arc<dyn Announcer>,
    events_tx: mpsc::UnboundedSender<GardenEvent>,
    events_rx: mpsc::UnboundedReceiver<GardenEvent>,
    /// Spawned tasks that have not reported back yet.
    pending: usize,
}

impl Garden {
    pub fn new(
        config: GardenConfig,
        generator: Arc<dyn ContentGenerator>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            navigator: Navigator::new(config),
            generator,
            announcer,
            events_tx,
            events_rx,
            pending: 0,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Number of timers and requests still in flight.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Show the menu.
    pub fn start(&mut self) {
        let effects = self.navigator.start();
        self.apply(effects);
    }

    /// Carry out effects. Must be called inside a tokio runtime.
    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Announce(text) => self.announcer.announce(&text),
                Effect::Schedule { after, timer } => {
                    let tx = self.events_tx.clone();
                    self.pending += 1;
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = tx.send(GardenEvent::Timer(timer));
                    });
                }
                Effect::Request(request) => {
                    let tx = self.events_tx.clone();
                    let generator = Arc::clone(&self.generator);
                    self.pending += 1;
                    debug!(ticket = ?request.ticket(), "requesting content");
                    tokio::spawn(async move {
                        let delivery = request.fulfill(generator.as_ref()).await;
                        let _ = tx.send(GardenEvent::Delivered(delivery));
                    });
                }
            }
        }
    }

    /// Wait for the next background event. `None` when nothing is pending.
    pub async fn next_event(&mut self) -> Option<GardenEvent> {
        if self.pending == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.pending -= 1;
        Some(event)
    }

    pub fn dispatch(&mut self, event: GardenEvent) {
        let effects = match event {
            GardenEvent::Timer(timer) => self.navigator.on_timer(timer),
            GardenEvent::Delivered(delivery) => self.navigator.on_content(delivery),
        };
        self.apply(effects);
    }

    /// Handle events until nothing is in flight.
    pub async fn settle(&mut self) {
        while let Some(event) = self.next_event().await {
            self.dispatch(event);
        }
    }

    pub fn hear(&mut self, utterance: &str) {
        let effects = self.navigator.handle_utterance(utterance);
        self.apply(effects);
    }

    pub fn input(&mut self, input: GardenInput) -> Result<(), GardenError> {
        let effects = match input {
            GardenInput::Open(mode) => self.navigator.open(mode),
            GardenInput::Back => self.navigator.back(),
            GardenInput::Act(action) => self.navigator.act(&action),
            GardenInput::Restart => self.navigator.restart(),
            GardenInput::FinishCompleted => self.navigator.finish_completed(),
            GardenInput::Say(text) => self.navigator.handle_utterance(&text),
            GardenInput::NameCharacter(name) => {
                self.creator()?.set_name(name);
                Vec::new()
            }
            GardenInput::DescribeCharacter(description) => {
                self.creator()?.set_description(description);
                Vec::new()
            }
            GardenInput::Sketch(png) => {
                self.creator()?.set_sketch(png);
                Vec::new()
            }
            GardenInput::GenerateCharacter => self.navigator.generate_character()?,
            GardenInput::SaveCharacter => self.navigator.save_character()?,
        };
        self.apply(effects);
        Ok(())
    }

    fn creator(&mut self) -> Result<&mut crate::creator::CharacterCreator, CreatorError> {
        self.navigator.creator_mut().ok_or(CreatorError::NotOpen)
    }

    /// Run until the input channel closes.
    ///
    /// Voice commands, on-screen input and background events are served
    /// in arrival order, one at a time.
    pub async fn run(
        &mut self,
        mut commands: CommandSubscription,
        mut inputs: mpsc::Receiver<GardenInput>,
    ) {
        self.start();
        loop {
            tokio::select! {
                Some(command) = commands.next_command() => {
                    debug!(command = %command, "voice command");
                    self.hear(&command);
                }
                input = inputs.recv() => {
                    let Some(input) = input else {
                        info!("input closed, stopping");
                        break;
                    };
                    if let Err(e) = self.input(input) {
                        warn!(error = %e, "input rejected");
                    }
                }
                Some(event) = self.events_rx.recv() => {
                    self.pending = self.pending.saturating_sub(1);
                    self.dispatch(event);
                }
            }
        }
    }
}
