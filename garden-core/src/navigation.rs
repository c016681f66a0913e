//! Navigation state machine.
//!
//! The [`Navigator`] holds the current screen, the roster, and whichever
//! game session or character creator belongs to that screen. Voice
//! commands, on-screen navigation and async results all come through here;
//! every call returns the effects the runtime should carry out.

use crate::character::Roster;
use crate::command;
use crate::config::GardenConfig;
use crate::creator::{CharacterCreator, CreatorError};
use crate::effect::{Effect, Timer};
use crate::minigames::Action;
use crate::mode::{MinigameKind, NavigationMode};
use crate::phrases;
use crate::session::{ContentRequest, Delivery, GameSession, PortraitRequest, SessionPhase};
use crate::shuffle::GardenRng;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Navigator {
    config: GardenConfig,
    mode: NavigationMode,
    /// Bumped on every transition; welcome timers from older screens are dropped.
    epoch: u64,
    roster: Roster,
    session: Option<GameSession>,
    /// Whether the current session's sticker was handed out.
    rewarded: bool,
    creator: Option<CharacterCreator>,
    rng: GardenRng,
}

impl Navigator {
    pub fn new(config: GardenConfig) -> Self {
        let rng = GardenRng::from_option(config.seed);
        Self {
            config,
            mode: NavigationMode::Menu,
            epoch: 0,
            roster: Roster::new(),
            session: None,
            rewarded: false,
            creator: None,
            rng,
        }
    }

    /// Effects for showing the initial menu.
    pub fn start(&mut self) -> Vec<Effect> {
        self.enter(NavigationMode::Menu)
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn creator(&self) -> Option<&CharacterCreator> {
        self.creator.as_ref()
    }

    pub fn creator_mut(&mut self) -> Option<&mut CharacterCreator> {
        self.creator.as_mut()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Handle one finalized utterance.
    ///
    /// Navigation commands win. Anything else is dictation: it goes to the
    /// character creator, or becomes the video creator's story. A command
    /// naming the current screen is dictation too ("bir kedi videosu").
    pub fn handle_utterance(&mut self, text: &str) -> Vec<Effect> {
        let target = command::interpret(self.mode, text, &self.config.keywords);
        if let Some(target) = target.filter(|&t| t != self.mode) {
            debug!(utterance = text, to = %target, "voice command");
            return self.enter(target);
        }

        match self.mode {
            NavigationMode::CharacterCreator => {
                if let Some(creator) = &mut self.creator {
                    creator.hear(text);
                }
                Vec::new()
            }
            NavigationMode::Game(MinigameKind::VideoCreator) => {
                self.act(&Action::SubmitPrompt(text.to_string()))
            }
            _ => Vec::new(),
        }
    }

    /// Go to `target`. Reopening the current screen does nothing.
    pub fn open(&mut self, target: NavigationMode) -> Vec<Effect> {
        if target == self.mode {
            return Vec::new();
        }
        self.enter(target)
    }

    /// One level up: minigame to game selection, anything else to the menu.
    pub fn back(&mut self) -> Vec<Effect> {
        match self.mode.parent() {
            Some(parent) => self.enter(parent),
            None => Vec::new(),
        }
    }

    fn enter(&mut self, target: NavigationMode) -> Vec<Effect> {
        if let Some(session) = self.session.take() {
            debug!(session = %session.id(), "session discarded");
        }
        self.creator = None;
        self.rewarded = false;

        info!(from = %self.mode, to = %target, "navigating");
        self.mode = target;
        self.epoch += 1;
        let welcome = Timer::Welcome { epoch: self.epoch };
        let timings = &self.config.timings;

        match target {
            NavigationMode::Menu => vec![Effect::schedule(timings.menu_welcome(), welcome)],
            NavigationMode::GameSelection => {
                vec![Effect::schedule(timings.selection_welcome(), welcome)]
            }
            NavigationMode::CharacterCreator => {
                self.creator = Some(CharacterCreator::new());
                vec![Effect::announce(phrases::CREATOR_GREETING)]
            }
            NavigationMode::Game(kind) => {
                let rng = GardenRng::seeded(self.rng.next_seed());
                let mut session = GameSession::new(
                    kind,
                    self.config.rules,
                    self.config.timings,
                    self.roster.as_slice().to_vec(),
                    rng,
                );
                let effects = session.start();
                self.session = Some(session);
                effects
            }
        }
    }

    // ========================================================================
    // Game session
    // ========================================================================

    /// A player action on the current minigame.
    pub fn act(&mut self, action: &Action) -> Vec<Effect> {
        let effects = match &mut self.session {
            Some(session) => session.act(action),
            None => Vec::new(),
        };
        self.reward_if_completed();
        effects
    }

    /// Start the current minigame over after a game over.
    pub fn restart(&mut self) -> Vec<Effect> {
        match &mut self.session {
            Some(session) => session.restart(),
            None => Vec::new(),
        }
    }

    /// Leave the completed screen for the game selection.
    pub fn finish_completed(&mut self) -> Vec<Effect> {
        let completed = self
            .session
            .as_ref()
            .is_some_and(|s| s.phase() == SessionPhase::Completed);
        if !completed {
            return Vec::new();
        }
        self.enter(NavigationMode::GameSelection)
    }

    /// Hand out the minigame's sticker once the session is completed.
    fn reward_if_completed(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if self.rewarded || session.phase() != SessionPhase::Completed {
            return;
        }
        let sticker = session.kind().icon();
        info!(sticker, characters = self.roster.len(), "awarding sticker");
        self.roster.award_all(sticker);
        self.rewarded = true;
    }

    // ========================================================================
    // Character creator
    // ========================================================================

    /// Ask for the creator's portrait.
    pub fn generate_character(&mut self) -> Result<Vec<Effect>, CreatorError> {
        let creator = self
            .creator
            .as_mut()
            .ok_or(CreatorError::NotOpen)?;
        let (ticket, prompt) = creator.begin_generation()?;
        Ok(vec![
            Effect::announce(phrases::CREATOR_WORKING),
            Effect::Request(ContentRequest::Portrait(PortraitRequest { ticket, prompt })),
        ])
    }

    /// Add the previewed character to the roster and return to the menu.
    pub fn save_character(&mut self) -> Result<Vec<Effect>, CreatorError> {
        let creator = self
            .creator
            .as_ref()
            .ok_or(CreatorError::NotOpen)?;
        let character = creator.save()?;
        info!(name = %character.name, id = %character.id, "character saved");
        self.roster.add(character);

        let mut effects = vec![Effect::announce(phrases::CREATOR_SAVED)];
        effects.extend(self.enter(NavigationMode::Menu));
        Ok(effects)
    }

    // ========================================================================
    // Async results
    // ========================================================================

    pub fn on_timer(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::Welcome { epoch } if epoch == self.epoch => match self.mode {
                NavigationMode::Menu => vec![Effect::announce(phrases::MENU_WELCOME)],
                NavigationMode::GameSelection => {
                    vec![Effect::announce(phrases::SELECTION_WELCOME)]
                }
                _ => Vec::new(),
            },
            Timer::Welcome { epoch } => {
                debug!(epoch, current = self.epoch, "dropping stale welcome");
                Vec::new()
            }
            Timer::Session(timer) => {
                let Some(session) = &mut self.session else {
                    debug!(?timer, "no session for timer");
                    return Vec::new();
                };
                let effects = session.on_timer(timer);
                self.reward_if_completed();
                effects
            }
        }
    }

    pub fn on_content(&mut self, delivery: Delivery) -> Vec<Effect> {
        if let Delivery::Portrait { ticket, image } = delivery {
            return match &mut self.creator {
                Some(creator) if creator.ticket() == ticket => {
                    creator.finish_generation(image);
                    vec![Effect::announce(phrases::CREATOR_PREVIEW)]
                }
                _ => {
                    debug!(?ticket, "dropping stale portrait");
                    Vec::new()
                }
            };
        }

        match &mut self.session {
            Some(session) => session.on_content(delivery),
            None => {
                debug!(ticket = ?delivery.ticket(), "no session for delivery");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::content::ImageRef;
    use crate::testing::announcements;

    fn navigator() -> Navigator {
        Navigator::new(GardenConfig::new().with_seed(7).with_timings(Timings::default()))
    }

    fn welcome_of(effects: &[Effect]) -> Timer {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Schedule {
                    timer: t @ Timer::Welcome { .. },
                    ..
                } => Some(*t),
                _ => None,
            })
            .expect("no welcome scheduled")
    }

    #[test]
    fn test_voice_walks_down_and_up() {
        let mut nav = navigator();
        nav.start();
        nav.handle_utterance("Hadi oyuna başlayalım");
        assert_eq!(nav.mode(), NavigationMode::GameSelection);

        nav.handle_utterance("küp oyunu");
        assert_eq!(nav.mode(), NavigationMode::Game(MinigameKind::Cube));
        assert!(nav.session().is_some());

        nav.handle_utterance("hafıza");
        assert_eq!(nav.mode(), NavigationMode::Game(MinigameKind::MemoryMatch));
        assert_eq!(nav.session().unwrap().lives(), 5);

        nav.handle_utterance("geri");
        assert_eq!(nav.mode(), NavigationMode::GameSelection);
        assert!(nav.session().is_none());
        nav.handle_utterance("ana sayfa");
        assert_eq!(nav.mode(), NavigationMode::Menu);
        assert!(nav.handle_utterance("menü").is_empty());
        assert_eq!(nav.mode(), NavigationMode::Menu);
    }

    #[test]
    fn test_reopen_same_game_keeps_session() {
        let mut nav = navigator();
        nav.open(NavigationMode::Game(MinigameKind::Pattern));
        let id = nav.session().unwrap().id();
        assert!(nav.open(NavigationMode::Game(MinigameKind::Pattern)).is_empty());
        assert_eq!(nav.session().unwrap().id(), id);

        nav.open(NavigationMode::Game(MinigameKind::Cube));
        assert_ne!(nav.session().unwrap().id(), id);
    }

    #[test]
    fn test_welcome_only_if_still_there() {
        let mut nav = navigator();
        let effects = nav.open(NavigationMode::GameSelection);
        let Effect::Schedule { after, .. } = &effects[0] else {
            panic!("expected a welcome timer");
        };
        assert_eq!(after.as_millis(), 500);
        let selection_welcome = welcome_of(&effects);

        let effects = nav.on_timer(selection_welcome);
        assert_eq!(announcements(&effects), [phrases::SELECTION_WELCOME]);

        let menu_welcome = welcome_of(&nav.back());
        nav.open(NavigationMode::CharacterCreator);
        assert!(nav.on_timer(menu_welcome).is_empty());
    }

    #[test]
    fn test_creator_takes_dictation() {
        let mut nav = navigator();
        let effects = nav.handle_utterance("karakter yapalım");
        assert_eq!(nav.mode(), NavigationMode::CharacterCreator);
        assert_eq!(announcements(&effects), [phrases::CREATOR_GREETING]);

        nav.handle_utterance("Pamuk");
        nav.handle_utterance("küp gibi kare bir tavşan");
        assert_eq!(nav.mode(), NavigationMode::CharacterCreator);
        let creator = nav.creator().unwrap();
        assert_eq!(creator.name(), "Pamuk");
        assert_eq!(creator.description(), "küp gibi kare bir tavşan");

        nav.handle_utterance("geri");
        assert_eq!(nav.mode(), NavigationMode::Menu);
        assert!(nav.creator().is_none());
    }

    #[test]
    fn test_save_character_goes_to_menu() {
        let mut nav = navigator();
        nav.open(NavigationMode::CharacterCreator);
        assert!(nav.save_character().is_err());

        nav.creator_mut().unwrap().set_name("Pamuk");
        let effects = nav.generate_character().unwrap();
        let ticket = match &effects[1] {
            Effect::Request(ContentRequest::Portrait(r)) => r.ticket,
            other => panic!("unexpected {other:?}"),
        };
        nav.on_content(Delivery::Portrait {
            ticket,
            image: Ok(ImageRef::new("pamuk.png")),
        });

        let effects = nav.save_character().unwrap();
        assert_eq!(announcements(&effects), [phrases::CREATOR_SAVED]);
        assert_eq!(nav.mode(), NavigationMode::Menu);
        assert_eq!(nav.roster().len(), 1);
        assert_eq!(nav.roster().as_slice()[0].image.as_str(), "pamuk.png");
    }

    #[test]
    fn test_back_from_menu_does_nothing() {
        let mut nav = navigator();
        assert!(nav.back().is_empty());
        assert_eq!(nav.mode(), NavigationMode::Menu);
    }
}
