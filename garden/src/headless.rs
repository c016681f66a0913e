//! Line-oriented driver for the garden.
//!
//! Plain lines stand in for the microphone: they are fed to the voice
//! engine as final transcripts. Lines starting with `#` are the taps and
//! drags a child would make on screen.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use garden_core::minigames::{Action, Direction};
use garden_core::{
    Announcer, Garden, GardenConfig, GardenInput, MinigameKind, NavigationMode,
    PlaceholderGenerator, SpeechSource, TranscriptEvent, VoiceContext, VoiceEngine, VoiceError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::info;

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Empty,
    Speak(String),
    Input(GardenInput),
    Sketch(PathBuf),
    Help,
    Quit,
}

fn parse_line(line: &str) -> anyhow::Result<Line> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Empty);
    }
    let Some(command) = line.strip_prefix('#') else {
        return Ok(Line::Speak(line.to_string()));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    let number = |what: &str| -> anyhow::Result<usize> {
        rest.parse()
            .map_err(|_| anyhow!("#{name} expects {what}, got '{rest}'"))
    };
    let text = || -> anyhow::Result<String> {
        if rest.is_empty() {
            bail!("#{name} expects some text");
        }
        Ok(rest.to_string())
    };

    let input = match name {
        "quit" | "exit" => return Ok(Line::Quit),
        "help" => return Ok(Line::Help),
        "sketch" => return Ok(Line::Sketch(PathBuf::from(text()?))),
        "open" => GardenInput::Open(parse_mode(rest)?),
        "back" => GardenInput::Back,
        "restart" => GardenInput::Restart,
        "done" => GardenInput::FinishCompleted,
        "digit" => {
            let digit = u8::try_from(number("a digit")?).context("digit out of range")?;
            GardenInput::Act(Action::EnterDigit(digit))
        }
        "pick" => GardenInput::Act(Action::ChooseOption(number("an option number")?)),
        "flip" => GardenInput::Act(Action::FlipCard(number("a card number")?)),
        "spot" => GardenInput::Act(Action::ClickDifference(number("a marker id")?)),
        "story" => {
            let id = u32::try_from(number("a card id")?).context("card id out of range")?;
            GardenInput::Act(Action::PickStoryCard(id))
        }
        "move" => {
            let dir = Direction::from_word(rest)
                .ok_or_else(|| anyhow!("#move expects up, down, left or right"))?;
            GardenInput::Act(Action::Move(dir))
        }
        "drop" => {
            let mut parts = rest.split_whitespace().map(str::parse::<usize>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(piece)), Some(Ok(slot)), None) => {
                    GardenInput::Act(Action::DropPiece { piece, slot })
                }
                _ => bail!("#drop expects a piece and a slot"),
            }
        }
        "video" => GardenInput::Act(Action::SubmitPrompt(text()?)),
        "name" => GardenInput::NameCharacter(text()?),
        "describe" => GardenInput::DescribeCharacter(text()?),
        "generate" => GardenInput::GenerateCharacter,
        "save" => GardenInput::SaveCharacter,
        other => bail!("unknown command #{other}"),
    };
    Ok(Line::Input(input))
}

fn parse_mode(word: &str) -> anyhow::Result<NavigationMode> {
    match word {
        "menu" => Ok(NavigationMode::Menu),
        "games" => Ok(NavigationMode::GameSelection),
        "creator" => Ok(NavigationMode::CharacterCreator),
        slug => MinigameKind::from_slug(slug)
            .map(NavigationMode::Game)
            .ok_or_else(|| anyhow!("#open expects menu, games, creator or a game name")),
    }
}

/// Prints announcements instead of speaking them.
struct PrintAnnouncer;

impl Announcer for PrintAnnouncer {
    fn announce(&self, text: &str) {
        println!("[SAY] {text}");
    }
}

/// Speech source backed by stdin. There is only one segment: once stdin
/// is closed the recognizer is gone.
struct LineSpeech {
    lines: Mutex<Option<mpsc::Receiver<TranscriptEvent>>>,
}

#[async_trait]
impl SpeechSource for LineSpeech {
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, VoiceError> {
        self.lines.lock().await.take().ok_or(VoiceError::Unavailable)
    }

    async fn stop(&self) {}
}

/// Run the garden against stdin until `#quit` or end of input.
pub async fn run(config: GardenConfig) -> anyhow::Result<()> {
    println!("=== Magic Puzzle Garden ===");
    println!("Speak by typing; #help lists the on-screen actions.");
    println!();

    let (speech_tx, speech_rx) = mpsc::channel(16);
    let (input_tx, input_rx) = mpsc::channel(16);

    let context = VoiceContext::new(config.timings.command_clear());
    let speech = Arc::new(LineSpeech {
        lines: Mutex::new(Some(speech_rx)),
    });
    let mut voice = VoiceEngine::new(speech, context.clone(), config.voice);
    voice.start_listening();

    let mut garden = Garden::new(config, Arc::new(PlaceholderGenerator), Arc::new(PrintAnnouncer));
    let reader = tokio::spawn(read_lines(speech_tx, input_tx));
    garden.run(context.subscribe_commands(), input_rx).await;

    voice.stop_listening().await;
    reader.await.context("input reader panicked")??;
    print_status(&garden);
    Ok(())
}

async fn read_lines(
    speech: mpsc::Sender<TranscriptEvent>,
    inputs: mpsc::Sender<GardenInput>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Line::Empty) => {}
            Ok(Line::Speak(text)) => {
                if speech.send(TranscriptEvent::Final(text)).await.is_err() {
                    println!("[ERROR] Voice input is off; use # commands.");
                }
            }
            Ok(Line::Input(input)) => inputs.send(input).await?,
            Ok(Line::Sketch(path)) => match tokio::fs::read(&path).await {
                Ok(png) => inputs.send(GardenInput::Sketch(png)).await?,
                Err(e) => println!("[ERROR] Could not read {}: {e}", path.display()),
            },
            Ok(Line::Help) => print_help(),
            Ok(Line::Quit) => {
                println!("Güle güle!");
                break;
            }
            Err(e) => println!("[ERROR] {e}. Type #help for help."),
        }
    }
    info!("input finished");
    Ok(())
}

fn print_status(garden: &Garden) {
    let navigator = garden.navigator();
    println!("[STATUS]");
    println!("  Screen: {}", navigator.mode());
    if let Some(session) = navigator.session() {
        println!(
            "  Level: {}/{}  Lives: {}/{}  Phase: {:?}",
            session.level(),
            session.max_level(),
            session.lives(),
            session.max_lives(),
            session.phase()
        );
    }
    for character in navigator.roster().iter() {
        println!(
            "  {}: {}",
            character.name,
            character.stickers().join(" ")
        );
    }
}

fn print_help() {
    println!("[HELP]");
    println!("  <text>               - Say something");
    println!("  #open <screen>       - menu, games, creator, or a game (cube, memory, maze, ...)");
    println!("  #back                - One screen up");
    println!("  #digit <n>           - Decryption: type a digit");
    println!("  #pick <n>            - Cube, pattern, direction: choose option n");
    println!("  #flip <n>            - Memory: turn card n over");
    println!("  #move <dir>          - Labyrinth: up, down, left, right");
    println!("  #story <id>          - Story: pick a card");
    println!("  #drop <piece> <slot> - Puzzle: place a piece");
    println!("  #spot <id>           - Find the difference: tap a marker");
    println!("  #video <text>        - Video creator: tell a story");
    println!("  #restart             - Play again after a game over");
    println!("  #done                - Leave a completed game");
    println!("  #name <text>         - Creator: name the character");
    println!("  #describe <text>     - Creator: describe the character");
    println!("  #sketch <path>       - Creator: use a PNG drawing");
    println!("  #generate            - Creator: make the portrait");
    println!("  #save                - Creator: keep the character");
    println!("  #quit                - Exit");
}
