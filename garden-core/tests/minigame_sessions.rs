//! Minigame sessions played end to end through the test harness.
//!
//! Timings are instant, so every flush runs timers and content requests to
//! completion: a win immediately loads the next level, a delayed failure
//! immediately costs a life.

use garden_core::config::{GardenConfig, Timings};
use garden_core::minigames::labyrinth::{Direction, Position};
use garden_core::minigames::{Action, RoundState};
use garden_core::mode::{MinigameKind, NavigationMode};
use garden_core::phrases;
use garden_core::session::SessionPhase;
use garden_core::testing::{
    assert_announced, assert_level, assert_lives, assert_mode, assert_phase, MockGenerator,
    TestHarness,
};
use garden_core::ContentError;

fn harness_for(kind: MinigameKind) -> TestHarness {
    let mut harness = TestHarness::new();
    harness.open(NavigationMode::Game(kind));
    harness
}

/// Actions that win the current round.
fn winning_actions(round: &RoundState) -> Vec<Action> {
    match round {
        RoundState::Decryption(r) => r.solution().into_iter().map(Action::EnterDigit).collect(),
        RoundState::Cube(r) => vec![Action::ChooseOption(r.answer())],
        RoundState::Pattern(r) => {
            let index = r.options().iter().position(|o| o == r.answer()).unwrap();
            vec![Action::ChooseOption(index)]
        }
        RoundState::SpatialDirection(r) => {
            let index = r.options().iter().position(|d| *d == r.target()).unwrap();
            vec![Action::ChooseOption(index)]
        }
        RoundState::Story(_) => (1..=3).map(Action::PickStoryCard).collect(),
        RoundState::FindDifference(r) => r
            .differences()
            .iter()
            .map(|d| Action::ClickDifference(d.id))
            .collect(),
        RoundState::MemoryMatch(r) => {
            let mut actions = Vec::new();
            let cards = r.cards();
            for pair in 0..garden_core::minigames::memory::PAIRS {
                for (i, card) in cards.iter().enumerate() {
                    if card.pair == pair {
                        actions.push(Action::FlipCard(i));
                    }
                }
            }
            actions
        }
        RoundState::Puzzle(_) => (0..4)
            .map(|i| Action::DropPiece { piece: i, slot: i })
            .collect(),
        RoundState::Labyrinth(_) => {
            use Direction::*;
            [Right, Down, Right, Right, Down, Right, Down, Down]
                .into_iter()
                .map(Action::Move)
                .collect()
        }
        RoundState::VideoCreator(_) => Vec::new(),
    }
}

fn win_level(harness: &mut TestHarness) {
    let actions = winning_actions(harness.round().expect("round should be loaded"));
    for action in actions {
        harness.act(action);
    }
}

// =============================================================================
// Scored minigames
// =============================================================================

#[test]
fn test_every_scored_minigame_can_be_won() {
    for kind in MinigameKind::ALL {
        if !kind.is_scored() {
            continue;
        }
        let mut harness = harness_for(kind);
        assert_phase(&harness, SessionPhase::Playing);
        assert_level(&harness, 1);

        win_level(&mut harness);

        assert_announced(&harness, phrases::WIN);
        assert_level(&harness, 2);
        assert_phase(&harness, SessionPhase::Playing);
    }
}

#[test]
fn test_decryption_wrong_code_costs_a_life_and_clears() {
    let mut harness = harness_for(MinigameKind::Decryption);
    let solution = match harness.round() {
        Some(RoundState::Decryption(r)) => r.solution(),
        other => panic!("unexpected round {other:?}"),
    };
    let wrong = if solution[0] == 9 { 1 } else { solution[0] + 1 };

    harness.act(Action::EnterDigit(wrong));
    harness.act(Action::EnterDigit(solution[1]));
    harness.act(Action::EnterDigit(solution[2]));

    assert_lives(&harness, 2);
    assert_level(&harness, 1);
    assert_phase(&harness, SessionPhase::Playing);
    assert_eq!(harness.last_announced(), Some(phrases::RETRY));
    match harness.round() {
        Some(RoundState::Decryption(r)) => assert!(r.inputs().iter().all(Option::is_none)),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_decryption_rejects_zero() {
    let mut harness = harness_for(MinigameKind::Decryption);
    harness.act(Action::EnterDigit(0));
    assert_lives(&harness, 3);
    match harness.round() {
        Some(RoundState::Decryption(r)) => assert!(r.inputs().iter().all(Option::is_none)),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_three_wrong_cubes_is_game_over_then_restart() {
    let mut harness = harness_for(MinigameKind::Cube);
    let answer = match harness.round() {
        Some(RoundState::Cube(r)) => r.answer(),
        other => panic!("unexpected round {other:?}"),
    };
    let wrong = (answer + 1) % 3;

    harness.act(Action::ChooseOption(wrong));
    assert_lives(&harness, 2);
    harness.act(Action::ChooseOption(wrong));
    assert_lives(&harness, 1);
    harness.act(Action::ChooseOption(wrong));
    assert_lives(&harness, 0);
    assert_phase(&harness, SessionPhase::GameOver);
    assert_eq!(harness.last_announced(), Some(phrases::GAME_OVER));

    // Input is disabled after a game over.
    harness.act(Action::ChooseOption(answer));
    assert_phase(&harness, SessionPhase::GameOver);

    harness.restart();
    assert_lives(&harness, 3);
    assert_level(&harness, 1);
    assert_phase(&harness, SessionPhase::Playing);
}

#[test]
fn test_story_wrong_order_fails_after_feedback() {
    let mut harness = harness_for(MinigameKind::Story);
    harness.act(Action::PickStoryCard(2));
    harness.act(Action::PickStoryCard(1));
    assert_lives(&harness, 3);
    harness.act(Action::PickStoryCard(3));

    assert_lives(&harness, 2);
    match harness.round() {
        Some(RoundState::Story(r)) => assert!(r.picked().is_empty()),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_memory_gets_five_lives_and_mismatch_costs_one() {
    let mut harness = harness_for(MinigameKind::MemoryMatch);
    assert_lives(&harness, 5);
    assert_announced(&harness, "Kartlara iyi bak! Ezberle!");
    assert_announced(&harness, phrases::MEMORY_GO);

    let (first, other) = match harness.round() {
        Some(RoundState::MemoryMatch(r)) => {
            let cards = r.cards();
            let other = cards
                .iter()
                .position(|c| c.pair != cards[0].pair)
                .unwrap();
            (0, other)
        }
        other => panic!("unexpected round {other:?}"),
    };

    harness.act(Action::FlipCard(first));
    harness.act(Action::FlipCard(other));

    assert_lives(&harness, 4);
    match harness.round() {
        Some(RoundState::MemoryMatch(r)) => assert_eq!(r.face_up_unmatched(), 0),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_memory_preview_blocks_flips() {
    let mut harness = TestHarness::new();
    let effects = harness.navigator.open(NavigationMode::Game(MinigameKind::MemoryMatch));
    harness.absorb(effects);

    // Load the level but leave the preview timer pending.
    while harness.round().is_none() {
        assert!(harness.step(), "level never loaded");
    }

    match harness.round() {
        Some(RoundState::MemoryMatch(r)) => assert!(r.in_preview()),
        other => panic!("unexpected round {other:?}"),
    }
    let effects = harness.navigator.act(&Action::FlipCard(0));
    assert!(effects.is_empty());
    match harness.round() {
        Some(RoundState::MemoryMatch(r)) => assert_eq!(r.face_up_unmatched(), 2 * 6),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_puzzle_wrong_slot_is_free() {
    let mut harness = harness_for(MinigameKind::Puzzle);
    harness.act(Action::DropPiece { piece: 0, slot: 1 });
    assert_lives(&harness, 3);
    assert_eq!(harness.last_announced(), Some(phrases::WRONG_SLOT));

    harness.act(Action::DropPiece { piece: 0, slot: 0 });
    assert_eq!(harness.last_announced(), Some(phrases::PIECE_PLACED));
    match harness.round() {
        Some(RoundState::Puzzle(r)) => {
            assert_eq!(r.board()[0], Some(0));
            assert!(!r.tray().contains(&0));
        }
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_labyrinth_walls_and_edges() {
    let mut harness = harness_for(MinigameKind::Labyrinth);
    harness.act(Action::Move(Direction::Down));
    assert_eq!(harness.last_announced(), Some(phrases::WALL));
    harness.act(Action::Move(Direction::Up));
    assert_lives(&harness, 3);
    match harness.round() {
        Some(RoundState::Labyrinth(r)) => assert_eq!(r.player(), Position::new(0, 0)),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_find_difference_survives_generator_failure() {
    let mut harness = TestHarness::new().with_generator(MockGenerator::failing());
    harness.open(NavigationMode::Game(MinigameKind::FindDifference));

    assert_phase(&harness, SessionPhase::Playing);
    match harness.round() {
        Some(RoundState::FindDifference(r)) => {
            assert!(r.background().is_placeholder());
            assert!((3..=5).contains(&r.differences().len()));
        }
        other => panic!("unexpected round {other:?}"),
    }

    let first = match harness.round() {
        Some(RoundState::FindDifference(r)) => r.differences()[0].id,
        other => panic!("unexpected round {other:?}"),
    };
    harness.act(Action::ClickDifference(first));
    assert_eq!(harness.last_announced(), Some(phrases::DIFFERENCE_FOUND));
    harness.act(Action::ClickDifference(first));
    match harness.round() {
        Some(RoundState::FindDifference(r)) => assert_eq!(r.found_count(), 1),
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_story_uses_generated_images_in_order() {
    let generator = MockGenerator::succeeding();
    generator
        .push(Ok(garden_core::ImageRef::new("step-1")))
        .push(Ok(garden_core::ImageRef::new("step-2")))
        .push(Err(ContentError::Unavailable));
    let mut harness = TestHarness::new().with_generator(generator.clone());
    harness.open(NavigationMode::Game(MinigameKind::Story));

    assert_eq!(generator.prompts().len(), 3);
    match harness.round() {
        Some(RoundState::Story(r)) => {
            let image = |id| r.cards().iter().find(|c| c.id == id).unwrap().image.clone();
            assert_eq!(image(1).as_str(), "step-1");
            assert_eq!(image(2).as_str(), "step-2");
            assert!(image(3).is_placeholder());
        }
        other => panic!("unexpected round {other:?}"),
    }
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_completion_awards_sticker_once_and_returns_to_selection() {
    let config = GardenConfig::new()
        .with_seed(7)
        .with_max_level(2)
        .with_timings(Timings::instant());
    let mut harness = TestHarness::with_config(config);

    // A character to receive the sticker.
    harness.open(NavigationMode::CharacterCreator);
    harness.say("Pamuk");
    let effects = harness.navigator.generate_character().unwrap();
    harness.absorb(effects).flush();
    let effects = harness.navigator.save_character().unwrap();
    harness.absorb(effects).flush();
    assert_eq!(harness.navigator.roster().len(), 1);

    harness.open(NavigationMode::GameSelection);
    harness.open(NavigationMode::Game(MinigameKind::Labyrinth));
    win_level(&mut harness);
    assert_level(&harness, 2);
    win_level(&mut harness);

    assert_phase(&harness, SessionPhase::Completed);
    assert_eq!(harness.last_announced(), Some(phrases::COMPLETED));
    let stickers = harness.navigator.roster().as_slice()[0].stickers().to_vec();
    assert_eq!(stickers, vec![MinigameKind::Labyrinth.icon().to_string()]);

    // Nothing else happens until the player leaves.
    harness.act(Action::Move(Direction::Up));
    assert_phase(&harness, SessionPhase::Completed);

    let effects = harness.navigator.finish_completed();
    harness.absorb(effects).flush();
    assert_eq!(harness.mode(), NavigationMode::GameSelection);
    assert_eq!(harness.navigator.roster().as_slice()[0].stickers().len(), 1);
}

// =============================================================================
// Video creator
// =============================================================================

#[test]
fn test_video_creator_storyboard() {
    let mut harness = harness_for(MinigameKind::VideoCreator);
    assert_phase(&harness, SessionPhase::Playing);
    assert_eq!(harness.lives(), Some(3));

    harness.say("   ");
    harness.act(Action::SubmitPrompt("  ".into()));
    assert_eq!(harness.last_announced(), Some(phrases::VIDEO_EMPTY));

    harness.say("bir tavşan havuç yiyor");
    assert_announced(&harness, phrases::VIDEO_DRAWING);
    assert_eq!(harness.last_announced(), Some(phrases::VIDEO_READY));
    match harness.round() {
        Some(RoundState::VideoCreator(r)) => {
            assert_eq!(r.prompt(), "bir tavşan havuç yiyor");
            assert_eq!(r.frames().len(), 3);
            assert!(!r.is_generating());
        }
        other => panic!("unexpected round {other:?}"),
    }
    assert_eq!(harness.generator.prompts().len(), 3);
}

#[test]
fn test_video_creator_story_naming_the_game() {
    let mut harness = TestHarness::new();
    harness.open(NavigationMode::Game(MinigameKind::VideoCreator));

    harness.say("bir kedi videosu");
    assert_mode(&harness, NavigationMode::Game(MinigameKind::VideoCreator));
    assert_eq!(harness.last_announced(), Some(phrases::VIDEO_READY));
    match harness.round() {
        Some(RoundState::VideoCreator(r)) => {
            assert_eq!(r.prompt(), "bir kedi videosu");
            assert_eq!(r.frames().len(), 3);
        }
        other => panic!("unexpected round {other:?}"),
    }
}

#[test]
fn test_video_creator_failure_allows_retry() {
    let mut harness = TestHarness::new().with_generator(MockGenerator::failing());
    harness.open(NavigationMode::Game(MinigameKind::VideoCreator));

    harness.act(Action::SubmitPrompt("uçan bir kedi".into()));
    assert_eq!(harness.last_announced(), Some(phrases::VIDEO_ERROR));
    assert_phase(&harness, SessionPhase::Playing);
    match harness.round() {
        Some(RoundState::VideoCreator(r)) => {
            assert!(r.frames().is_empty());
            assert!(!r.is_generating());
        }
        other => panic!("unexpected round {other:?}"),
    }
}
