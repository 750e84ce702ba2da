use std::collections::HashMap;

use common::{CardRank, CardSuit, GameState, QrMapping, QrMappingSet};
use game::{step, Action, QrMappings, Question, QuestionKind, QuestionSet, StepError};

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use tracing_test::traced_test;

/// `username-N` wears badge `qrcode-N`.
fn synthetic_mappings(players: usize) -> QrMappings {
    let qr_mappings = (1..=players)
        .map(|i| QrMapping {
            username: format!("username-{i}"),
            display_name: format!("name-{i}"),
            qrcode: format!("qrcode-{i}"),
            card_suit: CardSuit::ALL[i % 4],
            card_rank: CardRank::new((i % 13) as u8 + 1).unwrap(),
        })
        .collect();

    QrMappings::new(QrMappingSet { qr_mappings })
}

/// Level N is solved by `username-N` or `username-N+1`, except level 19 which
/// accepts anyone.
fn synthetic_questions() -> QuestionSet {
    let questions = (1..=23)
        .map(|i| Question {
            id: i,
            html: format!("qHtml-{i}"),
            kind: if i == 19 {
                QuestionKind::AnyPerson
            } else {
                QuestionKind::UsernameList {
                    answers: vec![format!("username-{i}"), format!("username-{}", i + 1)],
                }
            },
        })
        .collect();

    QuestionSet { questions }
}

fn nobody() -> HashMap<String, GameState> {
    HashMap::new()
}

fn player(level: i64) -> GameState {
    GameState {
        user_level: level,
        life: 3,
        ..Default::default()
    }
}

#[test]
#[traced_test]
fn regular_question() {
    let mappings = synthetic_mappings(10);
    let questions = synthetic_questions();
    let players = nobody();
    let mut rng = StdRng::seed_from_u64(0);
    let state = player(6);

    let outcome = step(&state, "qrcode-6", &mappings, &questions, &players, &mut rng).unwrap();
    assert_eq!(Action::Correct, outcome.action);
    assert_eq!(7, outcome.new_state.user_level);
    assert_eq!(Some("username-6".to_owned()), outcome.scanned_username);

    let outcome = step(&state, "qrcode-9", &mappings, &questions, &players, &mut rng).unwrap();
    assert_eq!(Action::LostLife, outcome.action);
    assert_eq!("Lost a Life!", outcome.action.label());
    assert_eq!(
        GameState {
            life: 2,
            ..state
        },
        outcome.new_state
    );
}

#[test]
fn unknown_badge_loses_a_life() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let outcome = step(
        &player(4),
        "https://example.com",
        &mappings,
        &synthetic_questions(),
        &nobody(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(Action::LostLife, outcome.action);
    assert_eq!(None, outcome.scanned_username);
}

#[test]
fn metal_on_reaching_level_ten() {
    let mappings = synthetic_mappings(10);
    let questions = synthetic_questions();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = step(&player(9), "qrcode-10", &mappings, &questions, &nobody(), &mut rng).unwrap();

        assert_eq!(10, outcome.new_state.user_level);
        assert!(
            outcome.new_state.has_al || outcome.new_state.has_cu,
            "expected al or cu: {:?}",
            outcome.new_state
        );
    }
}

#[test]
fn wrong_answer_grants_nothing() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let outcome = step(&player(9), "qrcode-1", &mappings, &synthetic_questions(), &nobody(), &mut rng).unwrap();

    assert!(!outcome.new_state.has_al && !outcome.new_state.has_cu);
}

#[test]
#[traced_test]
fn endgame_grab_metal() {
    let mappings = synthetic_mappings(10);
    let questions = synthetic_questions();
    let mut rng = StdRng::seed_from_u64(3);

    let mut u1 = player(20);
    u1.has_al = true;
    u1.has_sn = true;

    let mut u2 = player(19);
    u2.has_al = true;
    u2.has_zn = true;

    let mut u4 = player(20);
    u4.has_cu = true;
    u4.has_sn = true;

    let players: HashMap<String, GameState> = [
        ("username-1".to_owned(), u1),
        ("username-2".to_owned(), u2),
        ("username-4".to_owned(), u4),
    ]
    .into_iter()
    .collect();

    // zinc is the only metal u2 has that u1 lacks
    let outcome = step(&u1, "qrcode-2", &mappings, &questions, &players, &mut rng).unwrap();
    assert_eq!(Action::GrabbedMetal, outcome.action);
    assert!(outcome.new_state.has_zn);
    assert_eq!(20, outcome.new_state.user_level);

    // copper completes the set
    let outcome = step(&outcome.new_state, "qrcode-4", &mappings, &questions, &players, &mut rng).unwrap();
    assert_eq!(Action::GrabbedMetal, outcome.action);
    assert!(outcome.new_state.has_all_metals());
    assert_eq!(21, outcome.new_state.user_level);
    assert!(logs_contain("Grabbed metal"));
}

#[test]
fn endgame_nothing_to_grab() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let mut u1 = player(20);
    u1.has_al = true;
    let players: HashMap<String, GameState> = [("username-2".to_owned(), u1)].into_iter().collect();

    let outcome = step(&u1, "qrcode-2", &mappings, &synthetic_questions(), &players, &mut rng).unwrap();
    assert_eq!(Action::NothingFound, outcome.action);
    assert_eq!(u1, outcome.new_state);
}

#[test]
fn endgame_needs_registered_player() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let err = step(&player(20), "qrcode-5", &mappings, &synthetic_questions(), &nobody(), &mut rng).unwrap_err();
    assert_eq!(StepError::UnregisteredPlayer, err);
}

#[test]
fn any_person_question() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let outcome = step(&player(19), "qrcode-12", &mappings, &synthetic_questions(), &nobody(), &mut rng).unwrap();
    assert_eq!(Action::Correct, outcome.action);
    assert_eq!(20, outcome.new_state.user_level);
}

#[test]
fn last_life_lost_is_death() {
    let mappings = synthetic_mappings(10);
    let questions = synthetic_questions();
    let mut rng = StdRng::seed_from_u64(0);
    let state = GameState {
        life: 1,
        ..player(3)
    };

    let outcome = step(&state, "qrcode-9", &mappings, &questions, &nobody(), &mut rng).unwrap();
    assert_eq!(Action::Dead, outcome.action);
    assert_eq!(game::DEAD_LEVEL, outcome.new_state.user_level);
    assert_eq!(0, outcome.new_state.life);

    // the dead stay dead
    let again = step(&outcome.new_state, "qrcode-3", &mappings, &questions, &nobody(), &mut rng).unwrap();
    assert_eq!(Action::Dead, again.action);
    assert_eq!(outcome.new_state, again.new_state);
}

#[test]
fn victory_is_final() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);
    let state = player(game::VICTORY_LEVEL);

    let outcome = step(&state, "qrcode-1", &mappings, &synthetic_questions(), &nobody(), &mut rng).unwrap();
    assert_eq!(Action::AlreadyVictorious, outcome.action);
    assert_eq!(state, outcome.new_state);
}

#[test]
fn missing_question_is_an_error() {
    let mappings = synthetic_mappings(10);
    let mut rng = StdRng::seed_from_u64(0);

    let err = step(&player(4), "qrcode-4", &mappings, &QuestionSet::default(), &nobody(), &mut rng).unwrap_err();
    assert_eq!(StepError::MissingQuestion(4), err);
}

#[test]
fn builtin_set_plays_through() {
    let mappings = synthetic_mappings(10);
    let questions = QuestionSet::builtin();
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = game::starting_state();

    while state.user_level < game::METAL_GRAB_LEVEL {
        let outcome = step(&state, "qrcode-1", &mappings, &questions, &nobody(), &mut rng).unwrap();
        assert_eq!(Action::Correct, outcome.action);
        state = outcome.new_state;
    }

    assert_eq!(game::STARTING_LIFE, state.life);
    assert!(questions.clue_html(state.user_level).is_some());
}
