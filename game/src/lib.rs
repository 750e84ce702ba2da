pub mod mappings;
pub mod questions;
pub mod step;

pub use mappings::QrMappings;
pub use questions::{Question, QuestionKind, QuestionSet};
pub use step::{step, Action, PlayerStates, StepError, StepOutcome};

pub const STARTING_LEVEL: i64 = 1;
pub const STARTING_LIFE: i64 = common::GameState::MAX_LIFE;

/// On this level players scan each other to grab metals.
pub const METAL_GRAB_LEVEL: i64 = 20;
/// Reached once every metal has been collected and the last clue solved.
pub const VICTORY_LEVEL: i64 = 22;
/// Level of a player that ran out of lives.
pub const DEAD_LEVEL: i64 = -1;

/// The state a player starts out with once they registered their badge.
pub fn starting_state() -> common::GameState {
    common::GameState {
        user_level: STARTING_LEVEL,
        life: STARTING_LIFE,
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidState {
    #[error("level {0} does not exist")]
    Level(i64),
    #[error("life has to be between 0 and {max}, got {0}", max = common::GameState::MAX_LIFE)]
    Life(i64),
}

/// Checks a state handed in from outside the game rules, like an admin edit.
pub fn check_state(state: &common::GameState) -> Result<(), InvalidState> {
    if state.user_level != DEAD_LEVEL && !(STARTING_LEVEL..=VICTORY_LEVEL).contains(&state.user_level) {
        return Err(InvalidState::Level(state.user_level));
    }
    if !(0..=common::GameState::MAX_LIFE).contains(&state.life) {
        return Err(InvalidState::Life(state.life));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_states() {
        assert_eq!(Ok(()), check_state(&starting_state()));
        assert_eq!(
            Ok(()),
            check_state(&common::GameState {
                user_level: DEAD_LEVEL,
                life: 0,
                ..Default::default()
            })
        );

        assert_eq!(
            Err(InvalidState::Level(0)),
            check_state(&common::GameState {
                user_level: 0,
                life: 3,
                ..Default::default()
            })
        );
        assert_eq!(
            Err(InvalidState::Life(6)),
            check_state(&common::GameState {
                user_level: 4,
                life: 6,
                ..Default::default()
            })
        );
    }
}
