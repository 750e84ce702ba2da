use common::{GameState, Metal};
use rand::Rng;

use crate::{QrMappings, QuestionKind, QuestionSet};

/// Read access to the stored state of other players, needed while grabbing
/// metals from them.
pub trait PlayerStates {
    fn state_of(&self, username: &str) -> Option<GameState>;
}

impl PlayerStates for std::collections::HashMap<String, GameState> {
    fn state_of(&self, username: &str) -> Option<GameState> {
        self.get(username).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Correct,
    LostLife,
    Dead,
    GrabbedMetal,
    NothingFound,
    AlreadyVictorious,
}

impl Action {
    /// The text shown to the player, also used by the client to decide what to
    /// do next.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Correct => common::scan::ACTION_CORRECT,
            Self::LostLife => "Lost a Life!",
            Self::Dead => common::scan::ACTION_DEAD,
            Self::GrabbedMetal => common::scan::ACTION_GRABBED_METAL,
            Self::NothingFound => "Nothing Found!",
            Self::AlreadyVictorious => "Already Victorious!",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub new_state: GameState,
    pub action: Action,
    /// The player behind the scanned badge, if the badge belongs to anyone.
    pub scanned_username: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepError {
    #[error("you tried to get metals from someone who is not yet registered in the game")]
    UnregisteredPlayer,
    #[error("there is no question for level {0}")]
    MissingQuestion(i64),
}

/// Applies a single scan to a players state.
pub fn step<R>(
    old: &GameState,
    answer: &str,
    mappings: &QrMappings,
    questions: &QuestionSet,
    players: &dyn PlayerStates,
    rng: &mut R,
) -> Result<StepOutcome, StepError>
where
    R: Rng + ?Sized,
{
    let scanned_username = mappings
        .lookup_by_qrcode(answer)
        .map(|m| m.username.clone());
    let scanned = scanned_username.as_deref().unwrap_or("");

    let mut outcome = StepOutcome {
        new_state: *old,
        action: Action::LostLife,
        scanned_username: scanned_username.clone(),
    };

    if old.user_level == crate::VICTORY_LEVEL {
        outcome.action = Action::AlreadyVictorious;
        return Ok(outcome);
    }

    if old.user_level < 0 {
        outcome.action = Action::Dead;
        return Ok(outcome);
    }

    if old.user_level == crate::METAL_GRAB_LEVEL {
        let other = players
            .state_of(scanned)
            .ok_or(StepError::UnregisteredPlayer)?;

        match grab_metal(&mut outcome.new_state, &other, rng) {
            Some(metal) => {
                tracing::info!(scanned, ?metal, "Grabbed metal");
                outcome.action = Action::GrabbedMetal;
                if outcome.new_state.has_all_metals() {
                    outcome.new_state.user_level = old.user_level + 1;
                }
            }
            None => {
                outcome.action = Action::NothingFound;
            }
        };

        return Ok(outcome);
    }

    let question = questions
        .get(old.user_level)
        .ok_or(StepError::MissingQuestion(old.user_level))?;

    let correct = match &question.kind {
        QuestionKind::UsernameList { answers } => answers.iter().any(|a| a == scanned),
        QuestionKind::AnyPerson => true,
    };

    if correct {
        outcome.new_state.user_level = old.user_level + 1;
        outcome.action = Action::Correct;
        maybe_grant_metal(&mut outcome.new_state, rng);
    } else {
        outcome.new_state.life = old.life - 1;
    }

    if outcome.new_state.life <= 0 {
        outcome.action = Action::Dead;
        outcome.new_state.user_level = crate::DEAD_LEVEL;
    }

    Ok(outcome)
}

/// Hands out a free metal on the levels leading up to the two alloy stages.
/// Only called after progressing.
fn maybe_grant_metal<R>(state: &mut GameState, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let level = state.user_level;

    let (first_level, pair) = match level {
        8..=10 => (8, [Metal::Aluminium, Metal::Copper]),
        18..=20 => (18, [Metal::Tin, Metal::Zinc]),
        _ => return,
    };

    if pair.iter().any(|m| state.has(*m)) {
        return;
    }

    let metal = if rng.gen::<f32>() > 0.5 { pair[1] } else { pair[0] };

    let granted = match level - first_level {
        0 => rng.gen::<f32>() > 0.4,
        1 => rng.gen::<f32>() > 0.7,
        _ => true,
    };

    if granted {
        tracing::debug!(level, ?metal, "Granting metal");
        state.grant(metal);
    }
}

/// Takes one metal the other player holds and `state` lacks, if any.
fn grab_metal<R>(state: &mut GameState, other: &GameState, rng: &mut R) -> Option<Metal>
where
    R: Rng + ?Sized,
{
    let grabbable: Vec<Metal> = Metal::ALL
        .into_iter()
        .filter(|m| other.has(*m) && !state.has(*m))
        .collect();

    if grabbable.is_empty() {
        return None;
    }

    let metal = grabbable[rng.gen_range(0..grabbable.len())];
    state.grant(metal);
    Some(metal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn at(level: i64) -> GameState {
        GameState {
            user_level: level,
            life: 3,
            ..Default::default()
        }
    }

    #[test]
    fn level_ten_always_grants() {
        for seed in 0..20 {
            let mut state = at(10);
            maybe_grant_metal(&mut state, &mut StdRng::seed_from_u64(seed));
            assert!(state.has_al ^ state.has_cu);
        }
    }

    #[test]
    fn no_second_free_metal() {
        let mut state = at(20);
        state.has_zn = true;

        maybe_grant_metal(&mut state, &mut StdRng::seed_from_u64(0));
        assert!(!state.has_sn);
    }

    #[test]
    fn no_grant_outside_stages() {
        for level in [1, 7, 11, 17, 21] {
            let mut state = at(level);
            maybe_grant_metal(&mut state, &mut StdRng::seed_from_u64(1));
            assert_eq!(at(level), state);
        }
    }

    #[test]
    fn grab_nothing_from_empty_handed() {
        let mut state = at(20);
        state.has_al = true;
        let mut other = at(20);
        other.has_al = true;

        assert_eq!(None, grab_metal(&mut state, &other, &mut StdRng::seed_from_u64(0)));
    }
}
