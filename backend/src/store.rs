//! In-memory game data shared by all handlers.

use std::collections::HashMap;

use common::{GameState, PlayerOverview, QrMapping, QrMappingSet};
use game::{Action, InvalidState, QrMappings, QuestionSet, StepError};

/// Shown instead of a clue once a player ran out of lives.
pub const DEAD_CLUE: &str = "<p>You ran out of lives. Thanks for playing!</p>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("{0} is not registered in the game")]
    NotRegistered(String),
    #[error(transparent)]
    Step(#[from] StepError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("{0} is not registered in the game")]
    NotRegistered(String),
    #[error(transparent)]
    Invalid(#[from] InvalidState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub action: Action,
    pub state: GameState,
    pub clue: String,
}

/// The roster, the questions and every registered player.
#[derive(Debug, Default)]
pub struct Game {
    mappings: QrMappings,
    questions: QuestionSet,
    players: HashMap<String, GameState>,
}

impl Game {
    pub fn new(mappings: QrMappingSet, questions: QuestionSet) -> Self {
        Self {
            mappings: QrMappings::new(mappings),
            questions,
            players: HashMap::new(),
        }
    }

    pub fn mappings(&self) -> &QrMappingSet {
        self.mappings.set()
    }

    /// Swaps out the roster. Players keep their progress.
    pub fn replace_mappings(&mut self, mappings: QrMappingSet) {
        tracing::info!(players = mappings.qr_mappings.len(), "Replacing QR mappings");
        self.mappings = QrMappings::new(mappings);
    }

    pub fn lookup_badge(&self, qrcode: &str) -> Option<&QrMapping> {
        self.mappings.lookup_by_qrcode(qrcode)
    }

    /// Makes sure the player has a state, starting them off if they are new.
    pub fn register(&mut self, username: &str) -> GameState {
        *self
            .players
            .entry(username.to_owned())
            .or_insert_with(|| {
                tracing::info!(username, "Registering new player");
                game::starting_state()
            })
    }

    pub fn player(&self, username: &str) -> Option<GameState> {
        self.players.get(username).copied()
    }

    /// Every registered player, furthest along first.
    pub fn overview(&self) -> Vec<PlayerOverview> {
        let mut players: Vec<_> = self
            .players
            .iter()
            .map(|(username, state)| PlayerOverview {
                username: username.clone(),
                display_name: self
                    .mappings
                    .lookup_by_username(username)
                    .map(|m| m.display_name.clone())
                    .unwrap_or_default(),
                state: *state,
            })
            .collect();

        players.sort_by(|a, b| {
            b.state
                .user_level
                .cmp(&a.state.user_level)
                .then_with(|| a.username.cmp(&b.username))
        });
        players
    }

    /// Overwrites the state of a registered player.
    pub fn update_player(&mut self, username: &str, state: GameState) -> Result<(), UpdateError> {
        game::check_state(&state)?;

        let current = self
            .players
            .get_mut(username)
            .ok_or_else(|| UpdateError::NotRegistered(username.to_owned()))?;

        tracing::info!(username, old = ?current, new = ?state, "Admin updated player");
        *current = state;

        Ok(())
    }

    pub fn clue(&self, level: i64) -> String {
        match self.questions.clue_html(level) {
            Some(html) => html.to_owned(),
            None if level < 0 => DEAD_CLUE.to_owned(),
            None => String::new(),
        }
    }

    pub fn make_move<R>(&mut self, username: &str, answer: &str, rng: &mut R) -> Result<MoveResult, MoveError>
    where
        R: rand::Rng + ?Sized,
    {
        let old = self
            .player(username)
            .ok_or_else(|| MoveError::NotRegistered(username.to_owned()))?;

        let outcome = game::step(&old, answer, &self.mappings, &self.questions, &self.players, rng)?;

        tracing::info!(
            username,
            scanned = outcome.scanned_username.as_deref().unwrap_or(""),
            action = %outcome.action,
            old_level = old.user_level,
            new_level = outcome.new_state.user_level,
            "Player made a move"
        );

        self.players.insert(username.to_owned(), outcome.new_state);

        Ok(MoveResult {
            action: outcome.action,
            state: outcome.new_state,
            clue: self.clue(outcome.new_state.user_level),
        })
    }
}

/// [`Game`] behind a lock, handed to the handlers.
#[derive(Debug, Default)]
pub struct GameStore {
    game: tokio::sync::RwLock<Game>,
}

impl GameStore {
    pub fn new(game: Game) -> Self {
        Self {
            game: tokio::sync::RwLock::new(game),
        }
    }

    pub async fn mappings(&self) -> QrMappingSet {
        self.game.read().await.mappings().clone()
    }

    pub async fn replace_mappings(&self, mappings: QrMappingSet) {
        self.game.write().await.replace_mappings(mappings);
    }

    pub async fn lookup_badge(&self, qrcode: &str) -> Option<QrMapping> {
        self.game.read().await.lookup_badge(qrcode).cloned()
    }

    pub async fn register(&self, username: &str) -> GameState {
        self.game.write().await.register(username)
    }

    /// The players state together with their current clue.
    pub async fn player(&self, username: &str) -> Option<(GameState, String)> {
        let game = self.game.read().await;
        let state = game.player(username)?;
        Some((state, game.clue(state.user_level)))
    }

    pub async fn overview(&self) -> Vec<PlayerOverview> {
        self.game.read().await.overview()
    }

    pub async fn update_player(&self, username: &str, state: GameState) -> Result<(), UpdateError> {
        self.game.write().await.update_player(username, state)
    }

    pub async fn make_move(&self, username: &str, answer: &str) -> Result<MoveResult, MoveError> {
        let mut game = self.game.write().await;
        game.make_move(username, answer, &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CardRank, CardSuit};
    use rand::{rngs::StdRng, SeedableRng};

    fn roster() -> QrMappingSet {
        QrMappingSet {
            qr_mappings: ["ann", "ben"]
                .iter()
                .map(|name| QrMapping {
                    username: name.to_string(),
                    display_name: name.to_uppercase(),
                    qrcode: format!("qr-{name}"),
                    card_suit: CardSuit::Hearts,
                    card_rank: CardRank::new(1).unwrap(),
                })
                .collect(),
        }
    }

    #[test]
    fn register_keeps_progress() {
        let mut game = Game::new(roster(), QuestionSet::builtin());

        assert_eq!(game::starting_state(), game.register("ann"));

        game.make_move("ann", "qr-ben", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(2, game.register("ann").user_level);
    }

    #[test]
    fn move_needs_registration() {
        let mut game = Game::new(roster(), QuestionSet::builtin());

        assert_eq!(
            Err(MoveError::NotRegistered("ann".to_owned())),
            game.make_move("ann", "qr-ben", &mut StdRng::seed_from_u64(0))
        );
    }

    #[test]
    fn move_returns_next_clue() {
        let questions = QuestionSet::builtin();
        let mut game = Game::new(roster(), questions.clone());
        game.register("ann");

        let result = game.make_move("ann", "qr-ben", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(Action::Correct, result.action);
        assert_eq!(questions.clue_html(2), Some(result.clue.as_str()));
        assert_eq!(Some(result.state), game.player("ann"));
    }

    #[test]
    fn overview_by_level() {
        let mut game = Game::new(roster(), QuestionSet::builtin());
        game.register("ann");
        game.register("ben");
        game.register("cid");
        game.make_move("ben", "qr-ann", &mut StdRng::seed_from_u64(0)).unwrap();

        let overview = game.overview();
        assert_eq!(
            vec!["ben", "ann", "cid"],
            overview.iter().map(|p| p.username.as_str()).collect::<Vec<_>>()
        );
        assert_eq!("BEN", overview[0].display_name);
        assert_eq!(2, overview[0].state.user_level);
        // registered but no longer on the roster
        assert_eq!("", overview[2].display_name);
    }

    #[test]
    fn admin_update() {
        let mut game = Game::new(roster(), QuestionSet::builtin());
        game.register("ann");

        let edited = GameState {
            user_level: 12,
            life: 2,
            has_al: true,
            ..Default::default()
        };
        assert_eq!(Ok(()), game.update_player("ann", edited));
        assert_eq!(Some(edited), game.player("ann"));

        assert_eq!(
            Err(UpdateError::NotRegistered("ben".to_owned())),
            game.update_player("ben", edited)
        );
        assert_eq!(
            Err(UpdateError::Invalid(InvalidState::Life(9))),
            game.update_player("ann", GameState { life: 9, ..edited })
        );
        assert_eq!(Some(edited), game.player("ann"));
    }

    #[test]
    fn dead_players_get_farewell() {
        let game = Game::new(roster(), QuestionSet::builtin());
        assert_eq!(DEAD_CLUE, game.clue(game::DEAD_LEVEL));
        assert_eq!("", game.clue(99));
    }
}
