use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::board::{Board, Direction, Score};
use super::spawn::{RandomTiles, Spawn, SpawnPolicy, TileSource};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Board plus score: everything a host needs to render or persist a game.
///
/// Serializes as `{"board": [[..]; 4], "score": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub score: Score,
}

impl GameState {
    pub fn new(board: Board, score: Score) -> Self {
        GameState { board, score }
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
}

/// What a call to [`GridEngine::apply_move`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False if the move changed nothing; nothing else happened either.
    pub moved: bool,
    /// Points added to the score.
    pub gained: Score,
    /// Tiles placed after the slide.
    pub spawned: Vec<Spawn>,
    /// True if the game ended with this move.
    pub game_over: bool,
}

/// A single 2048 game: live state, bounded undo history and a tile source.
///
/// Moves that change nothing are inert: no history entry, no spawn, no score.
/// Once the board is dead, [`apply_move`](Self::apply_move) returns
/// [`EngineError::GameOver`] and [`undo`](Self::undo) does nothing until
/// [`new_game`](Self::new_game) (or [`load`](Self::load) of another game).
///
/// ```
/// use grid_2048::engine::{Direction, GridEngine};
/// let mut engine = GridEngine::seeded(42);
/// let before = engine.state();
/// let outcome = engine.apply_move(Direction::Left).unwrap();
/// if outcome.moved {
///     assert!(engine.undo());
/// }
/// assert_eq!(engine.state(), before);
/// ```
#[derive(Debug, Clone)]
pub struct GridEngine<S = RandomTiles> {
    state: GameState,
    history: VecDeque<GameState>,
    status: Status,
    config: EngineConfig,
    source: S,
}

impl GridEngine<RandomTiles> {
    /// New game with the default config and an entropy-seeded source.
    pub fn new() -> Self {
        Self::start(EngineConfig::default(), RandomTiles::from_entropy())
    }

    /// New game with the default config and a seeded source.
    pub fn seeded(seed: u64) -> Self {
        Self::start(EngineConfig::default(), RandomTiles::seeded(seed))
    }
}

impl Default for GridEngine<RandomTiles> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TileSource> GridEngine<S> {
    /// Start a new game with the given config and tile source.
    pub fn with_source(config: EngineConfig, source: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::start(config, source))
    }

    /// Resume from an externally supplied state (e.g. a saved game).
    ///
    /// History starts empty and the game-over status is evaluated at once.
    pub fn from_state(state: GameState, config: EngineConfig, source: S) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self::idle(config, source);
        engine.load(state);
        Ok(engine)
    }

    fn start(config: EngineConfig, source: S) -> Self {
        let mut engine = Self::idle(config, source);
        engine.new_game();
        engine
    }

    fn idle(config: EngineConfig, source: S) -> Self {
        let capacity = config.history_depth;
        GridEngine {
            state: GameState::default(),
            history: VecDeque::with_capacity(capacity),
            status: Status::Playing,
            config,
            source,
        }
    }

    /// Reset to an empty board with score 0 and two spawned tiles.
    pub fn new_game(&mut self) {
        self.state = GameState::default();
        self.history.clear();
        for _ in 0..2 {
            self.spawn_one();
        }
        self.refresh_status();
        debug!(board = self.state.board.raw(), "new game");
    }

    /// Slide every line in `dir`, merge, score, and spawn if anything moved.
    pub fn apply_move(&mut self, dir: Direction) -> Result<MoveOutcome, EngineError> {
        if self.status == Status::GameOver {
            return Err(EngineError::GameOver);
        }
        let slide = self.state.board.slide(dir);
        if !slide.moved {
            trace!(%dir, "move changed nothing");
            return Ok(MoveOutcome::default());
        }

        self.push_history(self.state);
        self.state.board = slide.board;
        self.state.score += slide.gained;

        let count = match self.config.spawn_policy {
            SpawnPolicy::Single => 1,
            SpawnPolicy::OneOrTwo if self.source.coin_flip() => 2,
            SpawnPolicy::OneOrTwo => 1,
        };
        let spawned: Vec<Spawn> = (0..count).filter_map(|_| self.spawn_one()).collect();

        self.refresh_status();
        let game_over = self.status == Status::GameOver;
        debug!(%dir, gained = slide.gained, score = self.state.score, game_over, "move applied");
        Ok(MoveOutcome { moved: true, gained: slide.gained, spawned, game_over })
    }

    /// Restore the most recent snapshot.
    ///
    /// Returns false, changing nothing, if history is empty or the game is over.
    pub fn undo(&mut self) -> bool {
        if self.status == Status::GameOver {
            return false;
        }
        match self.history.pop_back() {
            Some(prev) => {
                self.state = prev;
                self.refresh_status();
                debug!(score = self.state.score, remaining = self.history.len(), "undo");
                true
            }
            None => false,
        }
    }

    /// Replace the live state, dropping history.
    pub fn load(&mut self, state: GameState) {
        self.state = state;
        self.history.clear();
        self.refresh_status();
        debug!(board = state.board.raw(), score = state.score, status = ?self.status, "state loaded");
    }

    /// True iff no empty cell and no axis-adjacent equal pair remain.
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> Board {
        self.state.board
    }

    pub fn score(&self) -> Score {
        self.state.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.status == Status::Playing && !self.history.is_empty()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn push_history(&mut self, snapshot: GameState) {
        if self.history.len() == self.config.history_depth {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }

    fn spawn_one(&mut self) -> Option<Spawn> {
        let (board, spawn) = self
            .state
            .board
            .with_random_tile(&mut self.source, self.config.four_probability);
        self.state.board = board;
        if let Some(s) = spawn {
            trace!(row = s.row, col = s.col, value = s.value, "tile spawned");
        }
        spawn
    }

    fn refresh_status(&mut self) {
        self.status = if self.state.is_game_over() { Status::GameOver } else { Status::Playing };
    }
}
