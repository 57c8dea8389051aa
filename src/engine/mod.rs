//! Engine module: packed 2048 board, slide/merge, spawning and the game
//! state machine.
//!
//! - `Board` is the packed 4x4 value type; `Board::slide` is the pure move.
//! - `GridEngine` owns a game: score, bounded undo history, tile source.
//! - Line lookup tables live in a private submodule.

mod board;
mod game;
mod spawn;
mod tables;

pub use board::{Board, Direction, Score, Slide, CELLS, MAX_EXPONENT, MAX_TILE, SIZE};
pub use game::{GameState, GridEngine, MoveOutcome, Status};
pub use spawn::{RandomTiles, ScriptedTiles, Spawn, SpawnPolicy, TileSource};

/// Build the line tables ahead of the first move. Safe to call multiple times.
pub fn new() {
    tables::init();
}
