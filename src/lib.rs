//! grid-2048: a 2048 game engine
//!
//! This crate provides:
//! - A compact `Board` type with a pure `slide` (no randomness, no mutation)
//! - `GridEngine`, which owns one game: score, bounded undo and game-over status
//! - Pluggable tile spawning (`TileSource`), seedable for deterministic play
//! - JSON persistence helpers and a top-10 `Leaderboard`
//!
//! Quick start:
//! ```
//! use grid_2048::engine::{Direction, GridEngine};
//!
//! // Deterministic game with a seeded tile source
//! let mut game = GridEngine::seeded(42);
//! assert_eq!(game.board().count_empty(), 14);
//!
//! let outcome = game.apply_move(Direction::Left).unwrap();
//! if outcome.moved {
//!     assert_eq!(game.history_len(), 1);
//!     game.undo();
//! }
//! assert_eq!(game.score(), 0);
//! ```
//!
//! Resuming a saved game:
//! ```
//! use grid_2048::config::EngineConfig;
//! use grid_2048::engine::{GameState, GridEngine, RandomTiles};
//! use grid_2048::serialization::from_json_str;
//!
//! let saved = r#"{"board":[[2,4,2,4],[4,2,4,2],[2,4,2,4],[4,2,4,2]],"score":120}"#;
//! let state: GameState = from_json_str(saved).unwrap();
//! let game = GridEngine::from_state(state, EngineConfig::default(), RandomTiles::seeded(1)).unwrap();
//! assert!(game.is_game_over());
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod serialization;

pub use error::{EngineError, SerializationError};
