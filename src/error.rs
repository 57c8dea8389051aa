use std::io;

/// Errors raised by the engine, its configuration and the leaderboard.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
    #[error("game is over; start a new game")]
    GameOver,
    #[error("invalid tile {value} at row {row}, col {col}")]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("leaderboard name must not be empty")]
    EmptyName,
}

/// Errors raised while reading or writing states, leaderboards and config files.
#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
