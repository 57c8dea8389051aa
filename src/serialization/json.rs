use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::engine::GameState;
use crate::error::SerializationError;

/// Encode any persisted value (state, leaderboard) as JSON text.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode JSON text. Boards are validated while decoding.
///
/// ```
/// use grid_2048::engine::GameState;
/// use grid_2048::serialization::from_json_str;
/// let json = r#"{"board":[[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,4]],"score":12}"#;
/// let state: GameState = from_json_str(json).unwrap();
/// assert_eq!(state.score, 12);
/// assert_eq!(state.board.get(3, 3), 4);
/// ```
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T, SerializationError> {
    Ok(serde_json::from_str(text)?)
}

pub fn write_json_to_path<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), SerializationError> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}

pub fn read_json_from_path<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, SerializationError> {
    let text = fs::read_to_string(path)?;
    from_json_str(&text)
}

/// Write a game state to a file.
pub fn write_state_to_path<P: AsRef<Path>>(path: P, state: &GameState) -> Result<(), SerializationError> {
    write_json_to_path(path, state)
}

/// Read a game state from a file.
pub fn read_state_from_path<P: AsRef<Path>>(path: P) -> Result<GameState, SerializationError> {
    read_json_from_path(path)
}
