//! Persistence surfaces for saved games and leaderboards.
//!
//! Game states use the `{"board": [[..]; 4], "score": n}` JSON layout; a
//! leaderboard is a JSON array of records. Where the bytes are stored is up
//! to the host; these helpers only encode, decode, and optionally touch a
//! file path.

mod json;

pub use json::{
    to_json_string,
    from_json_str,
    write_json_to_path,
    read_json_from_path,
    write_state_to_path,
    read_state_from_path,
};
