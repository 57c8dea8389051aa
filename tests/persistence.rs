use grid_2048::config::EngineConfig;
use grid_2048::engine::{Direction, GameState, GridEngine, RandomTiles, Status};
use grid_2048::leaderboard::Leaderboard;
use grid_2048::serialization::{
    from_json_str, read_json_from_path, read_state_from_path, to_json_string, write_json_to_path,
    write_state_to_path,
};
use grid_2048::SerializationError;
use tempfile::tempdir;

#[test]
fn saved_game_resumes_where_it_left_off() {
    let mut game = GridEngine::seeded(31);
    for dir in Direction::ALL.iter().cycle().take(10) {
        let _ = game.apply_move(*dir);
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.json");
    write_state_to_path(&path, &game.state()).unwrap();

    let state = read_state_from_path(&path).unwrap();
    let resumed = GridEngine::from_state(state, EngineConfig::default(), RandomTiles::seeded(0)).unwrap();
    assert_eq!(resumed.state(), game.state());
    assert_eq!(resumed.history_len(), 0);
    assert_eq!(resumed.is_game_over(), game.is_game_over());
}

#[test]
fn external_dead_state_is_over_without_a_move() {
    let json = r#"{"board":[[2,4,8,16],[16,8,4,2],[2,4,8,16],[16,8,4,2]],"score":300}"#;
    let state: GameState = from_json_str(json).unwrap();
    let engine = GridEngine::from_state(state, EngineConfig::default(), RandomTiles::seeded(0)).unwrap();
    assert!(engine.is_game_over());
    assert_eq!(engine.status(), Status::GameOver);
    assert_eq!(engine.score(), 300);
}

#[test]
fn state_json_is_board_and_score() {
    let engine = GridEngine::seeded(2);
    let json = to_json_string(&engine.state()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(value["board"].as_array().unwrap().len(), 4);
    assert_eq!(value["score"], 0);
}

#[test]
fn corrupt_state_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"board":[[5,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]],"score":0}"#).unwrap();
    assert!(matches!(read_state_from_path(&path), Err(SerializationError::Json(_))));
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(read_state_from_path(&path), Err(SerializationError::Json(_))));
}

#[test]
fn leaderboard_survives_a_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    let mut lb = Leaderboard::new();
    for (name, score) in [("ann", 1200), ("bob", 800), ("cy", 2400)] {
        lb.submit(name, score, 1_700_000_000).unwrap();
    }
    write_json_to_path(&path, &lb).unwrap();
    let loaded: Leaderboard = read_json_from_path(&path).unwrap();
    assert_eq!(loaded, lb);
    let names: Vec<&str> = loaded.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cy", "ann", "bob"]);
}
