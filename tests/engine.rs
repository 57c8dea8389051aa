use grid_2048::config::EngineConfig;
use grid_2048::engine::{
    Board, Direction, GameState, GridEngine, RandomTiles, ScriptedTiles, SpawnPolicy, Status, SIZE,
};
use grid_2048::EngineError;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn rows(r: [[u32; SIZE]; SIZE]) -> Board {
    Board::from_rows(r).unwrap()
}

fn engine_at(board: Board, score: u64, source: ScriptedTiles) -> GridEngine<ScriptedTiles> {
    GridEngine::from_state(GameState::new(board, score), EngineConfig::default(), source).unwrap()
}

fn non_zero(board: Board) -> usize {
    16 - board.count_empty()
}

/// Slide by walking rows/columns directly instead of rotating the board.
fn slide_by_axes(board: Board, dir: Direction) -> (Board, u64) {
    let grid = board.to_rows();
    let mut out = [[0u32; SIZE]; SIZE];
    let mut gained = 0;
    for lane in 0..SIZE {
        let cells: Vec<(usize, usize)> = (0..SIZE)
            .map(|i| match dir {
                Direction::Left => (lane, i),
                Direction::Right => (lane, SIZE - 1 - i),
                Direction::Up => (i, lane),
                Direction::Down => (SIZE - 1 - i, lane),
            })
            .collect();
        let values: Vec<u32> = cells.iter().map(|&(r, c)| grid[r][c]).filter(|&v| v != 0).collect();
        let mut merged = Vec::with_capacity(SIZE);
        let mut i = 0;
        while i < values.len() {
            if i + 1 < values.len() && values[i] == values[i + 1] && values[i] < 32768 {
                merged.push(values[i] * 2);
                gained += (values[i] * 2) as u64;
                i += 2;
            } else {
                merged.push(values[i]);
                i += 1;
            }
        }
        for (k, &(r, c)) in cells.iter().enumerate() {
            out[r][c] = merged.get(k).copied().unwrap_or(0);
        }
    }
    (rows(out), gained)
}

fn random_board(rng: &mut StdRng) -> Board {
    let mut grid = [[0u32; SIZE]; SIZE];
    for cell in grid.iter_mut().flatten() {
        let exp: u32 = rng.gen_range(0..6);
        *cell = if exp == 0 { 0 } else { 1 << exp };
    }
    rows(grid)
}

#[test]
fn pair_merges_left_and_one_tile_spawns() {
    let board = rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let mut engine = engine_at(board, 0, ScriptedTiles::new().with_cells([6]));
    let outcome = engine.apply_move(Direction::Left).unwrap();
    let after = engine.board().to_rows();
    assert_eq!(after[0], [4, 0, 0, 0]);
    assert_eq!(engine.score(), 4);
    assert_eq!(outcome.spawned.len(), 1);
    assert_eq!(non_zero(engine.board()), 2);
    let spawn = outcome.spawned[0];
    assert_ne!((spawn.row, spawn.col), (0, 0));
}

#[test]
fn fresh_merge_does_not_chain() {
    let board = rows([[2, 0, 2, 2], [0; 4], [0; 4], [0; 4]]);
    // Spawn lands on row 1 so row 0 stays as slid
    let mut engine = engine_at(board, 0, ScriptedTiles::new().with_cells([5]));
    engine.apply_move(Direction::Left).unwrap();
    assert_eq!(engine.board().to_rows()[0], [4, 2, 0, 0]);
    assert_eq!(engine.score(), 4);
}

#[test]
fn dead_board_is_over_and_every_move_is_rejected() {
    let dead = rows([[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 4, 2]]);
    let mut engine = engine_at(dead, 256, ScriptedTiles::new());
    assert!(engine.is_game_over());
    for dir in Direction::ALL {
        assert_eq!(engine.apply_move(dir), Err(EngineError::GameOver));
        assert_eq!(engine.state(), GameState::new(dead, 256));
        assert_eq!(engine.history_len(), 0);
    }
}

#[test]
fn full_board_with_a_pair_is_not_over() {
    let board = rows([[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 4, 4]]);
    assert!(!board.is_game_over());
    let engine = engine_at(board, 0, ScriptedTiles::new());
    assert_eq!(engine.status(), Status::Playing);
}

#[test]
fn new_game_has_exactly_two_small_tiles() {
    for seed in 0..50 {
        let engine = GridEngine::seeded(seed);
        let board = engine.board();
        let values: Vec<u32> = (0..16).map(|i| board.tile_value(i)).filter(|&v| v != 0).collect();
        assert_eq!(values.len(), 2, "seed {seed}");
        assert!(values.iter().all(|&v| v == 2 || v == 4));
        assert_eq!(engine.score(), 0);
    }
}

#[test]
fn new_game_clears_history_and_score() {
    let mut engine = GridEngine::seeded(5);
    for dir in Direction::ALL.iter().cycle().take(12) {
        let _ = engine.apply_move(*dir);
    }
    engine.new_game();
    assert_eq!(engine.history_len(), 0);
    assert_eq!(engine.score(), 0);
    assert_eq!(non_zero(engine.board()), 2);
    assert!(!engine.undo());
}

#[test]
fn inert_moves_leave_everything_untouched() {
    let board = rows([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
    // The spawn lands on (2, 1), a 2 resting on the 4
    let mut engine = engine_at(board, 40, ScriptedTiles::new().with_cells([9]));
    engine.apply_move(Direction::Down).unwrap();
    assert_eq!(engine.board().to_rows()[3], [2, 4, 8, 16]);
    assert_eq!(engine.board().get(2, 1), 2);
    let before = engine.state();
    let history = engine.history_len();
    let outcome = engine.apply_move(Direction::Down).unwrap();
    assert!(!outcome.moved);
    assert!(outcome.spawned.is_empty());
    assert_eq!(outcome.gained, 0);
    assert_eq!(engine.state(), before);
    assert_eq!(engine.history_len(), history);
}

#[test]
fn undo_restores_exact_prior_state() {
    let mut engine = GridEngine::seeded(77);
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..200 {
        if engine.is_game_over() {
            engine.new_game();
        }
        let dir = Direction::ALL[rng.gen_range(0..4)];
        let before = engine.state();
        let outcome = engine.apply_move(dir).unwrap();
        if outcome.game_over {
            let ended = engine.state();
            assert!(!engine.undo());
            assert_eq!(engine.state(), ended);
        } else if outcome.moved {
            assert!(engine.undo());
            assert_eq!(engine.state(), before);
            engine.apply_move(dir).unwrap();
        } else {
            assert_eq!(engine.state(), before);
        }
    }
}

#[test]
fn undo_with_empty_history_is_a_no_op() {
    let mut engine = GridEngine::seeded(8);
    let before = engine.state();
    assert!(!engine.can_undo());
    assert!(!engine.undo());
    assert_eq!(engine.state(), before);
}

#[test]
fn undo_walks_back_through_history() {
    let mut engine = GridEngine::seeded(21);
    let mut states = vec![engine.state()];
    for dir in Direction::ALL.iter().cycle().take(16) {
        if engine.apply_move(*dir).map(|o| o.moved).unwrap_or(false) {
            states.push(engine.state());
        }
    }
    states.pop();
    while let Some(expected) = states.pop() {
        assert!(engine.undo());
        assert_eq!(engine.state(), expected);
    }
    assert!(!engine.undo());
}

#[test]
fn history_keeps_only_the_configured_depth() {
    let config = EngineConfig { history_depth: 2, ..EngineConfig::default() };
    let mut engine = GridEngine::with_source(config, RandomTiles::seeded(4)).unwrap();
    let mut snapshots = Vec::new();
    for dir in Direction::ALL.iter().cycle().take(20) {
        let before = engine.state();
        if engine.apply_move(*dir).map(|o| o.moved).unwrap_or(false) {
            snapshots.push(before);
        }
    }
    assert!(snapshots.len() > 2);
    assert_eq!(engine.history_len(), 2);
    assert!(engine.undo());
    assert_eq!(engine.state(), snapshots[snapshots.len() - 1]);
    assert!(engine.undo());
    assert_eq!(engine.state(), snapshots[snapshots.len() - 2]);
    assert!(!engine.undo());
}

#[test]
fn merges_conserve_tiles_and_score_the_merged_value() {
    let mut rng = StdRng::seed_from_u64(2048);
    for _ in 0..500 {
        let board = random_board(&mut rng);
        for dir in Direction::ALL {
            let slide = board.slide(dir);
            // Merging v + v into 2v keeps the tile sum
            assert_eq!(slide.board.tile_sum(), board.tile_sum());
            assert!(non_zero(slide.board) <= non_zero(board));
            let merges = non_zero(board) - non_zero(slide.board);
            assert_eq!(merges == 0, slide.gained == 0);
        }
    }
}

#[test]
fn move_adds_at_most_the_spawned_tile() {
    let mut engine = GridEngine::seeded(99);
    for dir in Direction::ALL.iter().cycle().take(100) {
        if engine.is_game_over() {
            break;
        }
        let before = engine.state();
        let outcome = engine.apply_move(*dir).unwrap();
        let spawned: u64 = outcome.spawned.iter().map(|s| s.value as u64).sum();
        assert_eq!(engine.board().tile_sum(), before.board.tile_sum() + spawned);
        assert_eq!(engine.score(), before.score + outcome.gained);
        assert!(outcome.spawned.len() <= 1);
    }
}

#[test]
fn table_slide_matches_axis_walk() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..1000 {
        let board = random_board(&mut rng);
        for dir in Direction::ALL {
            let slide = board.slide(dir);
            let (expected, gained) = slide_by_axes(board, dir);
            assert_eq!(slide.board, expected, "{dir} on {board:?}");
            assert_eq!(slide.gained, gained);
            assert_eq!(slide.moved, expected != board);
        }
    }
}

#[test]
fn loading_a_dead_state_reports_game_over_immediately() {
    let dead = GameState::new(rows([[4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4]]), 64);
    let mut engine = GridEngine::seeded(1);
    engine.apply_move(Direction::Left).ok();
    engine.load(dead);
    assert!(engine.is_game_over());
    assert_eq!(engine.status(), Status::GameOver);
    assert_eq!(engine.history_len(), 0);
    assert_eq!(engine.apply_move(Direction::Up), Err(EngineError::GameOver));

    let playable = GameState::new(rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), 0);
    engine.load(playable);
    assert_eq!(engine.status(), Status::Playing);
}

#[test]
fn one_or_two_policy_never_spawns_more_than_two() {
    let config = EngineConfig { spawn_policy: SpawnPolicy::OneOrTwo, ..EngineConfig::default() };
    let mut engine = GridEngine::with_source(config, RandomTiles::seeded(12)).unwrap();
    let mut counts = [0usize; 3];
    for dir in Direction::ALL.iter().cycle().take(60) {
        match engine.apply_move(*dir) {
            Ok(outcome) if outcome.moved => counts[outcome.spawned.len()] += 1,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    assert_eq!(counts[0], 0);
    assert!(counts[1] > 0 && counts[2] > 0, "{counts:?}");
}

#[test]
fn spawn_on_nearly_full_board_fills_the_gap() {
    // Only the merge frees a cell; the second tile of OneOrTwo has nowhere to go
    let board = rows([[2, 2, 8, 16], [32, 64, 128, 256], [2, 4, 8, 16], [32, 64, 128, 256]]);
    let config = EngineConfig { spawn_policy: SpawnPolicy::OneOrTwo, ..EngineConfig::default() };
    let source = ScriptedTiles::new().with_coins([true]);
    let mut engine = GridEngine::from_state(GameState::new(board, 0), config, source).unwrap();
    let outcome = engine.apply_move(Direction::Left).unwrap();
    assert_eq!(outcome.spawned.len(), 1);
    assert_eq!(engine.board().count_empty(), 0);
}

#[test]
fn directions_parse_from_host_input() {
    assert_eq!("DOWN".parse::<Direction>(), Ok(Direction::Down));
    assert!(matches!("north".parse::<Direction>(), Err(EngineError::InvalidDirection(_))));
    assert!(matches!(Direction::try_from(9u8), Err(EngineError::InvalidDirection(_))));
}
