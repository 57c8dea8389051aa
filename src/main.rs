use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use grid_2048::config::EngineConfig;
use grid_2048::engine::{self as GameEngine, Direction, GridEngine, RandomTiles};
use grid_2048::leaderboard::{self, Leaderboard};
use grid_2048::serialization;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Autoplay a 2048 game with a simple corner policy.
#[derive(Debug, Parser)]
#[command(name = "grid-2048", about = "Play a 2048 game automatically")]
struct Args {
    /// Seed for tile spawning; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resume from a saved state (JSON) instead of starting fresh
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Write the final state (JSON) here
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Stop after this many effective moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Record the final score under this name
    #[arg(long, requires = "leaderboard")]
    name: Option<String>,

    /// Leaderboard file (JSON); created if missing
    #[arg(long, value_name = "FILE", requires = "name")]
    leaderboard: Option<PathBuf>,

    /// Don't print the board after each move
    #[arg(short, long)]
    quiet: bool,

    /// Tracing filter, e.g. "info", "debug"
    #[arg(long, default_value = "info")]
    log: String,
}

/// Keep the big tiles in the bottom-left corner; go up only when forced.
const PREFERENCE: [Direction; 4] = [Direction::Down, Direction::Left, Direction::Right, Direction::Up];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    GameEngine::new();

    let config = match &args.config {
        Some(path) => EngineConfig::from_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let source = match args.seed {
        Some(seed) => RandomTiles::seeded(seed),
        None => RandomTiles::from_entropy(),
    };
    let mut game = match &args.load {
        Some(path) => {
            let state = serialization::read_state_from_path(path)
                .with_context(|| format!("loading state {}", path.display()))?;
            GridEngine::from_state(state, config, source)?
        }
        None => GridEngine::with_source(config, source)?,
    };
    info!(seed = ?args.seed, status = ?game.status(), "game ready");
    if !args.quiet {
        println!("{}", game.board());
    }

    let mut move_count: u64 = 0;
    while !game.is_game_over() {
        if args.max_moves.is_some_and(|limit| move_count >= limit) {
            break;
        }
        let board = game.board();
        let Some(dir) = PREFERENCE.into_iter().find(|&d| board.can_move(d)) else {
            break;
        };
        game.apply_move(dir)?;
        move_count += 1;
        if !args.quiet {
            println!("{dir}\n{}", game.board());
        }
    }

    let state = game.state();
    info!(
        moves = move_count,
        score = state.score,
        highest_tile = state.board.highest_tile(),
        game_over = game.is_game_over(),
        "finished"
    );
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}",
        move_count,
        state.score,
        state.board.highest_tile()
    );

    if let Some(path) = &args.save {
        serialization::write_state_to_path(path, &state)
            .with_context(|| format!("saving state {}", path.display()))?;
        info!(path = %path.display(), "state saved");
    }

    if let (Some(path), Some(name)) = (&args.leaderboard, &args.name) {
        let mut table: Leaderboard = if path.exists() {
            serialization::read_json_from_path(path)
                .with_context(|| format!("loading leaderboard {}", path.display()))?
        } else {
            Leaderboard::new()
        };
        match table.submit(name, state.score, leaderboard::now_unix_seconds())? {
            Some(rank) => info!(rank = rank + 1, "score recorded"),
            None => warn!(score = state.score, "score did not make the leaderboard"),
        }
        serialization::write_json_to_path(path, &table)?;
        for (i, rec) in table.records().iter().enumerate() {
            println!("{:>2}. {:<16} {:>8}", i + 1, rec.name, rec.score);
        }
    }
    Ok(())
}
