//! Tile spawning: where new tiles go and what they are worth.
//!
//! The engine never touches an RNG directly; it asks a [`TileSource`]. Use
//! [`RandomTiles`] for play (seed it for reproducible games) and
//! [`ScriptedTiles`] to replay exact choices.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A tile placed on the board after a move (or at the start of a game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// How many tiles appear after an effective move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Exactly one tile.
    #[default]
    Single,
    /// One or two tiles with equal probability.
    OneOrTwo,
}

/// Source of the random choices made when spawning tiles.
pub trait TileSource {
    /// Pick one of `empty` free cells (row-major order). `empty` is never 0
    /// and the result should be in `0..empty`.
    fn choose_cell(&mut self, empty: usize) -> usize;

    /// Return true if the next tile is a 4 rather than a 2.
    fn spawn_four(&mut self, probability: f64) -> bool;

    /// Fair coin, used by [`SpawnPolicy::OneOrTwo`].
    fn coin_flip(&mut self) -> bool;
}

impl<T: TileSource + ?Sized> TileSource for &mut T {
    fn choose_cell(&mut self, empty: usize) -> usize {
        (**self).choose_cell(empty)
    }

    fn spawn_four(&mut self, probability: f64) -> bool {
        (**self).spawn_four(probability)
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// Tile source backed by any `rand` RNG.
///
/// ```
/// use grid_2048::engine::{Board, RandomTiles};
/// let mut source = RandomTiles::seeded(123);
/// let (b, spawn) = Board::EMPTY.with_random_tile(&mut source, 0.1);
/// assert_eq!(b.count_empty(), 15);
/// assert!(matches!(spawn.map(|s| s.value), Some(2) | Some(4)));
/// ```
#[derive(Debug, Clone)]
pub struct RandomTiles<R = StdRng> {
    rng: R,
}

impl RandomTiles<StdRng> {
    /// Deterministic source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        RandomTiles { rng: StdRng::seed_from_u64(seed) }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RandomTiles { rng: StdRng::from_entropy() }
    }
}

impl<R: Rng> RandomTiles<R> {
    pub fn new(rng: R) -> Self {
        RandomTiles { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> TileSource for RandomTiles<R> {
    fn choose_cell(&mut self, empty: usize) -> usize {
        self.rng.gen_range(0..empty)
    }

    fn spawn_four(&mut self, probability: f64) -> bool {
        // NaN counts as 0
        if probability.is_nan() {
            return false;
        }
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Tile source that replays queued choices.
///
/// Cell picks wrap modulo the number of empty cells. Once a queue runs dry
/// it falls back to the first empty cell, a 2, and a single tile.
///
/// ```
/// use grid_2048::engine::{Board, ScriptedTiles};
/// let mut source = ScriptedTiles::new().with_cells([15]).with_fours([true]);
/// let (b, _) = Board::EMPTY.with_random_tile(&mut source, 0.1);
/// assert_eq!(b.get(3, 3), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedTiles {
    cells: VecDeque<usize>,
    fours: VecDeque<bool>,
    coins: VecDeque<bool>,
}

impl ScriptedTiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue cell picks (indices into the list of empty cells).
    pub fn with_cells(mut self, cells: impl IntoIterator<Item = usize>) -> Self {
        self.cells.extend(cells);
        self
    }

    /// Queue tile values: `true` spawns a 4, `false` a 2.
    pub fn with_fours(mut self, fours: impl IntoIterator<Item = bool>) -> Self {
        self.fours.extend(fours);
        self
    }

    /// Queue coin flips: `true` spawns a second tile under `OneOrTwo`.
    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(coins);
        self
    }

    /// Number of queued choices not yet consumed.
    pub fn remaining(&self) -> usize {
        self.cells.len() + self.fours.len() + self.coins.len()
    }
}

impl TileSource for ScriptedTiles {
    fn choose_cell(&mut self, empty: usize) -> usize {
        self.cells.pop_front().map_or(0, |cell| cell % empty.max(1))
    }

    fn spawn_four(&mut self, _probability: f64) -> bool {
        self.fours.pop_front().unwrap_or(false)
    }

    fn coin_flip(&mut self) -> bool {
        self.coins.pop_front().unwrap_or(false)
    }
}
