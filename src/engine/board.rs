use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::spawn::{Spawn, TileSource};
use super::tables;
use crate::error::EngineError;

/// Side length of the square grid.
pub const SIZE: usize = 4;
/// Number of cells on the grid.
pub const CELLS: usize = SIZE * SIZE;
/// Largest exponent a cell can hold (tile 32768).
pub const MAX_EXPONENT: u8 = 15;
/// Largest tile value a cell can hold.
pub const MAX_TILE: u32 = 1 << MAX_EXPONENT;

pub(crate) type BoardRaw = u64;
pub(crate) type Line = u16;
pub type Score = u64;

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Parse `up`, `down`, `left` or `right` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    /// 0 = Up, 1 = Down, 2 = Left, 3 = Right.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(code.to_string())),
        }
    }
}

impl From<Direction> for u8 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Result of sliding a board, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub board: Board,
    /// Sum of the tiles produced by merges.
    pub gained: Score,
    /// True if any line changed.
    pub moved: bool,
}

/// Packed 4x4 board as 16 4-bit exponents in a `u64`.
///
/// Cell `idx` (row-major, 0..16) lives in the nibble at bit `60 - 4 * idx`;
/// exponent `e` encodes the tile `2^e` and 0 encodes an empty cell.
/// Serializes as a 4x4 matrix of tile values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[[u32; SIZE]; SIZE]", into = "[[u32; SIZE]; SIZE]")]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Build a board from a matrix of tile values.
    ///
    /// Every cell must be 0 or a power of two between 2 and 32768.
    ///
    /// ```
    /// use grid_2048::engine::Board;
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(b.get(3, 3), 4);
    /// assert!(Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Self, EngineError> {
        let mut board = Board::EMPTY;
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let exp = tile_exponent(value).ok_or(EngineError::InvalidTile { row, col, value })?;
                board = board.with_exponent(row * SIZE + col, exp);
            }
        }
        Ok(board)
    }

    /// The board as a matrix of tile values (0 for empty).
    pub fn to_rows(self) -> [[u32; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for (idx, cell) in rows.iter_mut().flatten().enumerate() {
            *cell = self.tile_value(idx);
        }
        rows
    }

    /// Exponent stored at cell `idx` (0 for empty).
    #[inline]
    pub fn exponent(self, idx: usize) -> u8 {
        ((self.0 >> (60 - 4 * idx)) & 0xf) as u8
    }

    /// Tile value at cell `idx`, e.g. 2, 4, 8, or 0 if empty.
    #[inline]
    pub fn tile_value(self, idx: usize) -> u32 {
        match self.exponent(idx) {
            0 => 0,
            exp => 1 << exp,
        }
    }

    /// Tile value at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not below [`SIZE`].
    #[inline]
    pub fn get(self, row: usize, col: usize) -> u32 {
        assert!(row < SIZE && col < SIZE, "cell ({row}, {col}) is off the board");
        self.tile_value(row * SIZE + col)
    }

    /// Return a copy with cell `idx` set to exponent `exp`.
    #[inline]
    pub fn with_exponent(self, idx: usize, exp: u8) -> Self {
        let shift = 60 - 4 * idx;
        Board((self.0 & !(0xf << shift)) | (((exp & 0xf) as BoardRaw) << shift))
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(self) -> usize {
        CELLS - count_non_empty(self.0)
    }

    /// Indices of the empty cells in row-major order.
    pub fn empty_cells(self) -> impl Iterator<Item = usize> {
        (0..CELLS).filter(move |&idx| self.exponent(idx) == 0)
    }

    /// Highest tile value on the board (0 for an empty board).
    pub fn highest_tile(self) -> u32 {
        (0..CELLS).map(|idx| self.tile_value(idx)).max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn tile_sum(self) -> u64 {
        (0..CELLS).map(|idx| self.tile_value(idx) as u64).sum()
    }

    /// Slide/merge tiles in `dir` without spawning anything.
    ///
    /// The board is oriented so `dir` becomes "left along rows", each row is
    /// reduced with the same line rule, and the orientation is undone.
    ///
    /// ```
    /// use grid_2048::engine::{Board, Direction};
    /// let b = Board::from_rows([[2, 0, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let slide = b.slide(Direction::Left);
    /// assert_eq!(slide.board.to_rows()[0], [4, 2, 0, 0]);
    /// assert_eq!(slide.gained, 4);
    /// assert!(slide.moved);
    /// ```
    pub fn slide(self, dir: Direction) -> Slide {
        let oriented = orient(self.0, dir);
        let mut reduced: BoardRaw = 0;
        let mut gained: Score = 0;
        for row in 0..SIZE {
            let entry = tables::reduce(extract_line(oriented, row));
            reduced |= (entry.line as BoardRaw) << line_shift(row);
            gained += entry.gain as Score;
        }
        let board = Board(restore(reduced, dir));
        Slide { board, gained, moved: board != self }
    }

    /// True if sliding in `dir` would change the board.
    #[inline]
    pub fn can_move(self, dir: Direction) -> bool {
        self.slide(dir).moved
    }

    /// Directions that would change the board.
    pub fn legal_moves(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&dir| self.can_move(dir))
    }

    /// True iff there is no empty cell and no two axis-adjacent equal tiles.
    ///
    /// ```
    /// use grid_2048::engine::Board;
    /// assert!(!Board::EMPTY.is_game_over());
    /// let dead = Board::from_rows([
    ///     [2, 4, 2, 4],
    ///     [4, 2, 4, 2],
    ///     [2, 4, 2, 4],
    ///     [4, 2, 4, 2],
    /// ]).unwrap();
    /// assert!(dead.is_game_over());
    /// ```
    pub fn is_game_over(self) -> bool {
        self.count_empty() == 0 && !has_adjacent_pair(self.0) && !has_adjacent_pair(transpose(self.0))
    }

    /// Place one tile on a random empty cell drawn from `source`.
    ///
    /// The tile is a 4 with probability `four_probability`, else a 2. Returns
    /// the board unchanged and `None` when no cell is empty.
    pub fn with_random_tile<S: TileSource + ?Sized>(
        self,
        source: &mut S,
        four_probability: f64,
    ) -> (Self, Option<Spawn>) {
        let empty = self.count_empty();
        if empty == 0 {
            return (self, None);
        }
        let pick = source.choose_cell(empty).min(empty - 1);
        let exp = if source.spawn_four(four_probability) { 2 } else { 1 };
        match self.empty_cells().nth(pick) {
            Some(idx) => (
                self.with_exponent(idx, exp),
                Some(Spawn { row: idx / SIZE, col: idx % SIZE, value: 1 << exp }),
            ),
            None => (self, None),
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(8 * SIZE - 1);
        for (row, values) in self.to_rows().iter().enumerate() {
            if row > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = values.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[[u32; SIZE]; SIZE]> for Board {
    type Error = EngineError;

    fn try_from(rows: [[u32; SIZE]; SIZE]) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for [[u32; SIZE]; SIZE] {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

fn tile_exponent(value: u32) -> Option<u8> {
    match value {
        0 => Some(0),
        v if v.is_power_of_two() && (2..=MAX_TILE).contains(&v) => Some(v.trailing_zeros() as u8),
        _ => None,
    }
}

#[inline]
fn line_shift(row: usize) -> u32 {
    ((SIZE - 1 - row) * 16) as u32
}

#[inline]
pub(crate) fn extract_line(board: BoardRaw, row: usize) -> Line {
    ((board >> line_shift(row)) & 0xffff) as Line
}

/// Rotate/reflect so that `dir` maps to sliding left along rows.
#[inline]
fn orient(board: BoardRaw, dir: Direction) -> BoardRaw {
    match dir {
        Direction::Left => board,
        Direction::Right => mirror(board),
        Direction::Up => transpose(board),
        Direction::Down => mirror(transpose(board)),
    }
}

/// Inverse of `orient`.
#[inline]
fn restore(board: BoardRaw, dir: Direction) -> BoardRaw {
    match dir {
        Direction::Left => board,
        Direction::Right => mirror(board),
        Direction::Up => transpose(board),
        Direction::Down => transpose(mirror(board)),
    }
}

/// Reverse the cells within each row.
#[inline]
pub(crate) fn mirror(x: BoardRaw) -> BoardRaw {
    ((x & 0xF000_F000_F000_F000) >> 12)
        | ((x & 0x0F00_0F00_0F00_0F00) >> 4)
        | ((x & 0x00F0_00F0_00F0_00F0) << 4)
        | ((x & 0x000F_000F_000F_000F) << 12)
}

// Credit to Nneonneo
#[inline]
pub(crate) fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

/// True if some row holds two equal non-empty neighbours.
fn has_adjacent_pair(board: BoardRaw) -> bool {
    (0..SIZE).any(|row| {
        let tiles = tables::unpack_line(extract_line(board, row));
        tiles.windows(2).any(|w| w[0] != 0 && w[0] == w[1] && w[0] < MAX_EXPONENT)
    })
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
fn count_non_empty(board: BoardRaw) -> usize {
    let mut x = board;
    x |= x >> 1;
    x |= x >> 2;
    x &= 0x1111111111111111;
    x.count_ones() as usize
}

fn format_val(val: u32) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}
