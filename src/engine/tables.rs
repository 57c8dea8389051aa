//! Per-line reduction tables.
//!
//! A row of the packed board is 16 bits (four 4-bit exponents), so every
//! possible line fits in a 65,536-entry table. Each entry holds the line
//! after sliding toward index 0 and the points gained by its merges.

use std::sync::OnceLock;

use super::board::{Line, MAX_EXPONENT, SIZE};

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineEntry {
    pub line: Line,
    pub gain: u32,
}

static TABLE: OnceLock<Box<[LineEntry]>> = OnceLock::new();

/// Build the table if it does not exist yet. Safe to call multiple times.
pub(crate) fn init() {
    table();
}

#[inline(always)]
fn table() -> &'static [LineEntry] {
    TABLE.get_or_init(create_table)
}

/// Look up the reduction of a packed line.
#[inline(always)]
pub(crate) fn reduce(line: Line) -> LineEntry {
    table()[line as usize]
}

fn create_table() -> Box<[LineEntry]> {
    // Heap allocated; the table is 512 KiB
    (0..LINE_TABLE_SIZE)
        .map(|val| reduce_line(val as Line))
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

pub(crate) fn reduce_line(line: Line) -> LineEntry {
    let (tiles, gain) = merge_left(unpack_line(line));
    LineEntry { line: pack_line(tiles), gain }
}

pub(crate) fn unpack_line(line: Line) -> [u8; SIZE] {
    let mut tiles = [0u8; SIZE];
    for (idx, tile) in tiles.iter_mut().enumerate() {
        *tile = ((line >> ((3 - idx) * 4)) & 0xf) as u8;
    }
    tiles
}

pub(crate) fn pack_line(tiles: [u8; SIZE]) -> Line {
    tiles
        .iter()
        .fold(0, |line, &tile| (line << 4) | (tile as Line & 0xf))
}

/// Slide exponents toward index 0, merging each equal adjacent pair once.
///
/// Zeros are dropped first, then pairs merge left to right. A tile produced
/// by a merge never merges again in the same pass. Returns the new line and
/// the sum of the merged tile values.
pub(crate) fn merge_left(tiles: [u8; SIZE]) -> ([u8; SIZE], u32) {
    let mut out = [0u8; SIZE];
    let mut len = 0;
    let mut gain = 0;
    let mut pending: Option<u8> = None;
    for exp in tiles.into_iter().filter(|&e| e != 0) {
        match pending {
            // 32768 is the largest tile a nibble can hold
            Some(prev) if prev == exp && exp < MAX_EXPONENT => {
                out[len] = exp + 1;
                len += 1;
                gain += 1u32 << (exp + 1);
                pending = None;
            }
            Some(prev) => {
                out[len] = prev;
                len += 1;
                pending = Some(exp);
            }
            None => pending = Some(exp),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }
    (out, gain)
}
