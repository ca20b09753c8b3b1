//! Square tile container.
//!
//! The grid is stored as a flat `Vec<Tile>` in row-major order: indices
//! `0..size` are row 0, `size..2*size` are row 1, and so on. Every cell
//! always holds a tile; empty cells carry value 0.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, Result};

/// A single cell value plus its per-move merge bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    /// Tile value; 0 means the cell is empty.
    pub value: u32,
    /// Set on tiles produced by a merge during the current move only.
    pub merged: bool,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        value: 0,
        merged: false,
    };

    pub const fn new(value: u32) -> Self {
        Tile {
            value,
            merged: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Empty, or a power of two no larger than [`MAX_TILE_VALUE`].
    pub fn is_valid_value(value: u32) -> bool {
        value == 0 || (value >= 2 && value.is_power_of_two())
    }
}

/// Largest tile a grid accepts from outside the engine.
pub const MAX_TILE_VALUE: u32 = 1 << 31;

/// A `(row, col)` coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An N x N board of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an empty grid. A size of zero is rejected.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize(size));
        }
        Ok(Grid {
            size,
            cells: vec![Tile::EMPTY; size * size],
        })
    }

    /// Build a grid from row-major values. `values.len()` must be `size * size`.
    pub fn from_values(size: usize, values: &[u32]) -> Result<Self> {
        if size == 0 || values.len() != size * size {
            return Err(GameError::InvalidSize(size));
        }
        if let Some(&bad) = values.iter().find(|&&v| !Tile::is_valid_value(v)) {
            return Err(GameError::InvalidTile(bad));
        }
        Ok(Grid {
            size,
            cells: values.iter().map(|&v| Tile::new(v)).collect(),
        })
    }

    /// Build a grid from nested rows. The input must be square.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.as_ref().len() != size) {
            return Err(GameError::InvalidSize(size));
        }
        let values: Vec<u32> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_values(size, &values)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Tile> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, tile: Tile) -> Result<()> {
        let idx = self.index(row, col)?;
        if !Tile::is_valid_value(tile.value) {
            return Err(GameError::InvalidTile(tile.value));
        }
        self.cells[idx] = tile;
        Ok(())
    }

    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        self.set(row, col, Tile::EMPTY)
    }

    /// Positional access for callers that already hold an in-range position.
    pub(crate) fn tile_at(&self, pos: Position) -> Tile {
        self.cells[pos.row * self.size + pos.col]
    }

    pub(crate) fn put(&mut self, pos: Position, tile: Tile) {
        self.cells[pos.row * self.size + pos.col] = tile;
    }

    /// Empty every cell.
    pub(crate) fn wipe(&mut self) {
        self.cells.fill(Tile::EMPTY);
    }

    /// True iff no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|t| !t.is_empty())
    }

    /// Clear the merged flag on every tile.
    pub fn reset_merge_flags(&mut self) {
        for tile in &mut self.cells {
            tile.merged = false;
        }
    }

    /// All empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_empty())
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_empty()).count()
    }

    /// Pick an empty position uniformly at random, or `None` if the grid is full.
    pub fn random_empty_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let empty = self.empty_positions();
        if empty.is_empty() {
            return None;
        }
        Some(empty[rng.gen_range(0..empty.len())])
    }

    /// Largest tile value on the board (0 for an empty grid).
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|t| t.value as u64).sum()
    }

    /// Row-major snapshot of the tile values.
    pub fn values(&self) -> Vec<u32> {
        self.cells.iter().map(|t| t.value).collect()
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|t| t.value).collect())
            .collect()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Compare cell values only, ignoring merge flags.
    pub fn same_values(&self, other: &Grid) -> bool {
        self.size == other.size
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.value == b.value)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}", "------+".repeat(self.size));
        writeln!(f, "{}", border)?;
        for row in self.cells.chunks(self.size) {
            write!(f, "|")?;
            for tile in row {
                if tile.is_empty() {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", tile.value)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", border)?;
        }
        Ok(())
    }
}
