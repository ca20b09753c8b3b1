//! Move resolution: slide every lane toward the move direction and merge
//! equal neighbours.
//!
//! There is exactly one algorithm, [`collapse`], which works on the
//! non-empty tiles of a single lane ordered target-most first. Each
//! direction only differs in how its lanes are read from and written back to
//! the grid, which is what [`Direction::lane`] describes.

use serde::Serialize;

use crate::direction::Direction;
use crate::grid::{Grid, Position, Tile};

/// One tile's journey during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileMove {
    pub from: Position,
    pub to: Position,
    /// The destination tile was produced by a merge.
    pub merged: bool,
}

/// Result of resolving one direction against a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The grid after sliding and merging. Merge flags are still set.
    pub grid: Grid,
    /// Whether any cell value differs from the input grid.
    pub changed: bool,
    /// Sum of the values of all tiles created by a merge.
    pub reward: u32,
    /// Every tile that left its cell, in lane order.
    pub moves: Vec<TileMove>,
}

/// An output slot of a collapsed lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Collapsed<K> {
    value: u32,
    merged: bool,
    first: K,
    second: Option<K>,
}

/// Collapse a lane, target-most item first. Zero values are skipped.
///
/// A slot produced by a merge is never merged again in the same pass.
/// Values and reward saturate at `u32::MAX` instead of overflowing.
fn collapse<K: Copy>(items: impl IntoIterator<Item = (K, u32)>) -> (Vec<Collapsed<K>>, u32) {
    let mut out: Vec<Collapsed<K>> = Vec::new();
    let mut reward = 0u32;

    for (key, value) in items {
        if value == 0 {
            continue;
        }
        if let Some(last) = out.last_mut().filter(|c| !c.merged && c.value == value) {
            last.value = last.value.saturating_mul(2);
            last.merged = true;
            last.second = Some(key);
            reward = reward.saturating_add(last.value);
            continue;
        }
        out.push(Collapsed {
            value,
            merged: false,
            first: key,
            second: None,
        });
    }

    (out, reward)
}

/// Collapse a single lane of values ordered target-most first.
///
/// Returns the compacted values (without padding) and the merge reward.
///
/// ```
/// use tile_merge_core::resolver::collapse_lane;
///
/// assert_eq!(collapse_lane(&[2, 2, 2, 0]), (vec![4, 2], 4));
/// assert_eq!(collapse_lane(&[0, 2, 0, 4]), (vec![2, 4], 0));
/// ```
pub fn collapse_lane(values: &[u32]) -> (Vec<u32>, u32) {
    let (slots, reward) = collapse(values.iter().map(|&v| ((), v)));
    (slots.into_iter().map(|s| s.value).collect(), reward)
}

/// Resolve `direction` against `grid` without touching the input.
pub fn resolve(grid: &Grid, direction: Direction) -> Resolution {
    let size = grid.size();
    let mut next = grid.clone();
    let mut moves = Vec::new();
    let mut reward = 0u32;

    for index in 0..size {
        let lane = direction.lane(size, index);
        let (slots, lane_reward) =
            collapse(lane.iter().map(|&pos| (pos, grid.tile_at(pos).value)));
        reward = reward.saturating_add(lane_reward);

        for (slot, &to) in lane.iter().enumerate() {
            let tile = match slots.get(slot) {
                Some(c) => {
                    for from in std::iter::once(c.first).chain(c.second) {
                        if from != to {
                            moves.push(TileMove {
                                from,
                                to,
                                merged: c.merged,
                            });
                        }
                    }
                    Tile {
                        value: c.value,
                        merged: c.merged,
                    }
                }
                None => Tile::EMPTY,
            };
            next.put(to, tile);
        }
    }

    let changed = !next.same_values(grid);
    log::trace!(
        "resolved {} on {}x{}: changed={} reward={}",
        direction,
        size,
        size,
        changed,
        reward
    );

    Resolution {
        grid: next,
        changed,
        reward,
        moves,
    }
}

/// Whether moving in `direction` would change the grid.
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    resolve(grid, direction).changed
}

/// Whether any direction would change the grid.
pub fn has_any_move(grid: &Grid) -> bool {
    Direction::ALL.iter().any(|&dir| can_move(grid, dir))
}
