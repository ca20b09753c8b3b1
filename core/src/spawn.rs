use rand::Rng;

use crate::error::{GameError, Result};
use crate::grid::{Grid, Position, Tile};

/// Default chance that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.10;

/// Decides the value and location of newly inserted tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    four_probability: f64,
}

impl SpawnPolicy {
    /// Create a policy spawning a 4 with the given probability.
    pub fn new(four_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&four_probability) {
            return Err(GameError::InvalidProbability(four_probability));
        }
        Ok(SpawnPolicy { four_probability })
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }

    /// Draw the value of the next tile: 4 with `four_probability`, else 2.
    ///
    /// The comparison is strict, so a probability of 0 never yields a 4 and
    /// a probability of 1 always does.
    pub fn spawn_value<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if rng.gen::<f64>() < self.four_probability {
            4
        } else {
            2
        }
    }

    /// Insert a fresh tile in a random empty cell.
    ///
    /// Returns where the tile landed, or `None` if the grid is full.
    pub fn spawn<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Option<Position> {
        let pos = grid.random_empty_position(rng)?;
        let value = self.spawn_value(rng);
        grid.put(pos, Tile::new(value));
        log::debug!("spawned {} at {}", value, pos);
        Some(pos)
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy {
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}
