use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::spawn::{SpawnPolicy, DEFAULT_FOUR_PROBABILITY};

/// Session configuration.
///
/// Every field has a default, so a TOML file only needs to name the fields it
/// changes:
///
/// ```toml
/// size = 5
/// four_probability = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid side length.
    pub size: usize,
    /// Chance that a spawned tile is a 4.
    pub four_probability: f64,
    /// Tiles placed on the empty grid when a game starts.
    pub initial_tiles: usize,
    /// Tile value that counts as a win. `None` disables win tracking.
    pub win_value: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: 4,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            initial_tiles: 2,
            win_value: Some(2048),
        }
    }
}

impl GameConfig {
    /// Default configuration on a grid of the given size.
    ///
    /// Grids too small for the usual two starting tiles get fewer.
    pub fn with_size(size: usize) -> Self {
        GameConfig {
            size,
            initial_tiles: 2usize.min(size * size),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(GameError::InvalidSize(self.size));
        }
        SpawnPolicy::new(self.four_probability)?;
        if self.initial_tiles == 0 {
            return Err(GameError::InvalidConfig(
                "initial_tiles must be at least 1".to_string(),
            ));
        }
        if self.initial_tiles > self.size * self.size {
            return Err(GameError::InvalidConfig(format!(
                "initial_tiles ({}) exceeds the {} cells of a {}x{} grid",
                self.initial_tiles,
                self.size * self.size,
                self.size,
                self.size
            )));
        }
        if let Some(win) = self.win_value {
            if win < 4 || !win.is_power_of_two() {
                return Err(GameError::InvalidConfig(format!(
                    "win_value must be a power of two of at least 4, got {}",
                    win
                )));
            }
        }
        Ok(())
    }

    /// The spawn policy described by this config.
    pub fn spawn_policy(&self) -> Result<SpawnPolicy> {
        SpawnPolicy::new(self.four_probability)
    }
}
