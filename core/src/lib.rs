//! # Tile-Merge Rules Engine
//!
//! A pure Rust implementation of the rules of a sliding-tile merging puzzle
//! ("2048"-style) on an N x N grid. Randomness is injected, so every game is
//! reproducible from its RNG. Rendering and input are left to the host.
//!
//! ## Example
//!
//! ```rust
//! use tile_merge_core::{new_game_seeded, Direction, GameState};
//!
//! let mut game = new_game_seeded(4, 42).unwrap();
//! let outcome = game.apply_move(Direction::Left).unwrap();
//! println!("Score: {}, Changed: {}", game.score(), outcome.changed);
//! assert_eq!(game.state(), GameState::InProgress);
//! ```

pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod resolver;
pub mod session;
pub mod spawn;

pub use config::GameConfig;
pub use direction::Direction;
pub use error::{GameError, Result};
pub use grid::{Grid, Position, Tile, MAX_TILE_VALUE};
pub use resolver::{can_move, has_any_move, resolve, Resolution, TileMove};
pub use session::{new_game, new_game_seeded, GameSession, GameState, MoveOutcome};
pub use spawn::{SpawnPolicy, DEFAULT_FOUR_PROBABILITY};
