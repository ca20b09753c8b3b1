use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::direction::Direction;
use crate::error::{GameError, Result};
use crate::grid::{Grid, Position};
use crate::resolver::{self, Resolution, TileMove};
use crate::spawn::SpawnPolicy;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    InProgress,
    Over,
}

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed (a tile was spawned if true).
    pub changed: bool,
    /// Session state after the move.
    pub state: GameState,
    /// Points earned from merges in this move.
    pub reward: u32,
    /// Where the new tile landed, if one was spawned.
    pub spawned: Option<Position>,
    /// Tiles that slid or merged during this move.
    pub moves: Vec<TileMove>,
    /// Whether the win tile has been reached at any point in the session.
    pub won: bool,
}

/// One game: a grid, a spawn policy and the random source driving it.
#[derive(Debug, Clone)]
pub struct GameSession<R = SmallRng> {
    config: GameConfig,
    policy: SpawnPolicy,
    grid: Grid,
    rng: R,
    state: GameState,
    score: u64,
    moves_made: u32,
    won: bool,
}

/// Start a game on a `size`x`size` grid with an entropy-seeded RNG.
pub fn new_game(size: usize) -> Result<GameSession<SmallRng>> {
    GameSession::new(GameConfig::with_size(size), SmallRng::from_entropy())
}

/// Start a reproducible game on a `size`x`size` grid.
pub fn new_game_seeded(size: usize, seed: u64) -> Result<GameSession<SmallRng>> {
    GameSession::new(GameConfig::with_size(size), SmallRng::seed_from_u64(seed))
}

impl<R: Rng> GameSession<R> {
    /// Create a session and place the configured number of starting tiles.
    pub fn new(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut session = GameSession {
            policy: config.spawn_policy()?,
            grid: Grid::new(config.size)?,
            config,
            rng,
            state: GameState::InProgress,
            score: 0,
            moves_made: 0,
            won: false,
        };
        session.place_initial_tiles();
        Ok(session)
    }

    /// Resume from an explicit grid. The grid size must match `config.size`.
    ///
    /// The state starts as `InProgress`; a stuck grid is detected on the
    /// next call to [`GameSession::apply_move`].
    pub fn from_grid(grid: Grid, config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        if grid.size() != config.size {
            return Err(GameError::InvalidConfig(format!(
                "grid is {}x{} but config expects size {}",
                grid.size(),
                grid.size(),
                config.size
            )));
        }
        let mut grid = grid;
        grid.reset_merge_flags();
        let mut session = GameSession {
            policy: config.spawn_policy()?,
            grid,
            config,
            rng,
            state: GameState::InProgress,
            score: 0,
            moves_made: 0,
            won: false,
        };
        session.update_won();
        Ok(session)
    }

    /// Reset to a fresh grid with the same config, continuing the RNG stream.
    pub fn restart(&mut self) {
        self.grid.wipe();
        self.state = GameState::InProgress;
        self.score = 0;
        self.moves_made = 0;
        self.won = false;
        self.place_initial_tiles();
    }

    /// Apply a move in the given direction.
    ///
    /// If the move doesn't change the board, no tile is spawned and the turn
    /// does not advance. Either way the session checks afterwards whether
    /// any move remains.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.state == GameState::Over {
            return Err(GameError::GameOver);
        }

        let Resolution {
            grid,
            changed,
            reward,
            moves,
        } = resolver::resolve(&self.grid, direction);

        let mut spawned = None;
        if changed {
            self.grid = grid;
            self.score += u64::from(reward);
            self.moves_made += 1;
            spawned = self.policy.spawn(&mut self.grid, &mut self.rng);
            self.grid.reset_merge_flags();
            self.update_won();
        } else {
            log::debug!("move {} rejected: grid unchanged", direction);
        }

        if self.grid.is_full() && !resolver::has_any_move(&self.grid) {
            self.state = GameState::Over;
            log::info!(
                "game over after {} moves: score={} max_tile={}",
                self.moves_made,
                self.score,
                self.grid.max_tile()
            );
        }

        Ok(MoveOutcome {
            changed,
            state: self.state,
            reward,
            spawned,
            moves,
            won: self.won,
        })
    }

    /// Legal moves as `[Up, Down, Left, Right]`.
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::ALL.map(|dir| resolver::can_move(&self.grid, dir))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    /// Cumulative merge reward.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Number of accepted (board-changing) moves.
    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    fn place_initial_tiles(&mut self) {
        for _ in 0..self.config.initial_tiles {
            self.policy.spawn(&mut self.grid, &mut self.rng);
        }
    }

    fn update_won(&mut self) {
        if self.won {
            return;
        }
        if let Some(target) = self.config.win_value {
            if self.grid.max_tile() >= target {
                self.won = true;
                log::info!("reached {} after {} moves", target, self.moves_made);
            }
        }
    }
}

impl<R> fmt::Display for GameSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        write!(f, "{}", self.grid)
    }
}
