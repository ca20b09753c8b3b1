//! # Tile-Merge WebAssembly Bindings
//!
//! This crate provides JavaScript-friendly bindings to the rules engine
//! using wasm-bindgen. It wraps a `GameSession` and exposes a class-like API
//! suitable for use in web front ends.

use serde::Serialize;
use tile_merge_core::{Direction, GameSession, GameState, Position, TileMove};
use wasm_bindgen::prelude::*;

/// Result of a step operation, serialized for JavaScript.
#[derive(Serialize)]
pub struct JsStepResult {
    /// The updated board state (size * size elements, row-major order).
    pub board: Vec<u32>,
    /// Current total score.
    pub score: u64,
    /// Points earned from this move.
    pub reward: u32,
    /// Whether the board changed.
    pub changed: bool,
    /// Whether the game is over.
    pub done: bool,
    /// Whether the win tile has been reached.
    pub won: bool,
    /// Where the new tile landed, if any.
    pub spawned: Option<Position>,
    /// Tile movements for animation.
    pub moves: Vec<TileMove>,
}

/// WebAssembly wrapper for a game session.
#[wasm_bindgen]
pub struct WasmGame {
    game: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game on a `size` x `size` grid.
    ///
    /// The seed is a 64-bit integer used to initialize the deterministic RNG.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, seed: u64) -> Result<WasmGame, JsError> {
        let game = tile_merge_core::new_game_seeded(size, seed)?;
        Ok(WasmGame { game })
    }

    /// Start over on a fresh grid.
    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Execute a move in the given direction.
    ///
    /// Direction codes:
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    ///
    /// Throws on an invalid code or once the game is over.
    pub fn step(&mut self, direction: u8) -> Result<JsValue, JsError> {
        let direction = Direction::try_from(direction)?;
        let outcome = self.game.apply_move(direction)?;

        let result = JsStepResult {
            board: self.game.grid().values(),
            score: self.game.score(),
            reward: outcome.reward,
            changed: outcome.changed,
            done: outcome.state == GameState::Over,
            won: outcome.won,
            spawned: outcome.spawned,
            moves: outcome.moves,
        };
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// Get the current board as a flat row-major array.
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.game.grid().values()
    }

    /// Grid side length.
    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> usize {
        self.game.grid().size()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u64 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = isDone)]
    pub fn is_done(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = hasWon)]
    pub fn has_won(&self) -> bool {
        self.game.has_won()
    }

    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.max_tile()
    }

    /// Get legal moves as an array of 4 flags [Up, Down, Left, Right].
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> Vec<u8> {
        self.game
            .legal_moves()
            .iter()
            .map(|&b| u8::from(b))
            .collect()
    }
}
