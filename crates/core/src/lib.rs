//! Core game logic module - pure, deterministic, and testable
//!
//! All rules of the tile-merging puzzle live here, with no dependency on the
//! terminal or any other I/O. The only outside input is elapsed time, passed
//! to [`GameState::tick`], and the only randomness comes from a seeded
//! [`SimpleRng`], so the same seed and the same inputs replay the same game.
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid of tile ids plus the owned tile collection
//! - [`tile`]: a single tile and its cosmetic animation state
//! - [`game_state`]: the session engine (moves, targets, replenishment, levels)
//! - [`progression`]: next-level target generation
//! - [`rng`]: small seeded LCG
//! - [`snapshot`]: read-only per-frame view for the renderer
//!
//! # Rules
//!
//! - The player selects one tile and moves it one cell at a time.
//! - A move into an empty cell slides; a move into an equal tile merges the
//!   two into one tile of double value. Anything else is rejected.
//! - After each settled move a new 2 or 4 appears, preferably in the top row,
//!   and low tiles are evicted to keep at least three cells free.
//! - A level is complete once any tile reaches the target; the next target is
//!   at least double the previous one.
//! - A full board with no equal neighbours ends the game.
//!
//! # Example
//!
//! ```
//! use tile_merger_core::GameState;
//! use tile_merger_core::types::{Direction, EngineState, GameAction, TICK_MS};
//!
//! let mut game = GameState::from_layout(7, 64, [
//!     [32, 32, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 4],
//! ]);
//!
//! game.apply_action(GameAction::Select { row: 0, col: 0 });
//! assert!(game.apply_action(GameAction::Move(Direction::Right)));
//!
//! // Post-move checks run once the board has settled.
//! while game.move_in_progress() {
//!     game.tick(TICK_MS);
//! }
//! assert_eq!(game.state(), EngineState::LevelComplete);
//! assert_eq!(game.total_score(), 64);
//! ```

pub mod board;
pub mod game_state;
pub mod progression;
pub mod rng;
pub mod snapshot;
pub mod tile;

pub use tile_merger_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::GameState;
pub use progression::next_target;
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, TileSnapshot};
pub use tile::{Tile, TileAnim};
