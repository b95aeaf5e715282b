//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key and mouse events into [`crate::types::GameAction`]s
//! and terminal cell coordinates. Translating a pointer position into a board
//! cell is layout knowledge and lives with the renderer.

pub mod map;

pub use tile_merger_types as types;

pub use map::{handle_key_event, pointer_press, should_quit};
