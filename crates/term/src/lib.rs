//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the view renders a
//! [`core::GameSnapshot`] into a plain framebuffer, and the renderer flushes
//! framebuffers to the terminal. No widget toolkit is involved, which keeps
//! the tile geometry (and pointer hit-testing) under direct control.

pub mod fb;
pub mod game_view;
pub mod palette;
pub mod renderer;

pub use tile_merger_core as core;
pub use tile_merger_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{format_hms, AnchorY, GameView, Viewport};
pub use palette::{color_for, text_color_for};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
