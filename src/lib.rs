//! Tile Merger (workspace facade crate).
//!
//! Re-exports the member crates under one name so the binary, integration
//! tests and benches share a single `tile_merger::{core,input,term,types}` API.

pub mod config;

pub use tile_merger_core as core;
pub use tile_merger_input as input;
pub use tile_merger_term as term;
pub use tile_merger_types as types;

pub use config::AppConfig;
