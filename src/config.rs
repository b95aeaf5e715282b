//! Start-up configuration from environment variables.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::term::game_view::{MAX_CELL_H, MAX_CELL_W, MIN_CELL_H, MIN_CELL_W};

pub const DEFAULT_CELL_W: u16 = 7;
pub const DEFAULT_CELL_H: u16 = 3;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings for the terminal game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// RNG seed for the session.
    pub seed: u32,
    /// Tile width in terminal columns.
    pub cell_w: u16,
    /// Tile height in terminal rows.
    pub cell_h: u16,
    /// File logging is off unless this is set.
    pub log_path: Option<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            cell_w: DEFAULT_CELL_W,
            cell_h: DEFAULT_CELL_H,
            log_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Read `TILE_MERGER_*` variables; missing or invalid values use defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = get("TILE_MERGER_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);

        let cell_w = get("TILE_MERGER_CELL_W")
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|w| (MIN_CELL_W..=MAX_CELL_W).contains(w))
            .unwrap_or(DEFAULT_CELL_W);
        let cell_h = get("TILE_MERGER_CELL_H")
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|h| (MIN_CELL_H..=MAX_CELL_H).contains(h))
            .unwrap_or(DEFAULT_CELL_H);

        let log_path = get("TILE_MERGER_LOG_PATH");
        let log_filter =
            get("TILE_MERGER_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            seed,
            cell_w,
            cell_h,
            log_path,
            log_filter,
        }
    }
}

fn clock_seed() -> u32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() as u32) ^ now.subsec_nanos()
}
