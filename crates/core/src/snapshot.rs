//! Snapshot module - read-only view of a session for the presentation layer
//!
//! Filled once per frame by `GameState::snapshot_into`, reusing its storage.

use arrayvec::ArrayVec;

use crate::tile::Tile;
use crate::types::{EngineState, Pos, TileId, CELL_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSnapshot {
    pub id: TileId,
    pub value: u32,
    pub pos: Pos,
    /// Drawn column (cell units, animated).
    pub x: f32,
    /// Drawn row (cell units, animated).
    pub y: f32,
    pub special: bool,
    pub target: bool,
    pub selected: bool,
    pub merge_pulse: f32,
    pub glow_phase: f32,
}

impl TileSnapshot {
    pub(crate) fn from_tile(tile: &Tile, selected: Option<TileId>) -> Self {
        let anim = tile.anim();
        Self {
            id: tile.id(),
            value: tile.value(),
            pos: tile.pos(),
            x: anim.x,
            y: anim.y,
            special: tile.is_special(),
            target: tile.is_target(),
            selected: selected == Some(tile.id()),
            merge_pulse: anim.merge_pulse,
            glow_phase: anim.glow_phase,
        }
    }
}

/// Everything the presentation layer reads in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub tiles: ArrayVec<TileSnapshot, CELL_COUNT>,
    pub selected: Option<Pos>,
    pub state: EngineState,
    pub level: u32,
    pub target: u32,
    pub total_score: u64,
    /// Time spent in the current level so far.
    pub elapsed_ms: u64,
    /// Set once the current level is complete.
    pub completion_ms: Option<u64>,
    /// Best completion time of the current level.
    pub best_ms: Option<u64>,
    pub move_in_progress: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.selected = None;
        self.state = EngineState::Playing;
        self.level = 1;
        self.target = 0;
        self.total_score = 0;
        self.elapsed_ms = 0;
        self.completion_ms = None;
        self.best_ms = None;
        self.move_in_progress = false;
        self.episode_id = 0;
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&TileSnapshot> {
        self.tiles.iter().find(|t| t.pos == pos)
    }

    /// Time to show on the clock: the frozen completion time once a level is
    /// done, the running time otherwise.
    pub fn display_time_ms(&self) -> u64 {
        match self.state {
            EngineState::Playing => self.elapsed_ms,
            _ => self.completion_ms.unwrap_or(self.elapsed_ms),
        }
    }

    pub fn playable(&self) -> bool {
        self.state.accepts_play() && !self.move_in_progress
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            tiles: ArrayVec::new(),
            selected: None,
            state: EngineState::Playing,
            level: 1,
            target: 0,
            total_score: 0,
            elapsed_ms: 0,
            completion_ms: None,
            best_ms: None,
            move_in_progress: false,
            episode_id: 0,
        };
        s.clear();
        s
    }
}
