//! Game state module - the session engine
//!
//! Owns the board, the RNG and all level/session bookkeeping. Every intent is
//! a method returning `bool`: `false` means the intent was rejected and the
//! state is unchanged. Moves are strictly one at a time: a move marks itself
//! in progress, and the post-move checks (target, low tile count,
//! replenishment, game over) run from [`GameState::tick`] once every tile has
//! stopped sliding.
//!
//! There are no automatic or chained merges. A merge only ever happens as the
//! direct result of the player moving the selected tile.
//!
//! Special tiles are never spawned fresh: on [`GameState::advance_level`] the
//! tiles that reached the previous target are re-flagged as special.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::board::Board;
use crate::progression::next_target;
use crate::rng::SimpleRng;
use crate::snapshot::{GameSnapshot, TileSnapshot};
use crate::tile::Tile;
use crate::types::*;

/// Queued events beyond this are dropped oldest-first.
const MAX_PENDING_EVENTS: usize = 256;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    rng: SimpleRng,
    state: EngineState,
    level: u32,
    current_target: u32,
    /// Target of every level reached so far, oldest first.
    targets: Vec<u32>,
    total_score: u64,
    /// Best completion time per level (ms).
    best_times: BTreeMap<u32, u64>,
    level_elapsed_ms: u64,
    level_completion_ms: Option<u64>,
    selected: Option<TileId>,
    move_in_progress: bool,
    add_tile_after_move: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    events: Vec<CoreEvent>,
}

impl GameState {
    /// Start a fresh game: level 1, first target, two tiles in the top row.
    pub fn new(seed: u32) -> Self {
        let mut gs = Self::blank(seed, FIRST_TARGET);
        gs.seed_starting_tiles();
        gs
    }

    /// Build a level-1 session in `Playing` from an explicit value grid
    /// (`0` = empty) and target.
    ///
    /// Tiles that already meet `target` are not flagged until the next target
    /// check (the first settled move, or [`GameState::check_level_completion`]).
    pub fn from_layout(
        seed: u32,
        target: u32,
        layout: [[u32; GRID_SIZE as usize]; GRID_SIZE as usize],
    ) -> Self {
        let mut gs = Self::blank(seed, target);
        gs.board = Board::from_values(layout);
        gs
    }

    fn blank(seed: u32, target: u32) -> Self {
        Self {
            board: Board::new(),
            rng: SimpleRng::new(seed),
            state: EngineState::Playing,
            level: 1,
            current_target: target,
            targets: vec![target],
            total_score: 0,
            best_times: BTreeMap::new(),
            level_elapsed_ms: 0,
            level_completion_ms: None,
            selected: None,
            move_in_progress: false,
            add_tile_after_move: false,
            episode_id: 0,
            events: Vec::new(),
        }
    }

    fn seed_starting_tiles(&mut self) {
        for _ in 0..STARTING_TILES {
            self.add_random_tile();
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_target(&self) -> u32 {
        self.current_target
    }

    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn best_time_ms(&self, level: u32) -> Option<u64> {
        self.best_times.get(&level).copied()
    }

    pub fn best_times(&self) -> &BTreeMap<u32, u64> {
        &self.best_times
    }

    pub fn level_elapsed_ms(&self) -> u64 {
        self.level_elapsed_ms
    }

    pub fn level_completion_ms(&self) -> Option<u64> {
        self.level_completion_ms
    }

    /// Cell of the selected tile.
    pub fn selected(&self) -> Option<Pos> {
        self.selected_tile().map(Tile::pos)
    }

    pub fn selected_tile(&self) -> Option<&Tile> {
        self.selected.and_then(|id| self.board.tile(id))
    }

    pub fn move_in_progress(&self) -> bool {
        self.move_in_progress
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Take all queued events.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: CoreEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn accepts_input(&self) -> bool {
        self.state.accepts_play() && !self.move_in_progress
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        for tile in self.board.tiles() {
            out.tiles.push(TileSnapshot::from_tile(tile, self.selected));
        }
        out.selected = self.selected();
        out.state = self.state;
        out.level = self.level;
        out.target = self.current_target;
        out.total_score = self.total_score;
        out.elapsed_ms = self.level_elapsed_ms;
        out.completion_ms = self.level_completion_ms;
        out.best_ms = self.best_time_ms(self.level);
        out.move_in_progress = self.move_in_progress;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Select the tile at `pos`, or clear the selection if the cell is empty.
    ///
    /// Returns whether a tile is now selected. Rejected (state unchanged)
    /// outside `Playing` or while a move is settling.
    pub fn select(&mut self, pos: Pos) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.selected = self.board.id_at(pos);
        self.selected.is_some()
    }

    /// Select the next tile after the current selection in row-major order,
    /// wrapping around.
    pub fn select_next(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let start = self.selected().map(|p| p.index() + 1).unwrap_or(0);
        let next = (0..CELL_COUNT)
            .filter_map(|k| Pos::from_index((start + k) % CELL_COUNT))
            .find_map(|p| self.board.id_at(p));
        self.selected = next;
        next.is_some()
    }

    /// Move the selected tile one cell in `dir`.
    ///
    /// Slides into an empty cell or merges into an equal neighbour. Moving off
    /// the board or into a different value is rejected.
    pub fn move_selected(&mut self, dir: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(tile) = self.selected_tile() else {
            return false;
        };
        let (id, from, value) = (tile.id(), tile.pos(), tile.value());
        let Some(to) = from.step(dir) else {
            return false;
        };

        match self.board.get(to).map(|t| (t.id(), t.value())) {
            None => {
                if !self.board.relocate(id, to) {
                    return false;
                }
                self.emit(CoreEvent::Slid { from, to });
            }
            Some((into, other)) if other == value => {
                self.board.remove(id);
                let merged = match self.board.tile_mut(into) {
                    Some(t) => t.absorb(),
                    None => return false,
                };
                self.selected = None;
                self.emit(CoreEvent::Merged { at: to, value: merged });
            }
            Some(_) => return false,
        }

        self.move_in_progress = true;
        self.add_tile_after_move = true;
        true
    }

    /// Advance the level clock and animations by `elapsed_ms`.
    ///
    /// Returns true when a pending move settled during this tick and the
    /// post-move checks ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.state == EngineState::Playing {
            self.level_elapsed_ms += elapsed_ms as u64;
        }

        let dt = elapsed_ms as f32 / 1000.0;
        let mut all_stopped = true;
        for tile in self.board.tiles_mut() {
            if tile.update(dt) {
                all_stopped = false;
            }
        }

        if self.move_in_progress && all_stopped {
            self.finish_move();
            return true;
        }
        false
    }

    fn finish_move(&mut self) {
        self.move_in_progress = false;

        self.check_level_completion();

        let add_pending = std::mem::take(&mut self.add_tile_after_move);
        if self.check_low_tile_count() {
            // Safeguard tile replaces the regular one.
        } else if add_pending {
            self.add_random_tile();
            self.check_level_completion();
        }

        self.check_game_over();
    }

    /// Flag every tile at or above the target and enter `LevelComplete`.
    ///
    /// A tile's value is credited to the score when its target flag first
    /// flips on, so repeated calls never credit twice. Returns whether any
    /// tile meets the target.
    pub fn check_level_completion(&mut self) -> bool {
        let target = self.current_target;
        let mut reached = false;
        let mut credit = 0u64;
        for tile in self.board.tiles_mut() {
            if tile.value() >= target {
                reached = true;
                if !tile.is_target() {
                    tile.set_target(true);
                    credit += tile.value() as u64;
                }
            }
        }
        self.total_score += credit;

        if reached {
            self.enter_level_complete(self.level_elapsed_ms);
        }
        reached
    }

    fn enter_level_complete(&mut self, elapsed_ms: u64) {
        if self.state != EngineState::Playing {
            return;
        }
        self.state = EngineState::LevelComplete;
        self.level_completion_ms = Some(elapsed_ms);

        let best = self.best_times.entry(self.level).or_insert(elapsed_ms);
        if elapsed_ms < *best {
            *best = elapsed_ms;
        }
        let best_ms = *best;

        debug!(
            "level {} complete in {}ms (best {}ms), score {}",
            self.level, elapsed_ms, best_ms, self.total_score
        );
        self.emit(CoreEvent::LevelComplete {
            level: self.level,
            elapsed_ms,
            best_ms,
        });
    }

    /// Two tiles of different value can never merge again; add one.
    fn check_low_tile_count(&mut self) -> bool {
        let tiles = self.board.tiles();
        if tiles.len() == 2 && tiles[0].value() != tiles[1].value() {
            self.add_random_tile();
            return true;
        }
        false
    }

    /// Enter `GameOver` if the board is full and no neighbours match.
    ///
    /// Only transitions from `Playing`; returns whether it transitioned now.
    pub fn check_game_over(&mut self) -> bool {
        if self.state != EngineState::Playing || !self.no_moves_left() {
            return false;
        }
        self.state = EngineState::GameOver;
        debug!("game over at level {}, final score {}", self.level, self.total_score);
        self.emit(CoreEvent::GameOver {
            score: self.total_score,
        });
        true
    }

    pub fn no_moves_left(&self) -> bool {
        self.board.is_full() && !self.board.has_adjacent_pair()
    }

    /// Place one new 2 or 4, preferring the top row.
    ///
    /// Evicts low tiles first until `MIN_EMPTY_CELLS` cells are free (or no
    /// tile is eligible). Returns false only when no cell is empty.
    pub fn add_random_tile(&mut self) -> bool {
        while self.board.count_empty() < MIN_EMPTY_CELLS {
            if !self.remove_low_value_tile() {
                warn!(
                    "no evictable tile, placing with {} empty cell(s)",
                    self.board.count_empty()
                );
                break;
            }
        }

        let top = self.board.empty_cells_in_row(0);
        let pos = match self.rng.choose(&top) {
            Some(p) => p,
            None => {
                let any = self.board.empty_cells();
                match self.rng.choose(&any) {
                    Some(p) => p,
                    None => return false,
                }
            }
        };

        let value = if self.rng.chance(SPAWN_FOUR_PERCENT) { 4 } else { 2 };
        let Some(id) = self.board.spawn(value, pos, false) else {
            return false;
        };
        debug!("spawned {} at ({}, {})", value, pos.row(), pos.col());
        self.emit(CoreEvent::Spawned { at: pos, value });

        if value >= self.current_target {
            if let Some(tile) = self.board.tile_mut(id) {
                tile.set_target(true);
            }
            self.total_score += value as u64;
            self.enter_level_complete(self.level_elapsed_ms);
        }
        true
    }

    /// Evict one random tile from the lowest quarter by value.
    ///
    /// Selected, special and target tiles are never evicted. Returns false
    /// when no candidate is eligible.
    pub fn remove_low_value_tile(&mut self) -> bool {
        let mut ranked: ArrayVec<(u32, TileId), CELL_COUNT> = self
            .board
            .tiles()
            .iter()
            .map(|t| (t.value(), t.id()))
            .collect();
        if ranked.is_empty() {
            return false;
        }
        ranked.sort_by_key(|&(value, _)| value);

        let pool = (ranked.len() / EVICTION_POOL_DIVISOR).max(1);
        let eligible: ArrayVec<TileId, CELL_COUNT> = ranked[..pool]
            .iter()
            .map(|&(_, id)| id)
            .filter(|&id| Some(id) != self.selected)
            .filter(|&id| {
                self.board
                    .tile(id)
                    .is_some_and(|t| !t.is_special() && !t.is_target())
            })
            .collect();

        let Some(victim) = self.rng.choose(&eligible) else {
            return false;
        };
        let Some(tile) = self.board.remove(victim) else {
            return false;
        };
        debug!(
            "evicted {} at ({}, {})",
            tile.value(),
            tile.pos().row(),
            tile.pos().col()
        );
        self.emit(CoreEvent::Evicted {
            at: tile.pos(),
            value: tile.value(),
        });
        true
    }

    /// Leave `LevelComplete` for the next level, keeping every tile.
    pub fn advance_level(&mut self) -> bool {
        if self.state != EngineState::LevelComplete {
            return false;
        }

        let previous = self.current_target;
        self.level += 1;
        self.current_target = next_target(self.board.max_value(), previous);
        self.targets.push(self.current_target);

        self.level_elapsed_ms = 0;
        self.level_completion_ms = None;
        self.selected = None;
        self.move_in_progress = false;
        self.add_tile_after_move = false;
        self.state = EngineState::Playing;

        debug!("level {} started, target {}", self.level, self.current_target);
        self.emit(CoreEvent::LevelStarted {
            level: self.level,
            target: self.current_target,
        });

        // Last level's target tiles carry over as special tiles.
        for tile in self.board.tiles_mut() {
            if tile.is_target() {
                tile.set_target(false);
                tile.set_special(true);
            }
        }

        // Re-evaluate against the new target (clock is at zero).
        if self.check_level_completion() {
            return true;
        }

        if self.board.tile_count() < 2 {
            let mut empty = self.board.empty_cells();
            for _ in 0..empty.len().min(2) {
                let i = self.rng.next_range(empty.len() as u32) as usize;
                let pos = empty.remove(i);
                let value = if self.rng.chance(SAFETY_FOUR_PERCENT) { 4 } else { 2 };
                if self.board.spawn(value, pos, false).is_some() {
                    self.emit(CoreEvent::Spawned { at: pos, value });
                }
            }
        }

        true
    }

    /// Replace a finished game with a fresh one (only in `GameOver`).
    pub fn restart(&mut self) -> bool {
        if self.state != EngineState::GameOver {
            return false;
        }
        let seed = self.rng.state();
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(seed);
        self.episode_id = next_episode;
        true
    }

    /// Re-seed the current level's board: two fresh tiles, clock reset.
    ///
    /// Level, target, score and best times are kept.
    pub fn reset_level(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.board.clear();
        self.selected = None;
        self.add_tile_after_move = false;
        self.level_elapsed_ms = 0;
        self.level_completion_ms = None;
        self.seed_starting_tiles();
        true
    }

    /// Apply a player intent
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Select { row, col } => match Pos::new(row, col) {
                Some(pos) => self.select(pos),
                None => false,
            },
            GameAction::SelectNext => self.select_next(),
            GameAction::Move(dir) => self.move_selected(dir),
            GameAction::Continue => match self.state {
                EngineState::LevelComplete => self.advance_level(),
                EngineState::GameOver => self.restart(),
                EngineState::Playing => false,
            },
            GameAction::Advance => self.advance_level(),
            GameAction::Restart => self.restart(),
            GameAction::ResetLevel => self.reset_level(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
