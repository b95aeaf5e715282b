//! Shared types and constants for the tile-merging puzzle.
//!
//! Everything in here is plain data with no dependencies, so it can be used by
//! the engine, the terminal view and the input mapping alike.
//!
//! # Board
//!
//! The board is a fixed 4x4 grid addressed by `(row, col)`, row 0 at the top.
//! New tiles prefer the top row.
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FIRST_TARGET` | 64 | Target value of level 1 |
//! | `FALLBACK_MAX_VALUE` | 128 | Target used when the board is empty on advance |
//! | `MIN_EMPTY_CELLS` | 3 | Free cells kept before placing a new tile |
//! | `STARTING_TILES` | 2 | Tiles placed on a fresh board |
//! | `SPAWN_FOUR_PERCENT` | 30 | Chance a replenishment tile is a 4 |
//! | `SAFETY_FOUR_PERCENT` | 25 | Chance a level-start safety tile is a 4 |
//! | `EVICTION_POOL_DIVISOR` | 4 | Eviction considers the lowest quarter of tiles |
//!
//! # Timing
//!
//! The frame loop ticks every `TICK_MS` (16ms, ~60 FPS). Animation constants are
//! expressed per second and in cell units (one cell = 1.0).
//!
//! # Examples
//!
//! ```
//! use tile_merger_types::{Direction, GameAction, Pos, GRID_SIZE};
//!
//! let pos = Pos::new(0, 3).unwrap();
//! assert_eq!(pos.step(Direction::Right), None);
//! assert_eq!(pos.step(Direction::Down), Pos::new(1, 3));
//!
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//! assert_eq!(GameAction::from_str("moveUp"), Some(GameAction::Move(Direction::Up)));
//! assert_eq!(GRID_SIZE, 4);
//! ```

/// Board edge length in cells.
pub const GRID_SIZE: u8 = 4;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Target value of the first level.
pub const FIRST_TARGET: u32 = 64;

/// Peak value assumed when computing a new target on an empty board.
pub const FALLBACK_MAX_VALUE: u32 = 128;

/// Minimum number of empty cells maintained before a tile is placed.
pub const MIN_EMPTY_CELLS: usize = 3;

/// Number of tiles on a freshly seeded board.
pub const STARTING_TILES: usize = 2;

/// Probability (percent) that a replenishment tile is a 4 rather than a 2.
pub const SPAWN_FOUR_PERCENT: u32 = 30;

/// Probability (percent) that a level-start safety tile is a 4 rather than a 2.
pub const SAFETY_FOUR_PERCENT: u32 = 25;

/// Eviction draws from the lowest `1 / EVICTION_POOL_DIVISOR` of tiles by value.
pub const EVICTION_POOL_DIVISOR: usize = 4;

/// Fraction of the remaining distance a sliding tile covers per second.
pub const SLIDE_RATE_PER_SEC: f32 = 15.0;

/// Distance (in cells) under which a sliding tile snaps to its destination.
pub const SNAP_EPSILON: f32 = 0.02;

/// Merge pulse decay per second (pulse starts at 1.0).
pub const MERGE_PULSE_DECAY_PER_SEC: f32 = 4.0;

/// Glow phase advance per second (radians) for special and target tiles.
pub const GLOW_RATE_PER_SEC: f32 = 2.0;

/// Stable identifier of a tile for its whole lifetime.
pub type TileId = u32;

/// A cell coordinate on the board.
///
/// Construction is bounds-checked, so a `Pos` always names a real cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    row: u8,
    col: u8,
}

impl Pos {
    /// Create a position, returning `None` outside the board.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Row-major flat index (`row * GRID_SIZE + col`).
    #[inline(always)]
    pub const fn index(self) -> usize {
        (self.row as usize) * (GRID_SIZE as usize) + (self.col as usize)
    }

    /// Inverse of [`Pos::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        Some(Self {
            row: (index / GRID_SIZE as usize) as u8,
            col: (index % GRID_SIZE as usize) as u8,
        })
    }

    /// The neighbouring cell one step in `dir`, or `None` past the edge.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.delta();
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Iterator over the (up to four) orthogonal neighbours.
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        Direction::ALL.into_iter().filter_map(move |d| self.step(d))
    }

    /// Iterator over every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELL_COUNT).filter_map(Pos::from_index)
    }
}

/// Direction of a single-step tile move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` delta of one step.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parse a direction (case-insensitive).
    ///
    /// ```
    /// use tile_merger_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Engine state machine.
///
/// `Playing` accepts selection and moves, `LevelComplete` only an advance, and
/// `GameOver` only a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Playing,
    LevelComplete,
    GameOver,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Playing => "playing",
            EngineState::LevelComplete => "levelComplete",
            EngineState::GameOver => "gameOver",
        }
    }

    pub fn accepts_play(&self) -> bool {
        matches!(self, EngineState::Playing)
    }
}

/// Player intents, produced by input mapping and applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Select the tile at a cell (clears the selection on an empty cell).
    Select { row: u8, col: u8 },
    /// Select the next tile in row-major order.
    SelectNext,
    /// Move the selected tile one cell.
    Move(Direction),
    /// Advance in `LevelComplete`, restart in `GameOver`.
    Continue,
    /// Advance to the next level (only in `LevelComplete`).
    Advance,
    /// Start a new game (only in `GameOver`).
    Restart,
    /// Re-seed the board of the current level.
    ResetLevel,
}

impl GameAction {
    /// Parse a parameterless action (camelCase, case-insensitive).
    ///
    /// `Select` carries a cell and has no string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(GameAction::Move(Direction::Up)),
            "movedown" => Some(GameAction::Move(Direction::Down)),
            "moveleft" => Some(GameAction::Move(Direction::Left)),
            "moveright" => Some(GameAction::Move(Direction::Right)),
            "selectnext" => Some(GameAction::SelectNext),
            "continue" => Some(GameAction::Continue),
            "advance" => Some(GameAction::Advance),
            "restart" => Some(GameAction::Restart),
            "resetlevel" => Some(GameAction::ResetLevel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select { .. } => "select",
            GameAction::SelectNext => "selectNext",
            GameAction::Move(Direction::Up) => "moveUp",
            GameAction::Move(Direction::Down) => "moveDown",
            GameAction::Move(Direction::Left) => "moveLeft",
            GameAction::Move(Direction::Right) => "moveRight",
            GameAction::Continue => "continue",
            GameAction::Advance => "advance",
            GameAction::Restart => "restart",
            GameAction::ResetLevel => "resetLevel",
        }
    }
}

/// Engine-side notifications, drained by the frame loop (for logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    Slid { from: Pos, to: Pos },
    Merged { at: Pos, value: u32 },
    Spawned { at: Pos, value: u32 },
    Evicted { at: Pos, value: u32 },
    LevelComplete { level: u32, elapsed_ms: u64, best_ms: u64 },
    LevelStarted { level: u32, target: u32 },
    GameOver { score: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_defaults() {
        assert_eq!(GRID_SIZE, 4);
        assert_eq!(CELL_COUNT, 16);
        assert_eq!(FIRST_TARGET, 64);
        assert_eq!(FALLBACK_MAX_VALUE, 128);
        assert_eq!(MIN_EMPTY_CELLS, 3);
        assert_eq!(SPAWN_FOUR_PERCENT, 30);
        assert_eq!(SAFETY_FOUR_PERCENT, 25);
    }

    #[test]
    fn pos_rejects_out_of_bounds() {
        assert!(Pos::new(3, 3).is_some());
        assert!(Pos::new(4, 0).is_none());
        assert!(Pos::new(0, 4).is_none());
    }

    #[test]
    fn pos_index_roundtrip_covers_board() {
        let all: Vec<Pos> = Pos::all().collect();
        assert_eq!(all.len(), CELL_COUNT);
        for (i, p) in all.iter().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(Pos::from_index(i), Some(*p));
        }
        assert_eq!(Pos::from_index(CELL_COUNT), None);
    }

    #[test]
    fn pos_step_stops_at_edges() {
        let corner = Pos::new(0, 0).unwrap();
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), Pos::new(1, 0));
        assert_eq!(corner.step(Direction::Right), Pos::new(0, 1));

        let far = Pos::new(3, 3).unwrap();
        assert_eq!(far.step(Direction::Down), None);
        assert_eq!(far.step(Direction::Right), None);
    }

    #[test]
    fn neighbors_count_by_location() {
        assert_eq!(Pos::new(0, 0).unwrap().neighbors().count(), 2);
        assert_eq!(Pos::new(0, 1).unwrap().neighbors().count(), 3);
        assert_eq!(Pos::new(1, 1).unwrap().neighbors().count(), 4);
    }

    #[test]
    fn action_strings_roundtrip() {
        for action in [
            GameAction::Move(Direction::Up),
            GameAction::Move(Direction::Down),
            GameAction::Move(Direction::Left),
            GameAction::Move(Direction::Right),
            GameAction::SelectNext,
            GameAction::Continue,
            GameAction::Advance,
            GameAction::Restart,
            GameAction::ResetLevel,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(GameAction::from_str("select"), None);
    }
}
