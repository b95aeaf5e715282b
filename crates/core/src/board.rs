//! Board module - the 4x4 grid and its tile collection
//!
//! Cells hold tile ids; the tiles themselves live in a flat collection owned by
//! the board. The board keeps the two views in sync: a tile id appears in
//! exactly one cell and exactly once in the collection, and a cell is empty
//! iff no tile claims it.
//!
//! Precondition violations (placing onto an occupied cell, removing an unknown
//! tile) are programmer errors. They trip a `debug_assert!` and are otherwise
//! rejected with a `false`/`None` return, leaving the board unchanged.

use arrayvec::ArrayVec;

use crate::tile::Tile;
use crate::types::{Pos, TileId, CELL_COUNT, GRID_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Row-major cells (`row * GRID_SIZE + col`).
    cells: [Option<TileId>; CELL_COUNT],
    tiles: Vec<Tile>,
    next_id: TileId,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            tiles: Vec::with_capacity(CELL_COUNT),
            next_id: 1,
        }
    }

    /// Build a board from a value grid (`0` = empty). Tiles are plain (not special).
    pub fn from_values(values: [[u32; GRID_SIZE as usize]; GRID_SIZE as usize]) -> Self {
        let mut board = Self::new();
        for pos in Pos::all() {
            let v = values[pos.row() as usize][pos.col() as usize];
            if v != 0 {
                board.spawn(v, pos, false);
            }
        }
        board
    }

    /// Create a tile with a fresh id and place it. `None` if the cell is taken.
    pub fn spawn(&mut self, value: u32, pos: Pos, special: bool) -> Option<TileId> {
        if !self.is_empty(pos) {
            return None;
        }
        let id = self.next_id;
        if !self.place(Tile::new(id, value, pos, special), pos) {
            return None;
        }
        self.next_id = self.next_id.wrapping_add(1);
        Some(id)
    }

    /// Put `tile` on an empty cell, updating the tile's position.
    pub fn place(&mut self, mut tile: Tile, pos: Pos) -> bool {
        debug_assert!(self.is_empty(pos), "place onto occupied cell {:?}", pos);
        debug_assert!(self.index_of(tile.id()).is_none(), "tile {} already placed", tile.id());
        if !self.is_empty(pos) || self.index_of(tile.id()).is_some() {
            return false;
        }
        if tile.pos() != pos {
            tile.slide_to(pos);
        }
        self.cells[pos.index()] = Some(tile.id());
        self.tiles.push(tile);
        true
    }

    /// Take a tile off the board, returning it.
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let idx = self.index_of(id);
        debug_assert!(idx.is_some(), "remove of unknown tile {}", id);
        let tile = self.tiles.remove(idx?);
        self.cells[tile.pos().index()] = None;
        Some(tile)
    }

    /// Move a tile to an empty cell (start of a slide animation).
    pub fn relocate(&mut self, id: TileId, to: Pos) -> bool {
        debug_assert!(self.is_empty(to), "relocate onto occupied cell {:?}", to);
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if !self.is_empty(to) {
            return false;
        }
        let from = self.tiles[idx].pos();
        self.cells[from.index()] = None;
        self.cells[to.index()] = Some(id);
        self.tiles[idx].slide_to(to);
        true
    }

    /// Tile id at `pos`.
    pub fn id_at(&self, pos: Pos) -> Option<TileId> {
        self.cells[pos.index()]
    }

    /// Tile at `pos`.
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.id_at(pos).and_then(|id| self.tile(id))
    }

    /// Tile at a row-major cell index.
    pub fn tile_at_index(&self, index: usize) -> Option<&Tile> {
        Pos::from_index(index).and_then(|p| self.get(p))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.index_of(id).map(|i| &self.tiles[i])
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.index_of(id).map(move |i| &mut self.tiles[i])
    }

    /// All tiles, in insertion order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cells[pos.index()].is_none()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Every empty cell in row-major order.
    pub fn empty_cells(&self) -> ArrayVec<Pos, CELL_COUNT> {
        Pos::all().filter(|&p| self.is_empty(p)).collect()
    }

    /// Empty cells of one row, left to right.
    pub fn empty_cells_in_row(&self, row: u8) -> ArrayVec<Pos, { GRID_SIZE as usize }> {
        (0..GRID_SIZE)
            .filter_map(|col| Pos::new(row, col))
            .filter(|&p| self.is_empty(p))
            .collect()
    }

    /// Highest tile value, `None` on an empty board.
    pub fn max_value(&self) -> Option<u32> {
        self.tiles.iter().map(Tile::value).max()
    }

    /// True if two orthogonally adjacent tiles share a value.
    pub fn has_adjacent_pair(&self) -> bool {
        self.tiles.iter().any(|t| {
            t.pos()
                .neighbors()
                .filter_map(|n| self.get(n))
                .any(|n| n.value() == t.value())
        })
    }

    /// Cell values (`0` = empty), row-major.
    pub fn value_grid(&self) -> [[u32; GRID_SIZE as usize]; GRID_SIZE as usize] {
        let mut out = [[0u32; GRID_SIZE as usize]; GRID_SIZE as usize];
        for t in &self.tiles {
            out[t.pos().row() as usize][t.pos().col() as usize] = t.value();
        }
        out
    }

    /// Check the cell/collection invariant.
    pub fn is_consistent(&self) -> bool {
        let mut claimed = 0usize;
        for t in &self.tiles {
            if self.cells[t.pos().index()] != Some(t.id()) {
                return false;
            }
            if self.tiles.iter().filter(|o| o.id() == t.id()).count() != 1 {
                return false;
            }
            claimed += 1;
        }
        claimed == CELL_COUNT - self.count_empty()
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.cells = [None; CELL_COUNT];
        self.tiles.clear();
    }

    fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id() == id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
