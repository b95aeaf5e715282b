//! Board tests through the public facade

use tile_merger::core::{Board, Tile};
use tile_merger::types::{Direction, Pos, CELL_COUNT, GRID_SIZE};

fn pos(row: u8, col: u8) -> Pos {
    Pos::new(row, col).unwrap()
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.tile_count(), 0);
    assert_eq!(board.count_empty(), CELL_COUNT);
    assert!(!board.is_full());
    for p in Pos::all() {
        assert!(board.is_empty(p));
        assert!(board.get(p).is_none());
    }
    assert!(board.is_consistent());
}

#[test]
fn test_pos_bounds_and_steps() {
    assert!(Pos::new(GRID_SIZE, 0).is_none());
    assert!(Pos::new(0, GRID_SIZE).is_none());

    let corner = pos(0, 0);
    assert_eq!(corner.step(Direction::Up), None);
    assert_eq!(corner.step(Direction::Left), None);
    assert_eq!(corner.step(Direction::Right), Some(pos(0, 1)));
    assert_eq!(corner.step(Direction::Down), Some(pos(1, 0)));
    assert_eq!(pos(3, 3).step(Direction::Down), None);
    assert_eq!(pos(3, 3).step(Direction::Right), None);
}

#[test]
fn test_spawn_onto_occupied_cell_is_rejected() {
    let mut board = Board::new();
    assert!(board.spawn(2, pos(1, 1), false).is_some());
    assert!(board.spawn(4, pos(1, 1), false).is_none());
    assert_eq!(board.tile_count(), 1);
    assert_eq!(board.get(pos(1, 1)).unwrap().value(), 2);
}

#[test]
fn test_place_and_remove_round_trip_keeps_identity() {
    let mut board = Board::new();
    let id = board.spawn(16, pos(2, 2), true).unwrap();
    let tile = board.remove(id).unwrap();
    assert!(tile.is_special());

    assert!(board.place(tile, pos(0, 3)));
    let placed = board.get(pos(0, 3)).unwrap();
    assert_eq!(placed.id(), id);
    assert_eq!(placed.value(), 16);
    assert_eq!(placed.pos(), pos(0, 3));
    assert!(board.is_consistent());
}

#[test]
fn test_place_new_tile() {
    let mut board = Board::new();
    assert!(board.place(Tile::new(99, 8, pos(3, 0), false), pos(3, 0)));
    assert_eq!(board.id_at(pos(3, 0)), Some(99));
    assert!(!board.get(pos(3, 0)).unwrap().is_moving());
}

#[test]
fn test_relocate_frees_source_cell() {
    let mut board = Board::from_values([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let a = board.id_at(pos(0, 0)).unwrap();
    assert!(board.relocate(a, pos(1, 0)));
    assert!(board.is_empty(pos(0, 0)));
    assert_eq!(board.get(pos(1, 0)).unwrap().value(), 2);
    assert_eq!(board.get(pos(0, 1)).unwrap().value(), 4);
    assert!(board.is_consistent());
}

#[test]
fn test_full_board_queries() {
    let board = Board::from_values([[2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
    assert!(board.is_full());
    assert_eq!(board.count_empty(), 0);
    assert!(board.empty_cells().is_empty());
    assert!(board.empty_cells_in_row(0).is_empty());
    assert_eq!(board.max_value(), Some(128));
    assert!(!board.has_adjacent_pair());
}

#[test]
fn test_tile_count_matches_occupied_cells() {
    let board = Board::from_values([[2, 0, 2, 0], [0, 4, 0, 4], [8, 0, 0, 0], [0, 0, 0, 16]]);
    let occupied = Pos::all().filter(|&p| !board.is_empty(p)).count();
    assert_eq!(board.tile_count(), occupied);
    assert_eq!(board.tiles().len(), 6);
    assert!(board.is_consistent());
}
