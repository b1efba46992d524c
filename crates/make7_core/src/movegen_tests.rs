use super::*;

#[test]
fn test_start_moves() {
    let pos = Position::new();
    let moves = legal_moves(&pos);
    // 1 and 2 in every column, no 3 cell is on the bottom row
    assert_eq!(moves.len(), 14);
    assert_eq!(moves[0], Move::new(Tile::One, 0));
    assert_eq!(moves[1], Move::new(Tile::Two, 0));
    assert!(moves.iter().all(|m| m.tile != Tile::Three));
}

#[test]
fn test_three_becomes_available() {
    let pos = Position::from_moves("1A1A").unwrap();
    let moves = legal_moves(&pos);
    assert!(moves.contains(&Move::new(Tile::Three, 0)));
    assert_eq!(moves.len(), 15);
}

#[test]
fn test_ordered_moves_centre_first() {
    let pos = Position::from_moves("1A1A").unwrap();
    let mut ordered = Vec::new();
    ordered_moves_into(&pos, &mut ordered);
    assert_eq!(ordered[0], Move::new(Tile::Three, 0));
    assert_eq!(ordered[1], Move::new(Tile::Two, 3));
    assert_eq!(ordered[2], Move::new(Tile::Two, 2));
    assert_eq!(ordered[3], Move::new(Tile::Two, 4));
    assert_eq!(ordered.last(), Some(&Move::new(Tile::One, 6)));

    let mut plain = legal_moves(&pos);
    plain.sort_by_key(|m| (m.tile, m.column));
    ordered.sort_by_key(|m| (m.tile, m.column));
    assert_eq!(plain, ordered);
}

#[test]
fn test_full_column_skipped() {
    let pos = Position::from_moves("1D1D1D1D1D1D1D").unwrap();
    let moves = legal_moves(&pos);
    assert!(moves.iter().all(|m| m.column != 3));
}

#[test]
fn test_every_generated_move_drops() {
    let mut pos = Position::from_moves("2D1C1D1E2C").unwrap();
    for mv in legal_moves(&pos) {
        assert!(pos.drop(mv), "{mv} should be legal");
        pos.undo();
    }
}
