use crate::{bitboard::Bitboard, position::Position, types::*};

/// Columns from the centre outwards: D, C, E, B, F, A, G.
pub const COLUMN_ORDER: [u8; COLUMNS] = [3, 2, 4, 1, 5, 0, 6];

/// Most moves ever legal at once: three tiles in each of seven columns.
pub const MAX_MOVES: usize = COLUMNS * 3;

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(MAX_MOVES);
    legal_moves_into(pos, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
/// Order is column A to G, and 1, 2, 3 within a column.
pub fn legal_moves_into(pos: &Position, out: &mut Vec<Move>) {
    out.clear();
    push_moves(pos, 0..COLUMNS as u8, &Tile::ALL, out);
}

/// Legal moves in search order: 3s before 2s before 1s, each tile tried
/// from the centre column outwards.
pub fn ordered_moves_into(pos: &Position, out: &mut Vec<Move>) {
    out.clear();
    for tile in Tile::DESCENDING {
        push_moves(pos, COLUMN_ORDER.iter().copied(), &[tile], out);
    }
}

fn push_moves(pos: &Position, columns: impl Iterator<Item = u8>, tiles: &[Tile], out: &mut Vec<Move>) {
    let me = pos.side_to_move();
    let open = pos.open_cells();
    for column in columns {
        let target = pos.landing_cell(column);
        if !open.contains(target) {
            continue;
        }
        for &tile in tiles {
            if pos.remaining(me, tile) == 0 {
                continue;
            }
            if tile == Tile::Three && !Bitboard::THREES.contains(target) {
                continue;
            }
            out.push(Move::new(tile, column));
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
