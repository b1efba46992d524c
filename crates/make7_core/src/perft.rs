use crate::{movegen::legal_moves_into, position::Position, types::Move};

/// Pure perft node count.
/// Counts all positions reachable in exactly `depth` drops. A drop that
/// ends the game is counted as a leaf and not expanded further.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        if depth == 0 || pos.is_game_over() {
            return 1;
        }

        let Some((buf, rest)) = layers.split_first_mut() else {
            return 1;
        };
        legal_moves_into(pos, buf);

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            pos.drop(mv);
            nodes += inner(pos, depth - 1, rest);
            pos.undo();
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(crate::movegen::MAX_MOVES); depth as usize];
    inner(pos, depth, &mut layers[..])
}
