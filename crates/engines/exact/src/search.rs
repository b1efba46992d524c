//! Negamax search with alpha-beta pruning and iterative deepening

use log::{debug, info};
use make7_core::{
    legal_moves, ordered_moves_into, GameResult, Move, MoveTable, Position, TimeControl, AREA,
    MAX_MOVES,
};

use crate::tt::{Bound, TranspositionTable, TtEntry};

/// Score of a position the side to move can force a win from.
pub const WIN: i32 = 1;
pub const DRAW: i32 = 0;
pub const LOSS: i32 = -1;

/// Search context: one transposition table and the counters of one thread.
#[derive(Debug)]
pub struct Solver {
    table: TranspositionTable,
    nodes: u64,
    /// One move buffer per ply, reused across calls.
    buffers: Vec<Vec<Move>>,
}

impl Solver {
    pub fn new(table: TranspositionTable) -> Self {
        Self {
            table,
            nodes: 0,
            buffers: vec![Vec::with_capacity(MAX_MOVES); AREA + 1],
        }
    }

    /// Solver with a table of roughly `entries` slots.
    pub fn with_entries(entries: usize) -> Self {
        Self::new(TranspositionTable::with_fallback(entries))
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn reset_nodes(&mut self) {
        self.nodes = 0;
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn clear_table(&mut self) {
        self.table.clear();
    }

    /// Depth-limited negamax value of `pos` for the side to move.
    ///
    /// `depth` counts the replies searched after the mover's own drop:
    /// depth 0 only asks whether the mover wins on the spot. A position
    /// with no decisive result inside the horizon scores `DRAW`.
    ///
    /// # Arguments
    /// * `pos` - Position to search, restored before returning
    /// * `depth` - Remaining depth
    /// * `alpha`, `beta` - Search window, within `LOSS..=WIN`
    pub fn search(&mut self, pos: &mut Position, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        let fp = pos.fingerprint();
        if let Some(entry) = self.table.load(fp) {
            if usable(entry, depth) {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        let ply = pos.ply();
        let mut moves = std::mem::take(&mut self.buffers[ply]);
        ordered_moves_into(pos, &mut moves);

        let score = self.search_moves(pos, &moves, depth, alpha, beta);
        self.buffers[ply] = moves;
        score
    }

    fn search_moves(&mut self, pos: &mut Position, moves: &[Move], depth: u8, mut alpha: i32, beta: i32) -> i32 {
        // A seven on the spot beats anything deeper.
        for &mv in moves {
            pos.drop(mv);
            let wins = pos.is_winning_sum();
            pos.undo();
            if wins {
                return WIN;
            }
        }

        if depth == 0 || moves.is_empty() {
            return DRAW;
        }

        let fp = pos.fingerprint();
        let alpha_in = alpha;
        for &mv in moves {
            pos.drop(mv);
            let score = -self.search(pos, depth - 1, -beta, -alpha);
            pos.undo();

            if score > alpha {
                alpha = score;
                if alpha >= beta {
                    self.table.store(fp, TtEntry::new(alpha, Bound::Lower, depth));
                    return alpha;
                }
                self.table.store(fp, TtEntry::new(alpha, Bound::Lower, depth));
            }
        }

        let bound = if alpha > alpha_in { Bound::Exact } else { Bound::Upper };
        self.table.store(fp, TtEntry::new(alpha, bound, depth));
        alpha
    }

    /// Iterative deepening to the shallowest forced result.
    ///
    /// Returns `{Win|Loss, depth}` for the first depth that proves a
    /// result, `Draw` if none does, and `Unknown` if stopped first. The
    /// stop flag is polled between deepening passes.
    pub fn solve(&mut self, pos: &Position, tc: &TimeControl) -> GameResult {
        self.deepen(pos, || tc.check_time())
    }

    /// Like [`Solver::solve`], but runs every pass to the end. Root moves
    /// of a sweep are solved this way, so a started move always finishes.
    pub fn solve_to_end(&mut self, pos: &Position) -> GameResult {
        self.deepen(pos, || false)
    }

    fn deepen(&mut self, pos: &Position, mut stopped: impl FnMut() -> bool) -> GameResult {
        if pos.is_winning_sum() {
            // the previous mover already completed a seven
            return GameResult::loss(0);
        }
        if pos.is_draw() {
            return GameResult::DRAW;
        }

        let mut work = *pos;
        let max_depth = (AREA - pos.ply()) as u8;
        for depth in 0..max_depth {
            if stopped() {
                return GameResult::UNKNOWN;
            }
            let score = self.search(&mut work, depth, LOSS, WIN);
            debug!("depth {depth}: score {score}, {} nodes", self.nodes);
            if score >= WIN {
                return GameResult::win(depth);
            }
            if score <= LOSS {
                return GameResult::loss(depth);
            }
        }
        GameResult::DRAW
    }

    /// Solves every legal move of `pos` independently.
    ///
    /// The table is cleared before each move. Drops that complete a seven
    /// are recorded as `{Win, 0}` without searching. On a mirror-symmetric
    /// grid only columns A to D are solved and the rest are mirrored.
    ///
    /// `tc` is read only before a move is started; moves left unstarted
    /// stay `Unknown`.
    pub fn solve_moves(&mut self, pos: &Position, tc: &TimeControl) -> MoveTable {
        let mut results = MoveTable::new();
        let symmetric = pos.is_symmetric();
        let mut work = *pos;

        for mv in legal_moves(pos) {
            if symmetric && mv.column > 3 {
                continue;
            }
            if tc.check_time() {
                break;
            }
            work.drop(mv);
            let result = if work.is_winning_sum() {
                GameResult::win(0)
            } else {
                self.table.clear();
                self.solve_to_end(&work).parent_view()
            };
            work.undo();

            debug!("{mv}: {result}");
            results.set(mv, result);
        }

        if symmetric {
            results.mirror_known();
        }
        info!("solved moves: best {}, {} nodes", results.best_result(), self.nodes);
        results
    }
}

/// Whether an entry computed at `entry.depth` answers a probe at `depth`.
///
/// Same depth always does. A proven win (lower bound WIN) or proven loss
/// (upper bound LOSS) found with less depth also holds deeper; a
/// horizon-limited draw does not.
#[inline]
fn usable(entry: TtEntry, depth: u8) -> bool {
    if entry.depth == depth {
        return true;
    }
    if entry.depth > depth {
        return false;
    }
    match entry.bound {
        Bound::Exact => entry.score != DRAW,
        Bound::Lower => entry.score >= WIN,
        Bound::Upper => entry.score <= LOSS,
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
