//! Single-threaded UCT search with proven-state propagation.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use make7_core::{legal_moves_into, Make7Result, Move, Position, SearchLimits, AREA, MAX_MOVES};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::tree::{NodeIdx, Proven, Tree, ROOT};
use crate::{BranchStats, MctsConfig, MctsResult};

/// Reward for a drop that completes a seven leaving the game at `ply`.
/// Earlier wins are worth more.
pub fn win_reward(ply: usize) -> i64 {
    ((AREA + 2).saturating_sub(ply) / 2) as i64
}

/// Plays uniformly random drops until the game ends.
///
/// Returns +1 if the side to move at the start completes the seven, -1 if
/// the opponent does, 0 for a draw. Every drop fills a cell, so this ends.
pub fn simulate<R: Rng>(pos: &mut Position, rng: &mut R, buf: &mut Vec<Move>) -> i64 {
    let starter = pos.side_to_move();
    loop {
        legal_moves_into(pos, buf);
        if buf.is_empty() {
            return 0;
        }
        let mv = buf[rng.gen_range(0..buf.len())];
        let mover = pos.side_to_move();
        pos.drop(mv);
        if pos.is_winning_sum() {
            return if mover == starter { 1 } else { -1 };
        }
    }
}

/// Seeded generator for worker `id`, or an entropy-seeded one.
pub fn make_rng(seed: Option<u64>, id: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id)),
        None => StdRng::from_entropy(),
    }
}

/// One search tree over one root position.
pub struct Mcts {
    root: Position,
    tree: Tree,
    rng: StdRng,
    exploration: f64,
    iterations: u64,
    buffer: Vec<Move>,
}

impl Mcts {
    pub fn new(root: &Position, config: &MctsConfig) -> Self {
        Self::with_rng(root, config, make_rng(config.seed, 0))
    }

    pub fn with_rng(root: &Position, config: &MctsConfig, rng: StdRng) -> Self {
        Self {
            root: *root,
            tree: Tree::new(config.max_nodes),
            rng,
            exploration: config.exploration,
            iterations: 0,
            buffer: Vec::with_capacity(MAX_MOVES),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn is_proven(&self) -> bool {
        self.tree.root().proven.is_solved()
    }

    /// Settles `idx` if `pos` (the position at that node) is over.
    ///
    /// Returns the reward for the player who moved into the node.
    fn resolve_terminal(&mut self, idx: NodeIdx, pos: &Position) -> Option<i64> {
        if pos.is_winning_sum() {
            self.tree.set_proven(idx, Proven::Loss);
            return Some(win_reward(pos.ply()));
        }
        if pos.is_draw() {
            self.tree.set_proven(idx, Proven::Draw);
            return Some(0);
        }
        None
    }

    /// One round of selection, expansion, simulation and backpropagation.
    ///
    /// # Errors
    /// `NodeAllocation` if the tree cannot grow. The tree stays usable.
    pub fn iterate(&mut self) -> Make7Result<()> {
        let mut pos = self.root;
        let leaf = self.tree.select(&mut pos, self.exploration);

        let (node, reward) = if let Some(reward) = self.resolve_terminal(leaf, &pos) {
            (leaf, reward)
        } else {
            if !self.tree.node(leaf).is_expanded() {
                legal_moves_into(&pos, &mut self.buffer);
                self.tree.expand(leaf, &self.buffer)?;
            }
            let Some(pick) = self.tree.unvisited_children(leaf).choose(&mut self.rng) else {
                // nothing eligible below: all children are settled
                self.tree.refresh_proven(leaf);
                self.iterations += 1;
                return Ok(());
            };
            if let Some(mv) = self.tree.node(pick).mv {
                pos.drop(mv);
            }
            match self.resolve_terminal(pick, &pos) {
                Some(reward) => (pick, reward),
                None => (pick, -simulate(&mut pos, &mut self.rng, &mut self.buffer)),
            }
        };

        self.tree.backpropagate(node, reward);
        self.tree.refresh_proven(node);
        self.iterations += 1;
        Ok(())
    }

    /// Iterates until the budget, the time limit or the cancel token stops
    /// it, the root is proven, or the tree cannot grow.
    ///
    /// `on_progress` sees a snapshot every `report_interval`.
    pub fn run<F>(
        &mut self,
        limits: &SearchLimits,
        budget: Option<u64>,
        report_interval: Duration,
        mut on_progress: F,
    ) -> MctsResult
    where
        F: FnMut(&MctsResult),
    {
        let tc = &limits.time_control;
        let mut last_report = Instant::now();

        loop {
            if self.is_proven() {
                debug!("root proven {:?} after {} iterations", self.tree.root().proven, self.iterations);
                break;
            }
            if budget.is_some_and(|b| self.iterations >= b) {
                break;
            }
            if tc.is_stopped() || (tc.should_check_time(self.iterations) && tc.check_time()) {
                break;
            }
            if let Err(e) = self.iterate() {
                warn!("{e}; stopping with the tree built so far");
                break;
            }
            if last_report.elapsed() >= report_interval {
                on_progress(&self.result());
                last_report = Instant::now();
            }
        }

        let result = self.result();
        info!(
            "mcts: {} iterations, {} nodes, best {}",
            self.iterations,
            self.tree.len(),
            result.best_move.map(|m| m.to_string()).unwrap_or_else(|| "none".into())
        );
        result
    }

    /// Statistics of the root's children and the move they favour.
    pub fn result(&self) -> MctsResult {
        let branches = self.tree.children(ROOT).iter().filter_map(BranchStats::from_node).collect();
        MctsResult::from_branches(branches, self.tree.root().proven, self.iterations)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
