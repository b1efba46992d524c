//! Monte Carlo Tree Search Make 7 Engine
//!
//! UCT search with random playouts:
//! - Arena tree with contiguous child ranges
//! - Proven-state propagation, so forced results settle exactly
//! - Root parallelism: private trees merged into one shared root

mod parallel;
mod search;
mod tree;

use std::time::Duration;

use log::warn;
use make7_core::{legal_moves, Engine, Make7Error, Move, Position, SearchLimits, SearchResult};
use serde::{Deserialize, Serialize};

pub use parallel::{search_parallel, worker_count};
pub use search::{make_rng, simulate, win_reward, Mcts};
pub use tree::{Node, NodeIdx, Proven, Tree, ROOT};

/// MCTS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCT exploration constant
    pub exploration: f64,
    /// Iteration budget when the search limits set none (0 = unlimited)
    pub iterations: u64,
    /// Worker threads (0 = one per core, 1 = single tree)
    pub threads: usize,
    /// Node cap per tree
    pub max_nodes: usize,
    /// Fixed RNG seed; worker `i` uses `seed + i`
    pub seed: Option<u64>,
    /// How often progress is reported
    pub report_interval: Duration,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: std::f64::consts::SQRT_2,
            iterations: 200_000,
            threads: 1,
            max_nodes: 1 << 23,
            seed: None,
            report_interval: Duration::from_secs(1),
        }
    }
}

impl MctsConfig {
    /// Iteration budget, preferring the one in `limits`.
    pub fn budget(&self, limits: &SearchLimits) -> Option<u64> {
        limits.iterations.or((self.iterations > 0).then_some(self.iterations))
    }
}

/// Statistics of one root move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchStats {
    pub mv: Move,
    pub visits: u64,
    pub points: i64,
    /// State of the child, for the opponent who moves there.
    pub proven: Proven,
}

impl BranchStats {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            visits: 0,
            points: 0,
            proven: Proven::Unsolved,
        }
    }

    pub fn from_node(node: &Node) -> Option<Self> {
        Some(Self {
            mv: node.mv?,
            visits: node.visits,
            points: node.points,
            proven: node.proven,
        })
    }

    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.points as f64 / self.visits as f64
        }
    }
}

/// Picks the branch to play: a child lost for the opponent, else an
/// unsolved one, else a draw, and a lost cause only as a last resort.
/// Equal ranks go to the most visited; the earliest wins exact ties.
pub fn best_branch(branches: &[BranchStats]) -> Option<&BranchStats> {
    let mut best: Option<&BranchStats> = None;
    for b in branches {
        let key = (b.proven.preference(), b.visits);
        if best.is_none_or(|cur| key > (cur.proven.preference(), cur.visits)) {
            best = Some(b);
        }
    }
    best
}

/// What a search found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MctsResult {
    pub best_move: Option<Move>,
    /// Mean reward of the best move, for the side to move
    pub mean_reward: f64,
    /// Visits over all root moves
    pub visits: u64,
    /// State of the root for the side to move
    pub proven: Proven,
    pub iterations: u64,
    pub branches: Vec<BranchStats>,
}

impl MctsResult {
    pub fn from_branches(branches: Vec<BranchStats>, proven: Proven, iterations: u64) -> Self {
        let best = best_branch(&branches).copied();
        Self {
            best_move: best.map(|b| b.mv),
            mean_reward: best.map(|b| b.mean_reward()).unwrap_or(0.0),
            visits: branches.iter().fold(0u64, |acc, b| acc.saturating_add(b.visits)),
            proven,
            iterations,
            branches,
        }
    }

    pub fn branch(&self, mv: Move) -> Option<&BranchStats> {
        self.branches.iter().find(|b| b.mv == mv)
    }
}

/// Make 7 engine that plays the most promising MCTS move.
#[derive(Debug, Clone, Default)]
pub struct MctsEngine {
    config: MctsConfig,
    iterations: u64,
}

impl MctsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MctsConfig) -> Self {
        Self { config, iterations: 0 }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Runs one search, on worker threads if configured.
    ///
    /// Falls back to a single tree when threads cannot be started.
    pub fn analyze<F>(&mut self, pos: &Position, limits: &SearchLimits, mut on_progress: F) -> MctsResult
    where
        F: FnMut(&MctsResult),
    {
        limits.start();
        if worker_count(self.config.threads) > 1 {
            match search_parallel(pos, &self.config, limits, &mut on_progress) {
                Ok(result) => {
                    self.iterations = result.iterations;
                    return result;
                }
                Err(e @ Make7Error::InsufficientResources(_)) => warn!("{e}; searching on one thread"),
                Err(e) => warn!("{e}"),
            }
        }

        let mut mcts = Mcts::new(pos, &self.config);
        let result = mcts.run(limits, self.config.budget(limits), self.config.report_interval, on_progress);
        self.iterations = result.iterations;
        result
    }
}

impl Engine for MctsEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        self.iterations = 0;
        if pos.is_game_over() || pos.has_no_legal_moves() {
            return SearchResult::empty();
        }

        let result = self.analyze(pos, &limits, |_| {});
        // stopped before the first iteration
        let best_move = result.best_move.or_else(|| legal_moves(pos).first().copied());
        SearchResult {
            best_move,
            result: result.proven.to_result(),
            mean_reward: Some(result.mean_reward),
            nodes: self.iterations,
            stopped: limits.should_stop(),
        }
    }

    fn name(&self) -> &str {
        "MCTS v1.0"
    }

    fn new_game(&mut self) {
        self.iterations = 0;
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "exploration" => value.parse().map(|v| self.config.exploration = v).is_ok(),
            "iterations" => value.parse().map(|v| self.config.iterations = v).is_ok(),
            "threads" => value.parse().map(|v| self.config.threads = v).is_ok(),
            "max_nodes" => value.parse().map(|v| self.config.max_nodes = v).is_ok(),
            "seed" => value.parse().map(|v| self.config.seed = Some(v)).is_ok(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod lib_tests;
