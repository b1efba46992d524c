//! Exact Make 7 Engine
//!
//! Proves the game-theoretic value of every move:
//! - Negamax search with alpha-beta pruning and iterative deepening
//! - Prime-sized, replace-always transposition table
//! - Root-parallel sweep with one private table per worker thread

mod parallel;
mod search;
mod tt;

use log::warn;
use make7_core::{Engine, GameResult, Make7Error, MoveTable, Position, SearchLimits, SearchResult};
use serde::{Deserialize, Serialize};

pub use parallel::{solve_moves_parallel, worker_count, SweepReport};
pub use search::{Solver, DRAW, LOSS, WIN};
pub use tt::{prev_prime, Bound, TranspositionTable, TtEntry};

/// Exact solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Transposition table entries in total (split between workers)
    pub table_entries: usize,
    /// Worker threads for the root sweep (0 = one per core)
    pub threads: usize,
    /// Solve root moves on worker threads
    pub parallel: bool,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            table_entries: 1 << 22,
            threads: 0,
            parallel: true,
        }
    }
}

/// Make 7 engine that plays proven-best moves.
#[derive(Debug, Default)]
pub struct ExactEngine {
    config: ExactConfig,
    /// Reused between serial searches; dropped on a new game
    solver: Option<Solver>,
    /// Node counter for statistics
    nodes: u64,
}

impl ExactEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExactConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ExactConfig {
        &self.config
    }

    /// Evaluates every legal move of `pos`, in parallel if configured.
    ///
    /// Falls back to the serial sweep when worker threads cannot be started.
    pub fn evaluate_moves(&mut self, pos: &Position, limits: &SearchLimits) -> MoveTable {
        let tc = &limits.time_control;
        if self.config.parallel && worker_count(self.config.threads, usize::MAX) > 1 {
            match solve_moves_parallel(pos, &self.config, tc, |_, _| {}) {
                Ok(report) => {
                    self.nodes = report.nodes;
                    return report.results;
                }
                Err(e @ Make7Error::InsufficientResources(_)) => {
                    warn!("{e}; solving serially");
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }

        let entries = self.config.table_entries;
        let solver = self.solver.get_or_insert_with(|| Solver::with_entries(entries));
        solver.reset_nodes();
        let results = solver.solve_moves(pos, tc);
        self.nodes = solver.nodes();
        results
    }
}

impl Engine for ExactEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        limits.start();
        self.nodes = 0;
        if pos.is_game_over() {
            return SearchResult::empty();
        }

        let results = self.evaluate_moves(pos, &limits);
        let best_move = results
            .best_moves()
            .first()
            .copied()
            .or_else(|| make7_core::legal_moves(pos).first().copied());

        SearchResult {
            best_move,
            result: results.best_result(),
            mean_reward: None,
            nodes: self.nodes,
            stopped: limits.should_stop(),
        }
    }

    fn name(&self) -> &str {
        "Exact v1.0"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
        if let Some(solver) = self.solver.as_mut() {
            solver.clear_table();
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "hash" | "table_entries" => match value.parse() {
                Ok(entries) => {
                    self.config.table_entries = entries;
                    self.solver = None;
                    true
                }
                Err(_) => false,
            },
            "threads" => match value.parse() {
                Ok(threads) => {
                    self.config.threads = threads;
                    true
                }
                Err(_) => false,
            },
            "parallel" => match value.parse() {
                Ok(parallel) => {
                    self.config.parallel = parallel;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

/// Solved value of `pos` alone, without per-move detail.
pub fn solve(pos: &Position, table_entries: usize, limits: &SearchLimits) -> (GameResult, u64) {
    limits.start();
    let mut solver = Solver::with_entries(table_entries);
    let result = solver.solve(pos, &limits.time_control);
    (result, solver.nodes())
}
