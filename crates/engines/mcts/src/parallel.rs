//! Root-parallel MCTS.
//!
//! Each worker grows a private tree from its own copy of the root. After
//! every iteration it adds what changed at its root children since the
//! previous iteration into one shared table of root statistics. That
//! table, behind a mutex, is the only state the workers share besides two
//! atomics: the iteration count and the stop flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;

use log::{debug, info, warn};
use make7_core::{legal_moves, Make7Result, Position, SearchLimits};

use crate::search::{make_rng, Mcts};
use crate::tree::{Proven, ROOT};
use crate::{BranchStats, MctsConfig, MctsResult};

/// Number of worker threads for a configured count (0 = one per core).
pub fn worker_count(configured: usize) -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    if configured == 0 {
        cores
    } else {
        configured
    }
}

fn snapshot(global: &Mutex<Vec<BranchStats>>, iterations: u64) -> MctsResult {
    let branches = global.lock().unwrap_or_else(PoisonError::into_inner).clone();
    let proven = Proven::from_children(branches.iter().map(|b| b.proven));
    MctsResult::from_branches(branches, proven, iterations)
}

/// Searches `pos` on `config.threads` workers until a limit is hit or any
/// worker proves the root.
///
/// `on_progress` runs on the calling thread every `report_interval` with
/// the merged statistics so far.
///
/// # Errors
/// `InsufficientResources` if a worker thread cannot be started. Workers
/// already running are stopped first.
pub fn search_parallel<F>(
    pos: &Position,
    config: &MctsConfig,
    limits: &SearchLimits,
    mut on_progress: F,
) -> Make7Result<MctsResult>
where
    F: FnMut(&MctsResult),
{
    let moves = legal_moves(pos);
    if moves.is_empty() || pos.is_game_over() {
        return Ok(MctsResult::from_branches(Vec::new(), Proven::Unsolved, 0));
    }

    let tc = &limits.time_control;
    let budget = config.budget(limits);
    let threads = worker_count(config.threads);
    let global = Mutex::new(moves.iter().map(|&mv| BranchStats::new(mv)).collect::<Vec<_>>());
    let iterations = AtomicU64::new(0);
    let halt = AtomicBool::new(false);
    let root_moves = moves.len();
    info!("mcts on {threads} threads, {root_moves} root moves");

    thread::scope(|s| -> Make7Result<()> {
        let (done_tx, done_rx) = mpsc::channel::<usize>();

        for id in 0..threads {
            let done_tx = done_tx.clone();
            let (global, iterations, halt) = (&global, &iterations, &halt);
            let spawned = thread::Builder::new()
                .name(format!("make7-mcts-{id}"))
                .spawn_scoped(s, move || {
                    let mut mcts = Mcts::with_rng(pos, config, make_rng(config.seed, id as u64));
                    let mut seen = vec![(0u64, 0i64); root_moves];

                    loop {
                        if halt.load(Ordering::Relaxed) || tc.is_stopped() {
                            break;
                        }
                        if budget.is_some_and(|b| iterations.load(Ordering::Relaxed) >= b) {
                            break;
                        }
                        if tc.should_check_time(mcts.iterations()) && tc.check_time() {
                            break;
                        }
                        if let Err(e) = mcts.iterate() {
                            warn!("worker {id}: {e}; stopping all workers");
                            halt.store(true, Ordering::Relaxed);
                            break;
                        }

                        {
                            let mut shared = global.lock().unwrap_or_else(PoisonError::into_inner);
                            let children = mcts.tree().children(ROOT);
                            for ((slot, last), child) in shared.iter_mut().zip(seen.iter_mut()).zip(children) {
                                debug_assert_eq!(Some(slot.mv), child.mv);
                                slot.visits = slot.visits.saturating_add(child.visits.saturating_sub(last.0));
                                slot.points = slot.points.saturating_add(child.points.saturating_sub(last.1));
                                if child.proven.is_solved() {
                                    slot.proven = child.proven;
                                }
                                *last = (child.visits, child.points);
                            }
                        }

                        iterations.fetch_add(1, Ordering::Relaxed);
                        if mcts.is_proven() {
                            debug!("worker {id} proved the root");
                            halt.store(true, Ordering::Relaxed);
                        }
                    }
                    let _ = done_tx.send(id);
                });

            if let Err(e) = spawned {
                halt.store(true, Ordering::Relaxed);
                return Err(e.into());
            }
        }
        drop(done_tx);

        let mut running = threads;
        while running > 0 {
            match done_rx.recv_timeout(config.report_interval) {
                Ok(id) => {
                    debug!("mcts worker {id} finished");
                    running -= 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    tc.check_time();
                    on_progress(&snapshot(&global, iterations.load(Ordering::Relaxed)));
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(())
    })?;

    let result = snapshot(&global, iterations.into_inner());
    info!(
        "mcts: {} iterations, best {}",
        result.iterations,
        result.best_move.map(|m| m.to_string()).unwrap_or_else(|| "none".into())
    );
    Ok(result)
}

#[cfg(test)]
#[path = "parallel_tests.rs"]
mod parallel_tests;
