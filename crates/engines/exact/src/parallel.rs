//! Root-parallel exact solving.
//!
//! Every root move is an independent job. Workers own a position copy and
//! a private transposition table, so nothing inside the recursive search is
//! shared. The coordinator (the calling thread) blocks on a completion
//! channel, records each result, streams it to the caller and hands the
//! worker the next unsolved move. Once the stop flag is raised no new
//! moves are handed out; running jobs finish their current move.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use make7_core::{legal_moves, GameResult, Make7Result, Move, MoveTable, Position, TimeControl};

use crate::search::Solver;
use crate::ExactConfig;

/// Outcome of a parallel sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub results: MoveTable,
    /// Nodes searched by all workers together.
    pub nodes: u64,
    /// True if the stop flag left some moves unsolved.
    pub stopped: bool,
    pub threads: usize,
}

/// Number of worker threads to use for `jobs` root moves.
pub fn worker_count(configured: usize, jobs: usize) -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let wanted = if configured == 0 { cores } else { configured.min(cores) };
    wanted.min(jobs)
}

/// Solves every legal root move of `pos` on a pool of worker threads.
///
/// `on_result` sees each move's result as soon as it is known, in
/// completion order. Immediate sevens are reported first without a thread.
///
/// # Errors
/// `InsufficientResources` if a worker thread cannot be started. Workers
/// already running are released before returning.
pub fn solve_moves_parallel<F>(
    pos: &Position,
    config: &ExactConfig,
    tc: &TimeControl,
    mut on_result: F,
) -> Make7Result<SweepReport>
where
    F: FnMut(Move, GameResult),
{
    let mut results = MoveTable::new();
    let symmetric = pos.is_symmetric();
    let mut pending = VecDeque::new();

    let mut probe = *pos;
    for mv in legal_moves(pos) {
        if symmetric && mv.column > 3 {
            continue;
        }
        probe.drop(mv);
        let wins = probe.is_winning_sum();
        probe.undo();
        if wins {
            results.set(mv, GameResult::win(0));
            on_result(mv, GameResult::win(0));
        } else {
            pending.push_back(mv);
        }
    }

    let threads = worker_count(config.threads, pending.len());
    let nodes = AtomicU64::new(0);

    if threads > 0 {
        let per_worker = config.table_entries / threads;
        info!("solving {} root moves on {threads} threads, {per_worker} table entries each", pending.len());

        thread::scope(|s| -> Make7Result<()> {
            let (done_tx, done_rx) = mpsc::channel::<(usize, Move, GameResult)>();
            let mut jobs = Vec::with_capacity(threads);

            for id in 0..threads {
                let (job_tx, job_rx) = mpsc::channel::<Move>();
                let done_tx = done_tx.clone();
                let nodes = &nodes;
                let root = *pos;
                thread::Builder::new()
                    .name(format!("make7-solve-{id}"))
                    .spawn_scoped(s, move || {
                        let mut solver = Solver::with_entries(per_worker);
                        for mv in job_rx {
                            let mut child = root;
                            child.drop(mv);
                            solver.clear_table();
                            solver.reset_nodes();
                            let result = solver.solve_to_end(&child).parent_view();
                            nodes.fetch_add(solver.nodes(), Ordering::Relaxed);
                            if done_tx.send((id, mv, result)).is_err() {
                                break;
                            }
                        }
                    })?;
                jobs.push(job_tx);
            }
            drop(done_tx);

            let mut in_flight = 0usize;
            for job in &jobs {
                if tc.check_time() {
                    break;
                }
                if let Some(mv) = pending.pop_front() {
                    if job.send(mv).is_ok() {
                        in_flight += 1;
                    }
                }
            }

            while in_flight > 0 {
                let Ok((id, mv, result)) = done_rx.recv() else {
                    warn!("solver workers exited with {in_flight} moves outstanding");
                    break;
                };
                in_flight -= 1;
                debug!("worker {id}: {mv} {result}");
                results.set(mv, result);
                on_result(mv, result);

                if tc.check_time() {
                    continue;
                }
                if let Some(next) = pending.pop_front() {
                    match jobs[id].send(next) {
                        Ok(()) => in_flight += 1,
                        Err(_) => warn!("worker {id} is gone; {next} left unsolved"),
                    }
                }
            }
            // dropping the job senders lets every worker loop end
            Ok(())
        })?;
    }

    if symmetric {
        results.mirror_known();
    }
    let stopped = results.iter().any(|(mv, r)| !r.is_known() && probe.can_drop(mv));
    Ok(SweepReport {
        results,
        nodes: nodes.into_inner(),
        stopped,
        threads,
    })
}

#[cfg(test)]
#[path = "parallel_tests.rs"]
mod parallel_tests;
