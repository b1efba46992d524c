//! Perft benchmark for profiling with cargo-flamegraph.
//!
//! Usage:
//!   cargo flamegraph --example perft_bench -p make7_core -- [depth] [moves]
//!
//! Examples:
//!   # Default: depth 5 from every test position
//!   cargo flamegraph --example perft_bench -p make7_core
//!
//!   # Custom depth
//!   cargo flamegraph --example perft_bench -p make7_core -- 6
//!
//!   # Custom depth and position
//!   cargo flamegraph --example perft_bench -p make7_core -- 4 "2D1C3E"

use make7_core::{Position, perft};
use std::env;
use std::time::Instant;

/// Positions from different stages of a game
const TEST_POSITIONS: &[(&str, &str)] = &[
    ("Empty grid", ""),
    ("Centre opening", "2D1C"),
    ("Towers", "1C1D1E1C1D1E1C1D1E1C1D1E"),
    ("Late middlegame", "1G2A2B1B1B1E1F2A1G2G2A1E1G1A1A1G1B2B2E1A1F2F1C1B"),
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);

    if let Some(moves) = args.get(2) {
        run_single_position(moves, depth);
    } else {
        run_all_positions(depth);
    }
}

fn nps(nodes: u64, secs: f64) -> f64 {
    if secs > 0.0 { nodes as f64 / secs } else { 0.0 }
}

fn run_single_position(moves: &str, depth: u8) {
    let mut pos = match Position::from_moves(moves) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Moves: {moves}");
    println!("Depth: {depth}");
    println!();

    // Warm-up run at lower depth
    if depth > 2 {
        let _ = perft(&mut pos, depth.saturating_sub(2));
    }

    let start = Instant::now();
    let nodes = perft(&mut pos, depth);
    let elapsed = start.elapsed();

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {:.0}", nps(nodes, elapsed.as_secs_f64()));
}

fn run_all_positions(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = std::time::Duration::ZERO;

    for &(name, moves) in TEST_POSITIONS {
        let Ok(mut pos) = Position::from_moves(moves) else {
            eprintln!("{name}: bad move list");
            continue;
        };

        print!("{name:.<30}");

        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();

        total_nodes += nodes;
        total_time += elapsed;

        println!(
            " {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
            nps(nodes, elapsed.as_secs_f64())
        );
    }

    println!();
    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        nps(total_nodes, total_time.as_secs_f64())
    );
}
