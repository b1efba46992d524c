//! `make7` command line
//!
//! Solve positions exactly, analyse them with MCTS, or play engines
//! against each other.

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use arena::{MatchConfig, MatchReport, MatchRunner};
use clap::{Parser, Subcommand};
use config::{limits, Config};
use exact_engine::{solve_moves_parallel, ExactEngine, Solver};
use log::{debug, info};
use make7_core::{perft, Engine, Position};
use mcts_engine::{MctsEngine, Proven};
use random_engine::RandomEngine;

#[derive(Parser, Debug)]
#[command(name = "make7", author, version, about, long_about = None)]
struct Cli {
    /// TOML file with [exact] and [mcts] settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a position exactly
    Solve {
        /// Moves played so far, e.g. "2D1C3E"
        #[arg(default_value = "")]
        moves: String,
        /// Transposition table entries
        #[arg(long)]
        table_entries: Option<usize>,
        /// Give up after this many milliseconds
        #[arg(long)]
        time_ms: Option<u64>,
    },
    /// Solve every legal move of a position
    Moves {
        #[arg(default_value = "")]
        moves: String,
        #[arg(long)]
        table_entries: Option<usize>,
        /// Worker threads (0 = one per core)
        #[arg(long)]
        threads: Option<usize>,
        /// Solve the moves one after another on this thread
        #[arg(long)]
        serial: bool,
        #[arg(long)]
        time_ms: Option<u64>,
    },
    /// Analyse a position with Monte Carlo tree search
    Mcts {
        #[arg(default_value = "")]
        moves: String,
        #[arg(long)]
        iterations: Option<u64>,
        #[arg(long)]
        time_ms: Option<u64>,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        exploration: Option<f64>,
    },
    /// Play a match between two engines
    Match {
        /// exact, mcts or random
        #[arg(long, default_value = "mcts")]
        engine1: String,
        #[arg(long, default_value = "random")]
        engine2: String,
        #[arg(short, long, default_value_t = 10)]
        games: u32,
        /// MCTS iterations per move
        #[arg(long)]
        iterations: Option<u64>,
        #[arg(long)]
        time_ms: Option<u64>,
        /// Moves played before the engines take over
        #[arg(long, default_value = "")]
        opening: String,
        /// Save the match report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Count leaf positions to a fixed depth
    Perft {
        #[arg(default_value = "")]
        moves: String,
        #[arg(short, long, default_value_t = 3)]
        depth: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    debug!("config: {config:?}");

    match cli.command {
        Command::Solve { moves, table_entries, time_ms } => {
            if let Some(entries) = table_entries {
                config.exact.table_entries = entries;
            }
            let pos = position(&moves)?;
            let limits = limits(None, time_ms);
            let started = Instant::now();
            let (result, nodes) = exact_engine::solve(&pos, config.exact.table_entries, &limits);
            println!("{pos}");
            println!("result: {result}");
            println!("nodes: {nodes} in {:.2?}", started.elapsed());
        }
        Command::Moves { moves, table_entries, threads, serial, time_ms } => {
            if let Some(entries) = table_entries {
                config.exact.table_entries = entries;
            }
            if let Some(threads) = threads {
                config.exact.threads = threads;
            }
            if serial {
                config.exact.parallel = false;
            }
            let pos = position(&moves)?;
            ensure_playable(&pos)?;
            let limits = limits(None, time_ms);
            limits.start();

            let started = Instant::now();
            let (table, nodes) = if config.exact.parallel {
                let report = solve_moves_parallel(&pos, &config.exact, &limits.time_control, |mv, result| {
                    info!("{mv}: {result}");
                })?;
                (report.results, report.nodes)
            } else {
                let mut solver = Solver::with_entries(config.exact.table_entries);
                let table = solver.solve_moves(&pos, &limits.time_control);
                (table, solver.nodes())
            };

            println!("{pos}");
            println!("{table}");
            let best: Vec<String> = table.best_moves().iter().map(|m| m.to_string()).collect();
            println!("best: {} ({})", best.join(" "), table.best_result());
            println!("nodes: {nodes} in {:.2?}", started.elapsed());
        }
        Command::Mcts { moves, iterations, time_ms, threads, seed, exploration } => {
            let section = &mut config.mcts;
            if let Some(n) = iterations {
                section.iterations = n;
            }
            if time_ms.is_some() {
                section.time_ms = time_ms;
            }
            if let Some(t) = threads {
                section.threads = t;
            }
            if seed.is_some() {
                section.seed = seed;
            }
            if let Some(c) = exploration {
                section.exploration = c;
            }
            let pos = position(&moves)?;
            ensure_playable(&pos)?;

            let mut engine = MctsEngine::with_config(section.engine_config());
            let result = engine.analyze(&pos, &section.limits(), |progress| {
                if let Some(best) = progress.best_move {
                    info!(
                        "{} iterations, best {best} ({:+.3} over {} visits)",
                        progress.iterations,
                        progress.mean_reward,
                        progress.visits
                    );
                }
            });

            println!("{pos}");
            println!("{:<5} {:>10} {:>9}  proven", "move", "visits", "reward");
            for branch in &result.branches {
                println!(
                    "{:<5} {:>10} {:>+9.3}  {:?}",
                    branch.mv.to_string(),
                    branch.visits,
                    branch.mean_reward(),
                    branch.proven
                );
            }
            match result.best_move {
                Some(best) => println!("best: {best} ({:?})", result.proven),
                None => println!("best: none"),
            }
            if result.proven != Proven::Unsolved {
                println!("position proven: {}", result.proven.to_result());
            }
            println!("iterations: {}", result.iterations);
        }
        Command::Match { engine1, engine2, games, iterations, time_ms, opening, report } => {
            let mut first = create_engine(&engine1, &config)?;
            let mut second = create_engine(&engine2, &config)?;
            let match_config = MatchConfig {
                num_games: games,
                iterations,
                time_per_move: time_ms.map(std::time::Duration::from_millis),
                opening,
                ..Default::default()
            };
            let runner = MatchRunner::new(match_config).context("invalid opening")?;
            let (result, records) = runner.run_match(first.as_mut(), second.as_mut());

            let name = format!("{engine1} vs {engine2}");
            let summary = MatchReport::new(&name, &engine1, &engine2, runner.config(), result, records);
            summary.print_report();
            if let Some(path) = report {
                summary
                    .save(&path)
                    .with_context(|| format!("saving report to {}", path.display()))?;
                info!("report saved to {}", path.display());
            }
        }
        Command::Perft { moves, depth } => {
            let mut pos = position(&moves)?;
            for d in 1..=depth {
                let started = Instant::now();
                let nodes = perft(&mut pos, d);
                println!("depth {d}: {nodes} ({:.2?})", started.elapsed());
            }
        }
    }
    Ok(())
}

fn position(moves: &str) -> Result<Position> {
    Position::from_moves(moves).with_context(|| format!("cannot set up position {moves:?}"))
}

fn ensure_playable(pos: &Position) -> Result<()> {
    if pos.is_game_over() {
        bail!("the game is already over:\n{pos}");
    }
    Ok(())
}

fn create_engine(name: &str, config: &Config) -> Result<Box<dyn Engine>> {
    let engine: Box<dyn Engine> = match name.to_ascii_lowercase().as_str() {
        "exact" | "solver" => Box::new(ExactEngine::with_config(config.exact.clone())),
        "mcts" => Box::new(MctsEngine::with_config(config.mcts.engine_config())),
        "random" => match config.mcts.seed {
            Some(seed) => Box::new(RandomEngine::seeded(seed)),
            None => Box::new(RandomEngine::new()),
        },
        other => bail!("unknown engine {other:?} (expected exact, mcts or random)"),
    };
    Ok(engine)
}
