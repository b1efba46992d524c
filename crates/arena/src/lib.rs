//! Match play for Make 7 engines
//!
//! This crate provides:
//! - A match runner that plays engines against each other, alternating
//!   who drops first
//! - Win/loss/draw tallies and per-game move records
//! - JSON reports that can be saved, reloaded and printed
//!
//! # Usage
//!
//! ```bash
//! # Ten games of MCTS against the random baseline
//! make7 match --engine1 mcts --engine2 random --games 10
//! ```

mod match_runner;
mod results;

pub use match_runner::*;
pub use results::*;
