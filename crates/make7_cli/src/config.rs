//! TOML configuration for the `make7` binary.
//!
//! ```toml
//! [exact]
//! table_entries = 8388608
//! threads = 8
//!
//! [mcts]
//! iterations = 500000
//! time_ms = 10000
//! seed = 7
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use exact_engine::ExactConfig;
use make7_core::SearchLimits;
use mcts_engine::MctsConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exact: ExactConfig,
    pub mcts: MctsSection,
}

/// `[mcts]` table: engine settings plus the per-search limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsSection {
    pub exploration: f64,
    /// 0 = unlimited
    pub iterations: u64,
    pub time_ms: Option<u64>,
    pub threads: usize,
    pub max_nodes: usize,
    pub seed: Option<u64>,
    pub report_interval_ms: u64,
}

impl Default for MctsSection {
    fn default() -> Self {
        let engine = MctsConfig::default();
        Self {
            exploration: engine.exploration,
            iterations: engine.iterations,
            time_ms: None,
            threads: engine.threads,
            max_nodes: engine.max_nodes,
            seed: engine.seed,
            report_interval_ms: engine.report_interval.as_millis() as u64,
        }
    }
}

impl MctsSection {
    pub fn engine_config(&self) -> MctsConfig {
        MctsConfig {
            exploration: self.exploration,
            iterations: self.iterations,
            threads: self.threads,
            max_nodes: self.max_nodes,
            seed: self.seed,
            report_interval: Duration::from_millis(self.report_interval_ms),
        }
    }

    pub fn limits(&self) -> SearchLimits {
        let iterations = (self.iterations > 0).then_some(self.iterations);
        limits(iterations, self.time_ms)
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Search limits from an optional iteration budget and move time.
pub fn limits(iterations: Option<u64>, time_ms: Option<u64>) -> SearchLimits {
    match (iterations, time_ms.map(Duration::from_millis)) {
        (Some(n), Some(time)) => SearchLimits::iterations_and_time(n, time),
        (Some(n), None) => SearchLimits::iterations(n),
        (None, Some(time)) => SearchLimits::time(time),
        (None, None) => SearchLimits::infinite(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
