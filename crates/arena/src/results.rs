//! Match report storage and printing

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::match_runner::{GameOutcome, GameRecord, MatchConfig, MatchResult};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("report is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings a match was played under, kept alongside its games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub num_games: u32,
    pub iterations: Option<u64>,
    pub time_per_move_ms: Option<u64>,
    pub opening: String,
}

impl From<&MatchConfig> for ReportConfig {
    fn from(config: &MatchConfig) -> Self {
        Self {
            num_games: config.num_games,
            iterations: config.iterations,
            time_per_move_ms: config.time_per_move.map(|t| t.as_millis() as u64),
            opening: config.opening.clone(),
        }
    }
}

/// A finished match: who played, the tally and every game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub name: String,
    pub engine1: String,
    pub engine2: String,
    pub config: ReportConfig,
    pub result: MatchResult,
    pub games: Vec<GameRecord>,
}

impl MatchReport {
    pub fn new(
        name: &str,
        engine1: &str,
        engine2: &str,
        config: &MatchConfig,
        result: MatchResult,
        games: Vec<GameRecord>,
    ) -> Self {
        Self {
            name: name.to_string(),
            engine1: engine1.to_string(),
            engine2: engine2.to_string(),
            config: config.into(),
            result,
            games,
        }
    }

    pub fn forfeits(&self) -> usize {
        self.games.iter().filter(|g| g.forfeit.is_some()).count()
    }

    /// Save the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a report written by [`MatchReport::save`]
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Match: {} ===\n\n", self.name));
        report.push_str(&format!("{} vs {}\n", self.engine1, self.engine2));

        let limit = match (self.config.iterations, self.config.time_per_move_ms) {
            (Some(n), Some(ms)) => format!("{n} iterations or {ms} ms per move"),
            (Some(n), None) => format!("{n} iterations per move"),
            (None, Some(ms)) => format!("{ms} ms per move"),
            (None, None) => "engine defaults".to_string(),
        };
        report.push_str(&format!("Config: {} games, {limit}\n", self.config.num_games));
        if !self.config.opening.is_empty() {
            report.push_str(&format!("Opening: {}\n", self.config.opening));
        }

        report.push_str(&format!("\n{:>4}  {:<6} {:<5} Moves\n", "Game", "First", "Res"));
        report.push_str(&"-".repeat(60));
        report.push('\n');
        for (i, game) in self.games.iter().enumerate() {
            let first = if game.engine1_first { &self.engine1 } else { &self.engine2 };
            let res = match game.outcome {
                GameOutcome::Win => "1-0",
                GameOutcome::Loss => "0-1",
                GameOutcome::Draw => "½-½",
            };
            report.push_str(&format!("{:>4}  {:<6} {:<5} {}", i + 1, first, res, game.moves));
            if let Some(reason) = &game.forfeit {
                report.push_str(&format!(" (forfeit: {reason})"));
            }
            report.push('\n');
        }

        report.push_str(&format!(
            "\nScore: +{} -{} ={} ({:.1}%)\n",
            self.result.wins,
            self.result.losses,
            self.result.draws,
            self.result.score() * 100.0
        ));
        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
