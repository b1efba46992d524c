//! Match runner for playing games between engines

use std::time::Duration;

use log::{info, warn};
use make7_core::{parse_moves, Engine, Make7Result, Move, Player, Position, SearchLimits};
use serde::{Deserialize, Serialize};

/// How a game ended, from one engine's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Loss,
    Draw,
}

impl GameOutcome {
    pub fn flipped(self) -> Self {
        match self {
            GameOutcome::Win => GameOutcome::Loss,
            GameOutcome::Loss => GameOutcome::Win,
            GameOutcome::Draw => GameOutcome::Draw,
        }
    }
}

/// Win/loss/draw tally from engine 1's perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Score from engine1's perspective (1 for win, 0.5 for draw, 0 for loss)
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total
    }
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Whether engine 1 dropped first
    pub engine1_first: bool,
    /// Every drop, opening included, in "2D" notation
    pub moves: String,
    /// Result for engine 1
    pub outcome: GameOutcome,
    /// Set when a side lost by returning an illegal drop or none at all
    pub forfeit: Option<String>,
}

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: u32,
    /// MCTS iteration budget per move (None = engine default)
    pub iterations: Option<u64>,
    /// Maximum time per move (None = no limit)
    pub time_per_move: Option<Duration>,
    /// Drops played before the engines take over, e.g. "1D2C"
    pub opening: String,
    /// Whether to alternate who drops first each game
    pub alternate_first: bool,
    /// Log each game as it finishes
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            iterations: None,
            time_per_move: None,
            opening: String::new(),
            alternate_first: true,
            verbose: true,
        }
    }
}

impl MatchConfig {
    /// Create search limits based on this config
    fn search_limits(&self) -> SearchLimits {
        match (self.iterations, self.time_per_move) {
            (Some(n), Some(time)) => SearchLimits::iterations_and_time(n, time),
            (Some(n), None) => SearchLimits::iterations(n),
            (None, Some(time)) => SearchLimits::time(time),
            (None, None) => SearchLimits::infinite(),
        }
    }
}

/// Runs matches between two engines
pub struct MatchRunner {
    config: MatchConfig,
    opening: Vec<Move>,
}

impl MatchRunner {
    /// # Errors
    /// `InvalidNotation`, `IllegalMove` or `GameOver` if the opening is
    /// not a playable sequence.
    pub fn new(config: MatchConfig) -> Make7Result<Self> {
        let opening = parse_moves(&config.opening)?;
        Position::from_moves(&config.opening)?;
        Ok(Self { config, opening })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run a match between two engines
    ///
    /// Returns the tally from engine1's perspective and every game played.
    pub fn run_match(&self, engine1: &mut dyn Engine, engine2: &mut dyn Engine) -> (MatchResult, Vec<GameRecord>) {
        let mut result = MatchResult::new();
        let mut games = Vec::with_capacity(self.config.num_games as usize);

        for game_num in 0..self.config.num_games {
            let engine1_first = !self.config.alternate_first || game_num % 2 == 0;

            let mut record = if engine1_first {
                self.play_game(engine1, engine2)
            } else {
                self.play_game(engine2, engine1)
            };
            record.engine1_first = engine1_first;
            if !engine1_first {
                record.outcome = record.outcome.flipped();
            }
            result.record(record.outcome);

            if self.config.verbose {
                let order = if engine1_first { "first" } else { "second" };
                info!(
                    "Game {}/{}: {:?} ({order}) - Score: {}-{}-{}",
                    game_num + 1,
                    self.config.num_games,
                    record.outcome,
                    result.wins,
                    result.losses,
                    result.draws
                );
            }
            games.push(record);
        }

        (result, games)
    }

    /// Play a single game, returns the record from the first player's view
    pub fn play_game(&self, first: &mut dyn Engine, second: &mut dyn Engine) -> GameRecord {
        let mut pos = Position::new();
        first.new_game();
        second.new_game();
        for &mv in &self.opening {
            // checked in new()
            pos.drop(mv);
        }

        let record = |pos: &Position, outcome, forfeit| GameRecord {
            engine1_first: true,
            moves: pos.moves().map(|m| m.to_string()).collect(),
            outcome,
            forfeit,
        };

        loop {
            if let Some(winner) = pos.winner() {
                let outcome = if winner == Player::First { GameOutcome::Win } else { GameOutcome::Loss };
                return record(&pos, outcome, None);
            }
            if pos.is_draw() {
                return record(&pos, GameOutcome::Draw, None);
            }

            // fresh limits per move restart the clock
            let limits = self.config.search_limits();
            let mover = pos.side_to_move();
            let (engine, loses): (&mut dyn Engine, GameOutcome) = match mover {
                Player::First => (&mut *first, GameOutcome::Loss),
                Player::Second => (&mut *second, GameOutcome::Win),
            };

            let Some(mv) = engine.search(&pos, limits).best_move else {
                warn!("{} returned no move at ply {}", engine.name(), pos.ply());
                let reason = format!("{} returned no move", engine.name());
                return record(&pos, loses, Some(reason));
            };
            if let Err(e) = pos.play(mv) {
                warn!("{} forfeits: {e}", engine.name());
                let reason = format!("{}: {e}", engine.name());
                return record(&pos, loses, Some(reason));
            }
        }
    }
}

/// Quick utility to run a single match
pub fn quick_match(engine1: &mut dyn Engine, engine2: &mut dyn Engine, num_games: u32) -> MatchResult {
    let config = MatchConfig {
        num_games,
        verbose: false,
        ..Default::default()
    };
    MatchRunner {
        config,
        opening: Vec::new(),
    }
    .run_match(engine1, engine2)
    .0
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
