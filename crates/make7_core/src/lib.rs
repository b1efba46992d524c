pub mod bitboard;
pub mod error;
pub mod movegen;
pub mod outcome;
pub mod perft;
pub mod position;
pub mod time_control;
pub mod types;
pub mod win;

// Re-export core game logic (not engine-specific)
pub use bitboard::*;
pub use error::*;
pub use movegen::*;
pub use outcome::*;
pub use perft::perft;
pub use position::*;
pub use time_control::*;
pub use types::*;

// =============================================================================
// Engine trait: implemented by the exact, MCTS and random engines
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Solved value of the position for the side to move (Unknown for
    /// engines that do not prove results)
    pub result: GameResult,
    /// Mean reward of the chosen move, for statistical engines
    pub mean_reward: Option<f64>,
    /// Nodes (exact) or iterations (MCTS) spent
    pub nodes: u64,
    /// Whether search was stopped early by the time limit or cancel token
    pub stopped: bool,
}

impl SearchResult {
    /// A result for a position with nothing left to search.
    pub fn empty() -> Self {
        Self {
            best_move: None,
            result: GameResult::UNKNOWN,
            mean_reward: None,
            nodes: 0,
            stopped: false,
        }
    }
}

/// Trait that all Make 7 engines implement.
///
/// This allows the match runner and the command line to swap between the
/// exact solver, MCTS and the random baseline.
pub trait Engine: Send {
    /// Search the position with the given search limits.
    ///
    /// # Arguments
    /// * `pos` - The current position to analyze
    /// * `limits` - Search limits (iterations, time, cancellation)
    ///
    /// # Returns
    /// SearchResult containing best move, result, and statistics
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name
    fn name(&self) -> &str;

    /// Returns the engine's author
    fn author(&self) -> &str {
        "make7"
    }

    /// Reset internal state for a new game
    fn new_game(&mut self) {}

    /// Optional: Set an engine option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
