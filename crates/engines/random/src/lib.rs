//! Random Move Make 7 Engine
//!
//! An engine that drops a uniformly random legal tile. Useful for:
//! - Baseline comparisons (any real engine should easily beat this)
//! - Exercising the match runner without paying for search
//! - Stress testing move generation

use make7_core::{legal_moves_into, Engine, Position, SearchLimits, SearchResult, MAX_MOVES};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};


/// A Make 7 engine that plays random legal drops.
///
/// No evaluation at all. With a seed the sequence of choices is
/// reproducible, which keeps match tests deterministic.
#[derive(Debug, Clone, Default)]
pub struct RandomEngine {
    rng: Option<StdRng>,
    nodes: u64,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
            nodes: 0,
        }
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> SearchResult {
        if pos.is_game_over() {
            return SearchResult::empty();
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        legal_moves_into(pos, &mut moves);
        self.nodes = 1;

        let best_move = match self.rng.as_mut() {
            Some(rng) => moves.choose(rng).copied(),
            None => moves.choose(&mut thread_rng()).copied(),
        };

        SearchResult {
            best_move,
            nodes: self.nodes,
            ..SearchResult::empty()
        }
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        if !name.eq_ignore_ascii_case("seed") {
            return false;
        }
        match value.parse() {
            Ok(seed) => {
                self.rng = Some(StdRng::seed_from_u64(seed));
                true
            }
            Err(_) => false,
        }
    }
}
