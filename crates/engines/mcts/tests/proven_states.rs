//! Proven root states must match the exact solver on positions small
//! enough for MCTS to settle completely.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use exact_engine::Solver;
use make7_core::{legal_moves, Outcome, Position, SearchLimits, TimeControl};
use mcts_engine::{Mcts, MctsConfig, Proven};

const GAMES: u64 = 32;
const SETTLE_FROM_PLY: usize = 43;

fn random_position(seed: u64) -> Position {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos = Position::new();
    while pos.ply() < SETTLE_FROM_PLY && !pos.is_game_over() {
        let moves = legal_moves(&pos);
        let &mv = moves.choose(&mut rng).unwrap();
        pos.play(mv).unwrap();
    }
    pos
}

fn expected(outcome: Outcome) -> Proven {
    match outcome {
        Outcome::Win => Proven::Win,
        Outcome::Loss => Proven::Loss,
        Outcome::Draw => Proven::Draw,
        Outcome::Unknown => Proven::Unsolved,
    }
}

#[test]
fn proven_root_matches_exact_solver() {
    (0..GAMES).into_par_iter().for_each(|seed| {
        let pos = random_position(seed);
        if pos.is_game_over() {
            return;
        }

        let tc = TimeControl::new(None);
        tc.start();
        let exact = Solver::with_entries(1 << 14).solve(&pos, &tc);

        let config = MctsConfig {
            seed: Some(seed),
            ..MctsConfig::default()
        };
        let mut mcts = Mcts::new(&pos, &config);
        let result = mcts.run(&SearchLimits::infinite(), None, config.report_interval, |_| {});

        assert_eq!(result.proven, expected(exact.outcome), "seed {seed}\n{pos}");
        if result.proven == Proven::Win {
            let best = result.best_move.unwrap();
            assert_eq!(result.branch(best).unwrap().proven, Proven::Loss);
        }
    });
}
