use super::*;
use make7_core::{legal_moves, SearchResult};
use exact_engine::{ExactConfig, ExactEngine};
use mcts_engine::{MctsConfig, MctsEngine};
use random_engine::RandomEngine;

/// Always drops the given move, legal or not.
struct Stubborn(Move);

impl Engine for Stubborn {
    fn search(&mut self, _pos: &Position, _limits: SearchLimits) -> SearchResult {
        SearchResult {
            best_move: Some(self.0),
            ..SearchResult::empty()
        }
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

/// Plays the first legal move.
struct FirstLegal;

impl Engine for FirstLegal {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> SearchResult {
        SearchResult {
            best_move: legal_moves(pos).first().copied(),
            ..SearchResult::empty()
        }
    }

    fn name(&self) -> &str {
        "first-legal"
    }
}

fn quiet(num_games: u32) -> MatchConfig {
    MatchConfig {
        num_games,
        verbose: false,
        ..Default::default()
    }
}

#[test]
fn test_random_self_play() {
    let mut engine1 = RandomEngine::seeded(1);
    let mut engine2 = RandomEngine::seeded(2);

    let runner = MatchRunner::new(quiet(6)).unwrap();
    let (result, games) = runner.run_match(&mut engine1, &mut engine2);

    assert_eq!(result.total_games(), 6);
    assert_eq!(games.len(), 6);
    for (i, game) in games.iter().enumerate() {
        assert_eq!(game.engine1_first, i % 2 == 0);
        assert!(game.forfeit.is_none());
        let pos = Position::from_moves(&game.moves).unwrap();
        assert!(pos.is_game_over());
    }
}

#[test]
fn test_outcomes_follow_the_winner() {
    let runner = MatchRunner::new(quiet(1)).unwrap();
    let record = runner.play_game(&mut RandomEngine::seeded(3), &mut RandomEngine::seeded(4));
    let pos = Position::from_moves(&record.moves).unwrap();
    let expected = match pos.winner() {
        Some(Player::First) => GameOutcome::Win,
        Some(Player::Second) => GameOutcome::Loss,
        None => GameOutcome::Draw,
    };
    assert_eq!(record.outcome, expected);
}

#[test]
fn test_illegal_move_forfeits() {
    // a 3 can never land on the bottom row
    let cheat = Move::new(make7_core::Tile::Three, 0);
    let runner = MatchRunner::new(MatchConfig {
        alternate_first: false,
        ..quiet(2)
    })
    .unwrap();
    let (result, games) = runner.run_match(&mut Stubborn(cheat), &mut FirstLegal);

    assert_eq!(result.losses, 2);
    assert!(games.iter().all(|g| g.forfeit.is_some() && g.moves.is_empty()));
}

#[test]
fn test_second_player_forfeit_is_a_win() {
    let cheat = Move::new(make7_core::Tile::Three, 0);
    let runner = MatchRunner::new(MatchConfig {
        alternate_first: false,
        ..quiet(1)
    })
    .unwrap();
    let (result, games) = runner.run_match(&mut FirstLegal, &mut Stubborn(cheat));
    assert_eq!(result.wins, 1);
    assert_eq!(games[0].moves, "1A");
}

#[test]
fn test_opening_is_played_first() {
    let runner = MatchRunner::new(MatchConfig {
        opening: "2D1C".into(),
        ..quiet(2)
    })
    .unwrap();
    let (_, games) = runner.run_match(&mut RandomEngine::seeded(5), &mut RandomEngine::seeded(6));
    assert!(games.iter().all(|g| g.moves.starts_with("2D1C")));
}

#[test]
fn test_bad_opening_is_rejected() {
    for opening in ["9Z", "3A", "1A1A1A1A1A1A1A1A"] {
        let config = MatchConfig {
            opening: opening.into(),
            ..quiet(1)
        };
        assert!(MatchRunner::new(config).is_err(), "{opening}");
    }
}

#[test]
fn test_mcts_beats_random() {
    let mut mcts = MctsEngine::with_config(MctsConfig {
        seed: Some(8),
        ..MctsConfig::default()
    });
    let mut random = RandomEngine::seeded(8);
    let runner = MatchRunner::new(MatchConfig {
        iterations: Some(3_000),
        ..quiet(4)
    })
    .unwrap();
    let (result, _) = runner.run_match(&mut mcts, &mut random);
    assert!(result.score() > 0.5, "{result:?}");
}

#[test]
fn test_exact_takes_the_immediate_win() {
    // the side to move has a seven available after these 40 drops
    let opening = "1E1G2B1G1F2F2F1A1B2B3G2F1A3A2E2G2F1D2G1A2D2F1E1F2D1A1D2C2G2D2B2G3B1A1A1C1C2E2E2B";
    let mut exact = ExactEngine::with_config(ExactConfig {
        table_entries: 1 << 16,
        threads: 1,
        parallel: false,
    });
    let runner = MatchRunner::new(MatchConfig {
        opening: opening.into(),
        alternate_first: false,
        ..quiet(2)
    })
    .unwrap();
    let (result, games) = runner.run_match(&mut exact, &mut RandomEngine::seeded(3));

    assert_eq!(result.wins, 2);
    for game in &games {
        assert_eq!(game.moves.len(), 82);
        let pos = Position::from_moves(&game.moves).unwrap();
        assert_eq!(pos.winner(), Some(Player::First));
    }
}

#[test]
fn test_score() {
    let mut result = MatchResult::new();
    assert_eq!(result.score(), 0.5);
    result.record(GameOutcome::Win);
    result.record(GameOutcome::Draw);
    result.record(GameOutcome::Loss);
    result.record(GameOutcome::Win);
    assert_eq!(result.total_games(), 4);
    assert_eq!(result.score(), 0.625);
    assert_eq!(GameOutcome::Win.flipped(), GameOutcome::Loss);
}

#[test]
fn test_quick_match() {
    let result = quick_match(&mut RandomEngine::seeded(1), &mut FirstLegal, 3);
    assert_eq!(result.total_games(), 3);
}
