use super::*;
use make7_core::{GameResult, Outcome, Tile};

const FILLER: &str = "1C1D1E1C1D1E1C1D1E1C1D1E1C1D1E";

fn branch(column: u8, visits: u64, proven: Proven) -> BranchStats {
    BranchStats {
        visits,
        proven,
        ..BranchStats::new(Move::new(Tile::One, column))
    }
}

#[test]
fn best_branch_prefers_proven_wins_then_visits() {
    let branches = [
        branch(0, 900, Proven::Win),
        branch(1, 50, Proven::Draw),
        branch(2, 300, Proven::Unsolved),
        branch(3, 400, Proven::Unsolved),
        branch(4, 1, Proven::Loss),
    ];
    assert_eq!(best_branch(&branches).unwrap().mv.column, 4);
    assert_eq!(best_branch(&branches[..4]).unwrap().mv.column, 3);
    assert_eq!(best_branch(&branches[..2]).unwrap().mv.column, 1);
    assert_eq!(best_branch(&branches[..1]).unwrap().mv.column, 0);
    assert!(best_branch(&[]).is_none());
}

#[test]
fn best_branch_keeps_first_of_exact_ties() {
    let branches = [branch(5, 10, Proven::Unsolved), branch(6, 10, Proven::Unsolved)];
    assert_eq!(best_branch(&branches).unwrap().mv.column, 5);
}

#[test]
fn result_summarises_branches() {
    let mut a = branch(0, 3, Proven::Unsolved);
    a.points = -3;
    let mut b = branch(1, 4, Proven::Unsolved);
    b.points = 2;
    let result = MctsResult::from_branches(vec![a, b], Proven::Unsolved, 7);
    assert_eq!(result.best_move, Some(b.mv));
    assert_eq!(result.mean_reward, 0.5);
    assert_eq!(result.visits, 7);
    assert_eq!(result.branch(a.mv).map(|s| s.mean_reward()), Some(-1.0));
}

#[test]
fn budget_prefers_search_limits() {
    let config = MctsConfig::default();
    assert_eq!(config.budget(&SearchLimits::iterations(10)), Some(10));
    assert_eq!(config.budget(&SearchLimits::infinite()), Some(config.iterations));
    let unlimited = MctsConfig {
        iterations: 0,
        ..MctsConfig::default()
    };
    assert_eq!(unlimited.budget(&SearchLimits::infinite()), None);
}

#[test]
fn config_from_partial_json() {
    let config: MctsConfig = serde_json::from_str(r#"{"threads": 4, "seed": 9}"#).unwrap();
    assert_eq!(config.threads, 4);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.exploration, std::f64::consts::SQRT_2);
}

#[test]
fn engine_plays_the_winning_drop() {
    let pos = Position::from_moves(&format!("{FILLER}1A3C1A3E1G")).unwrap();
    for threads in [1, 2] {
        let mut engine = MctsEngine::with_config(MctsConfig {
            threads,
            seed: Some(4),
            ..MctsConfig::default()
        });
        let result = engine.search(&pos, SearchLimits::iterations(5_000));
        assert_eq!(result.best_move, Some("1D".parse().unwrap()));
        assert_eq!(result.result.outcome, Outcome::Win);
        assert!(result.mean_reward.unwrap() > 0.0);
        assert!(result.nodes > 0);
    }
}

#[test]
fn engine_on_finished_game() {
    let pos = Position::from_moves(&format!("{FILLER}1A3C1A3E1G1D")).unwrap();
    let result = MctsEngine::new().search(&pos, SearchLimits::iterations(100));
    assert!(result.best_move.is_none());
    assert_eq!(result.result, GameResult::UNKNOWN);
}

#[test]
fn engine_options() {
    let mut engine = MctsEngine::new();
    assert!(engine.set_option("Exploration", "0.7"));
    assert!(engine.set_option("iterations", "123"));
    assert!(engine.set_option("threads", "2"));
    assert!(engine.set_option("seed", "5"));
    assert!(engine.set_option("max_nodes", "1000"));
    assert!(!engine.set_option("iterations", "lots"));
    assert!(!engine.set_option("Hash", "16"));

    let config = engine.config();
    assert_eq!(config.exploration, 0.7);
    assert_eq!(config.iterations, 123);
    assert_eq!(config.threads, 2);
    assert_eq!(config.seed, Some(5));
    assert_eq!(config.max_nodes, 1000);
    assert_eq!(engine.name(), "MCTS v1.0");
}
