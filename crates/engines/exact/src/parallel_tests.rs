use super::*;

const FULL_GAME: &str = "1E1G2B1G1F2F2F1A1B2B3G2F1A3A2E2G2F1D2G1A2D2F1E1F2D1A1D2C2G2D2B2G3B1A1A1C1C2E2E2B1D3E2D1E1C1C3C2C1B";

fn prefix(moves: usize) -> Position {
    Position::from_moves(&FULL_GAME[..2 * moves]).unwrap()
}

fn config(threads: usize) -> ExactConfig {
    ExactConfig {
        table_entries: 1 << 16,
        threads,
        parallel: true,
    }
}

fn started() -> TimeControl {
    let tc = TimeControl::new(None);
    tc.start();
    tc
}

#[test]
fn test_worker_count_bounds() {
    assert_eq!(worker_count(4, 0), 0);
    assert_eq!(worker_count(1, 10), 1);
    assert!(worker_count(0, 10) >= 1);
    assert!(worker_count(64, 3) <= 3);
}

#[test]
fn test_matches_serial_sweep() {
    let tc = started();
    let mut serial = Solver::with_entries(1 << 16);
    for moves in [40, 42, 44, 45] {
        let pos = prefix(moves);
        let expected = serial.solve_moves(&pos, &tc);
        let report = solve_moves_parallel(&pos, &config(4), &tc, |_, _| {}).unwrap();
        assert_eq!(report.results, expected, "after {moves} moves");
        assert!(!report.stopped);
    }
}

#[test]
fn test_streams_every_result() {
    let pos = prefix(44);
    let mut seen = Vec::new();
    let report = solve_moves_parallel(&pos, &config(2), &started(), |mv, r| seen.push((mv, r))).unwrap();

    assert_eq!(seen.len(), legal_moves(&pos).len());
    for (mv, r) in seen {
        assert_eq!(report.results.get(mv), r);
    }
    assert_eq!(report.results.best_result(), GameResult::loss(3));
    assert!(report.nodes > 0);
}

#[test]
fn test_immediate_wins_need_no_worker() {
    let pos = prefix(43);
    let mut wins = 0;
    let report = solve_moves_parallel(&pos, &config(1), &started(), |_, r| {
        if r == GameResult::win(0) {
            wins += 1;
        }
    })
    .unwrap();
    assert!(wins > 0);
    assert_eq!(report.results.best_result(), GameResult::win(0));
}

#[test]
fn test_stopped_before_start() {
    let tc = TimeControl::new(None);
    tc.stop();
    let report = solve_moves_parallel(&prefix(41), &config(2), &tc, |_, _| {}).unwrap();
    assert!(report.stopped);
    assert!(report.results.iter().all(|(_, r)| !r.is_known()));
}

#[test]
fn test_stop_lets_running_moves_finish() {
    let pos = prefix(41);
    let tc = started();
    let mut seen = Vec::new();
    let report = solve_moves_parallel(&pos, &config(2), &tc, |mv, r| {
        seen.push((mv, r));
        tc.stop();
    })
    .unwrap();

    assert!(report.stopped);
    assert!(!seen.is_empty() && seen.len() <= report.threads);
    for &(mv, r) in &seen {
        assert!(r.is_known(), "{mv} was started but came back {r}");
        assert_eq!(report.results.get(mv), r);
    }
    let known = report.results.iter().filter(|(_, r)| r.is_known()).count();
    assert_eq!(known, seen.len());
}

#[test]
fn test_terminal_position_has_no_jobs() {
    let pos = Position::from_moves(FULL_GAME).unwrap();
    let report = solve_moves_parallel(&pos, &config(2), &started(), |_, _| {}).unwrap();
    assert_eq!(report.threads, 0);
    assert!(!report.stopped);
    assert_eq!(report.results.best_result(), GameResult::UNKNOWN);
}
