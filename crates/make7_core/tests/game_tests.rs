//! Whole-game checks for Make 7
//!
//! - Recorded games that end in each kind of draw
//! - Randomized games checked against a brute-force seven finder

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use make7_core::{COLUMNS, Make7Error, Player, Position, ROWS, cell, legal_moves};

/// Ends with both players holding only 3s and no marked cell open.
const STUCK_GAME: &str = "1G2A2B1B1B1E1F2A1G2G2A1E1G1A1A1G1B2B2E1A1F2F1C1B1F1C1E1F2D2F2G2A2B2C2E2F2G2C3E1D2C2E2D1C2C3D";
/// Fills all 49 cells without a seven.
const FULL_GAME: &str = "1E1G2B1G1F2F2F1A1B2B3G2F1A3A2E2G2F1D2G1A2D2F1E1F2D1A1D2C2G2D2B2G3B1A1A1C1C2E2E2B1D3E2D1E1C1C3C2C1B";

// =============================================================================
// Recorded games
// =============================================================================

#[test]
fn test_stuck_game_is_drawn() {
    let pos = Position::from_moves(STUCK_GAME).unwrap();
    assert_eq!(pos.ply(), 46);
    assert!(!pos.is_winning_sum());
    assert!(pos.has_no_legal_moves());
    assert!(!pos.is_grid_full());
    assert!(pos.is_draw());
    assert!(pos.is_game_over());
    assert_eq!(pos.winner(), None);
    assert!(legal_moves(&pos).is_empty());
}

#[test]
fn test_full_game_is_drawn() {
    let pos = Position::from_moves(FULL_GAME).unwrap();
    assert_eq!(pos.ply(), 49);
    assert!(pos.is_grid_full());
    assert!(pos.is_draw());
    assert!(!pos.is_winning_sum());
    assert!(pos.is_consistent());
}

#[test]
fn test_no_drop_after_draw() {
    let mut pos = Position::from_moves(STUCK_GAME).unwrap();
    let err = pos.play("1A".parse().unwrap()).unwrap_err();
    assert!(matches!(err, Make7Error::GameOver { .. }));
}

#[test]
fn test_replaying_history_matches() {
    for game in [STUCK_GAME, FULL_GAME] {
        let pos = Position::from_moves(game).unwrap();
        let replayed: String = pos.moves().map(|m| m.to_string()).collect();
        assert_eq!(replayed, game);
        assert_eq!(Position::from_moves(&replayed).unwrap(), pos);
    }
}

#[test]
fn test_unwinding_a_full_game() {
    let mut pos = Position::from_moves(FULL_GAME).unwrap();
    while pos.undo().is_some() {
        assert!(pos.is_consistent());
    }
    assert_eq!(pos, Position::new());
}

// =============================================================================
// Randomized games
// =============================================================================

/// Every line through `last`, checked for a run of the mover's tiles
/// that includes `last` and adds up to seven.
fn brute_force_seven(pos: &Position, column: u8, row: u8, owner: Player) -> bool {
    let value = |c: i32, r: i32| -> Option<u32> {
        if !(0..COLUMNS as i32).contains(&c) || !(0..ROWS as i32).contains(&r) {
            return None;
        }
        match pos.tile_at(cell(c as u8, r as u8)) {
            Some((p, v)) if p == owner => Some(v as u32),
            _ => None,
        }
    };

    let (c0, r0) = (column as i32, row as i32);
    for (dc, dr) in [(0, 1), (1, 0), (1, 1), (1, -1)] {
        let mut line = Vec::new();
        let mut k = 1;
        while let Some(v) = value(c0 - k * dc, r0 - k * dr) {
            line.insert(0, v);
            k += 1;
        }
        let centre = line.len();
        let mut k = 0;
        while let Some(v) = value(c0 + k * dc, r0 + k * dr) {
            line.push(v);
            k += 1;
        }
        for start in 0..=centre {
            for end in centre..line.len() {
                if line[start..=end].iter().sum::<u32>() == 7 {
                    return true;
                }
            }
        }
    }
    false
}

fn random_game(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos = Position::new();

    while !pos.is_game_over() {
        let moves = legal_moves(&pos);
        assert!(!moves.is_empty(), "seed {seed}: no moves but not a draw\n{pos}");
        let &mv = moves.choose(&mut rng).unwrap();

        let before = pos;
        let mover = pos.side_to_move();
        let row = pos.column_height(mv.column);
        assert!(pos.drop(mv), "seed {seed}: legal move {mv} rejected");
        assert!(pos.is_consistent(), "seed {seed}\n{pos}");
        assert_eq!(pos.last_move(), Some(mv));

        assert_eq!(
            pos.is_winning_sum(),
            brute_force_seven(&pos, mv.column, row, mover),
            "seed {seed}: after {mv}\n{pos}"
        );

        let mut undone = pos;
        assert_eq!(undone.undo(), Some(mv));
        assert_eq!(undone, before, "seed {seed}: undo of {mv}");
    }

    match pos.winner() {
        Some(winner) => assert_eq!(winner, pos.side_to_move().other()),
        None => assert!(pos.is_draw()),
    }
    let replay: String = pos.moves().map(|m| m.to_string()).collect();
    assert_eq!(Position::from_moves(&replay).unwrap(), pos);
}

#[test]
fn test_random_games_agree_with_brute_force() {
    (0..400u64).into_par_iter().for_each(random_game);
}

#[test]
fn test_mirror_is_an_involution() {
    (0..50u64).into_par_iter().for_each(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pos = Position::new();
        for _ in 0..20 {
            if pos.is_game_over() {
                break;
            }
            let &mv = legal_moves(&pos).choose(&mut rng).unwrap();
            pos.drop(mv);
        }
        let mirrored = pos.mirror();
        assert!(mirrored.is_consistent());
        assert_eq!(mirrored.mirror().fingerprint(), pos.fingerprint());
        assert_eq!(legal_moves(&mirrored).len(), legal_moves(&pos).len());
    });
}
