//! Spin engine integration tests
//!
//! Tests for:
//! - Credit conservation across long seeded sessions
//! - Rejection of unaffordable spins without side effects
//! - One-symbol catalog end to end (every line matches)
//! - Controller regime switching as the session ratio moves
//! - Replay of recorded grids through `evaluate_grid`
//! - Payouts near `u64::MAX` refused instead of wrapping

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use ds_slot::{
    Adjustment, Grid, Payline, PlayerAccount, RtpRegime, SlotConfig, SlotEngine, SlotError,
    SpinOutcome, Symbol, standard_paylines,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn default_engine() -> SlotEngine {
    SlotEngine::new(SlotConfig::default()).expect("default config is valid")
}

/// Engine whose catalog holds a single symbol, so every cell matches
fn single_symbol_engine() -> SlotEngine {
    let config = SlotConfig {
        symbols: vec![Symbol::regular("pearl", "Pearl", "o", 1.0, 100)],
        ..Default::default()
    };
    SlotEngine::new(config).expect("single symbol config is valid")
}

fn assert_conserved(outcome: &SpinOutcome) {
    let before = outcome.before;
    let after = outcome.account;
    assert_eq!(after.total_bet, before.total_bet + outcome.stake);
    assert_eq!(after.total_win, before.total_win + outcome.total_payout);
    assert_eq!(
        after.credit,
        before.credit - outcome.stake + outcome.total_payout
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSERVATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_long_session_conserves_credit() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(0xDEE9_5EA5);
    let mut account = PlayerAccount::with_credit(50_000);
    let mut paid = 0u64;

    for _ in 0..2_000 {
        let outcome = match engine.settle_spin(&account, &mut rng) {
            Ok(outcome) => outcome,
            Err(SlotError::InsufficientFunds { .. }) => break,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_conserved(&outcome);
        assert_eq!(outcome.winning_indices.is_empty(), outcome.total_payout == 0);
        paid += outcome.total_payout;
        account = outcome.account;
    }

    assert_eq!(account.total_win, paid);
    assert_eq!(
        account.credit + account.total_bet,
        50_000 + account.total_win
    );
}

#[test]
fn test_payout_matches_line_wins() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut account = PlayerAccount::with_credit(1_000_000);

    for _ in 0..500 {
        let outcome = engine.settle_spin(&account, &mut rng).unwrap();
        let summed: u64 = outcome.line_wins.iter().map(|w| w.payout).sum();
        assert_eq!(summed, outcome.total_payout);

        let union: BTreeSet<usize> = outcome
            .line_wins
            .iter()
            .flat_map(|w| w.cells.iter().copied())
            .collect();
        assert_eq!(union, outcome.winning_indices);
        account = outcome.account;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REJECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unaffordable_spin_rejected() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let snapshot = PlayerAccount {
        credit: 99,
        total_bet: 400,
        total_win: 120,
    };

    let err = engine.settle_spin(&snapshot, &mut rng).unwrap_err();
    assert_eq!(
        err,
        SlotError::InsufficientFunds {
            credit: 99,
            stake: 100
        }
    );
    assert!(!err.is_retryable());
    // snapshot is passed by reference and copied; still untouched
    assert_eq!(snapshot.credit, 99);
}

#[test]
fn test_exact_stake_is_affordable() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let outcome = engine
        .settle_spin(&PlayerAccount::with_credit(100), &mut rng)
        .unwrap();
    assert_eq!(outcome.account.credit, outcome.total_payout);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINGLE SYMBOL CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_symbol_every_line_pays() {
    let engine = single_symbol_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let outcome = engine
        .settle_spin_with(
            &PlayerAccount::with_credit(100),
            Adjustment::uniform(1.0),
            &mut rng,
        )
        .unwrap();

    let expected: BTreeSet<usize> = standard_paylines()
        .iter()
        .flat_map(|line| line.cells.iter().copied())
        .collect();

    assert_eq!(outcome.line_wins.len(), 7);
    assert_eq!(outcome.total_payout, 700);
    assert_eq!(outcome.winning_indices, expected);
    assert_eq!(outcome.account.credit, 700);
    assert_eq!(outcome.account.total_win, 700);
}

#[test]
fn test_single_symbol_grid_is_uniform() {
    let engine = single_symbol_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    let outcome = engine
        .settle_spin(&PlayerAccount::with_credit(500), &mut rng)
        .unwrap();
    assert!(outcome.grid.cells().iter().all(|id| id == "pearl"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// OVERFLOW
// ═══════════════════════════════════════════════════════════════════════════════

fn gold_config(payout: u64) -> SlotConfig {
    SlotConfig {
        symbols: vec![Symbol::regular("gold", "Gold", "", 1.0, payout)],
        ..Default::default()
    }
}

#[test]
fn test_overflowing_payouts_refused_at_startup() {
    assert!(matches!(
        SlotEngine::new(gold_config(u64::MAX / 4)),
        Err(SlotError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_largest_accepted_payout_evaluates_without_panic() {
    let engine = SlotEngine::new(gold_config(u64::MAX / 7)).unwrap();
    let eval = engine.evaluate_grid(&Grid::filled("gold", 15)).unwrap();
    assert_eq!(eval.total_payout, (u64::MAX / 7) * 7);
}

#[test]
fn test_payout_overflowing_credit_is_refused() {
    let engine = SlotEngine::new(gold_config(u64::MAX / 8)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let snapshot = PlayerAccount::with_credit(1_000);

    // first spin fits: 900 + 7/8 of u64::MAX
    let outcome = engine
        .settle_spin_with(&snapshot, Adjustment::uniform(1.0), &mut rng)
        .unwrap();
    assert_conserved(&outcome);

    // the next full-grid payout cannot be credited on top
    let err = engine
        .settle_spin_with(&outcome.account, Adjustment::uniform(1.0), &mut rng)
        .unwrap_err();
    assert!(matches!(err, SlotError::BalanceOverflow(_)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// RTP CONTROL
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fresh_account_is_boosted() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let outcome = engine
        .settle_spin(&PlayerAccount::with_credit(1_000), &mut rng)
        .unwrap();

    assert_eq!(outcome.adjustment.regime, RtpRegime::Boost);
    assert_relative_eq!(outcome.adjustment.general, 1.4);
    assert_relative_eq!(outcome.adjustment.jackpot, 0.7);
}

#[test]
fn test_hot_account_is_suppressed() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let snapshot = PlayerAccount {
        credit: 5_000,
        total_bet: 1_000,
        total_win: 4_000,
    };
    let outcome = engine.settle_spin(&snapshot, &mut rng).unwrap();

    assert_eq!(outcome.adjustment.regime, RtpRegime::Suppress);
    assert_relative_eq!(outcome.adjustment.general, 0.6);
    assert_relative_eq!(outcome.adjustment.jackpot, 0.3);
}

#[test]
fn test_suppress_below_boost() {
    let engine = default_engine();
    let config = engine.rtp().config();
    assert!(config.suppress < config.boost);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPLAY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_replay_matches_settled_outcome() {
    let engine = default_engine();
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let mut account = PlayerAccount::with_credit(100_000);

    for _ in 0..200 {
        let outcome = engine.settle_spin(&account, &mut rng).unwrap();
        let replayed = engine.evaluate_grid(&outcome.grid).unwrap();
        assert_eq!(replayed.total_payout, outcome.total_payout);
        assert_eq!(replayed.winning_indices, outcome.winning_indices);
        account = outcome.account;
    }
}

#[test]
fn test_replay_rejects_bad_grids() {
    let engine = default_engine();

    let short = Grid::filled("fish", 10);
    assert_eq!(
        engine.evaluate_grid(&short).unwrap_err(),
        SlotError::InvalidGrid {
            expected: 15,
            actual: 10
        }
    );

    let mut ids = vec!["fish"; 15];
    ids[7] = "mermaid";
    assert!(matches!(
        engine.evaluate_grid(&Grid::from_ids(ids)),
        Err(SlotError::UnknownSymbol(id)) if id == "mermaid"
    ));
}

#[test]
fn test_custom_paylines() {
    let config = SlotConfig {
        paylines: vec![Payline::new(0, "diagonal", vec![0, 6, 12, 13, 14])],
        ..Default::default()
    };
    let engine = SlotEngine::new(config).unwrap();

    let mut ids = vec!["fish"; 15];
    ids[0] = "seven";
    ids[6] = "seven";
    ids[12] = "seven";
    ids[13] = "seven";
    ids[14] = "seven";
    let eval = engine.evaluate_grid(&Grid::from_ids(ids)).unwrap();
    assert_eq!(eval.total_payout, 150);
    assert_eq!(eval.win_count(), 1);
}
