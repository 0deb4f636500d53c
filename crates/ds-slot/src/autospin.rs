//! Auto-spin sequencing
//!
//! Repeats ledger-backed spins for one player, pausing between them according
//! to the speed tier and whether the last spin won. Cancellation is honoured
//! only between spins, never in the middle of a settlement.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::RngCore;
use serde::Serialize;

use crate::engine::SlotEngine;
use crate::error::SlotError;
use crate::ledger::Ledger;
use crate::settlement::SpinOutcome;
use crate::stats::SessionStats;
use crate::timing::SpeedTier;

/// Granularity used by [`ThreadPacer`] when watching for cancellation
const PAUSE_SLICE: Duration = Duration::from_millis(25);

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the handle can drive another run
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Waits between spins
pub trait Pacer {
    fn pause(&mut self, duration: Duration, abort: &AbortHandle);
}

/// Sleeps the current thread, waking early on abort
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration, abort: &AbortHandle) {
        let deadline = Instant::now() + duration;
        loop {
            if abort.is_aborted() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            std::thread::sleep(PAUSE_SLICE.min(deadline - now));
        }
    }
}

/// Skips every pause, recording what would have been waited
#[derive(Debug, Clone, Default)]
pub struct NoDelay {
    pub skipped: Vec<Duration>,
}

impl Pacer for NoDelay {
    fn pause(&mut self, duration: Duration, _abort: &AbortHandle) {
        self.skipped.push(duration);
    }
}

/// Why a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum StopReason {
    Completed,
    InsufficientFunds { credit: u64, stake: u64 },
    Aborted,
    /// Ledger or engine failure; the failed spin did not happen
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AutoSpinReport {
    pub requested: u32,
    pub stats: SessionStats,
    pub stop: StopReason,
}

impl AutoSpinReport {
    pub fn spins_played(&self) -> u64 {
        self.stats.total_spins
    }
}

/// Drives repeated spins for one player
pub struct AutoSpinSequencer<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
    engine: &'a SlotEngine,
    abort: AbortHandle,
}

impl<'a, L: Ledger + ?Sized> AutoSpinSequencer<'a, L> {
    pub fn new(ledger: &'a L, engine: &'a SlotEngine) -> Self {
        Self {
            ledger,
            engine,
            abort: AbortHandle::new(),
        }
    }

    /// Handle another thread can use to stop the run
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Play up to `spins` spins, calling `on_spin` after each settled one
    pub fn run<P, F>(
        &self,
        player: &str,
        spins: u32,
        speed: SpeedTier,
        rng: &mut dyn RngCore,
        pacer: &mut P,
        mut on_spin: F,
    ) -> AutoSpinReport
    where
        P: Pacer + ?Sized,
        F: FnMut(&SpinOutcome),
    {
        log::info!("auto-spin for {player}: {spins} spins at {} speed", speed.name());

        let mut stats = SessionStats::default();
        let mut stop = StopReason::Completed;

        for n in 0..spins {
            if self.abort.is_aborted() {
                stop = StopReason::Aborted;
                break;
            }

            let outcome = match self.ledger.play_spin(player, self.engine, rng) {
                Ok(outcome) => outcome,
                Err(SlotError::InsufficientFunds { credit, stake }) => {
                    stop = StopReason::InsufficientFunds { credit, stake };
                    break;
                }
                Err(e) => {
                    log::error!("auto-spin for {player} halted: {e}");
                    stop = StopReason::Failed {
                        message: e.to_string(),
                    };
                    break;
                }
            };

            stats.record(&outcome);
            on_spin(&outcome);

            if n + 1 < spins {
                let delay = self
                    .engine
                    .pacing()
                    .delay_after(speed, outcome.is_win());
                pacer.pause(delay, &self.abort);
            }
        }

        log::info!(
            "auto-spin for {player} stopped after {} spins: {:?}",
            stats.total_spins,
            stop
        );

        AutoSpinReport {
            requested: spins,
            stats,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::PlayerAccount;
    use crate::config::SlotConfig;
    use crate::error::SlotResult;
    use crate::symbols::Symbol;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::{Cell, RefCell};

    struct OneAccount {
        account: RefCell<PlayerAccount>,
        fail_after: Cell<Option<u32>>,
    }

    impl OneAccount {
        fn with_credit(credit: u64) -> Self {
            Self {
                account: RefCell::new(PlayerAccount::with_credit(credit)),
                fail_after: Cell::new(None),
            }
        }
    }

    impl Ledger for OneAccount {
        fn snapshot(&self, _player: &str) -> SlotResult<PlayerAccount> {
            Ok(*self.account.borrow())
        }

        fn commit(
            &self,
            _player: &str,
            expected: &PlayerAccount,
            next: &PlayerAccount,
        ) -> SlotResult<PlayerAccount> {
            if let Some(left) = self.fail_after.get() {
                if left == 0 {
                    return Err(SlotError::LedgerUnavailable("disk full".into()));
                }
                self.fail_after.set(Some(left - 1));
            }
            let mut stored = self.account.borrow_mut();
            if *stored != *expected {
                return Err(SlotError::LedgerUnavailable("stale snapshot".into()));
            }
            *stored = *next;
            Ok(*next)
        }
    }

    fn engine() -> SlotEngine {
        SlotEngine::new(SlotConfig::default()).unwrap()
    }

    #[test]
    fn test_runs_requested_spins() {
        let engine = engine();
        let ledger = OneAccount::with_credit(1_000_000);
        let sequencer = AutoSpinSequencer::new(&ledger, &engine);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pacer = NoDelay::default();
        let mut seen = 0;

        let report = sequencer.run("p", 20, SpeedTier::Turbo, &mut rng, &mut pacer, |_| {
            seen += 1
        });

        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(report.spins_played(), 20);
        assert_eq!(seen, 20);
        // no pause after the final spin
        assert_eq!(pacer.skipped.len(), 19);
        assert!(
            pacer
                .skipped
                .iter()
                .all(|d| *d == Duration::from_millis(200) || *d == Duration::from_millis(50))
        );
        assert_eq!(ledger.account.borrow().total_bet, 2000);
    }

    #[test]
    fn test_pause_follows_last_spin_result() {
        // pearl lines hit often, but not every spin
        let config = SlotConfig {
            symbols: vec![
                Symbol::regular("pearl", "Pearl", "", 9.0, 5),
                Symbol::regular("rock", "Rock", "", 1.0, 0),
            ],
            ..Default::default()
        };
        let engine = SlotEngine::new(config).unwrap();
        let ledger = OneAccount::with_credit(1_000_000);
        let sequencer = AutoSpinSequencer::new(&ledger, &engine);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for tier in SpeedTier::ALL {
            let delays = engine.pacing().tier(tier);
            let mut pacer = NoDelay::default();
            let mut won = Vec::new();

            let report = sequencer.run("p", 200, tier, &mut rng, &mut pacer, |outcome| {
                won.push(outcome.is_win())
            });
            assert_eq!(report.stop, StopReason::Completed);
            assert!(won.contains(&true) && won.contains(&false));
            assert_eq!(pacer.skipped.len(), won.len() - 1);

            for (&win, &pause) in won.iter().zip(&pacer.skipped) {
                let expected = if win { delays.win_ms } else { delays.loss_ms };
                assert_eq!(pause, Duration::from_millis(expected), "{tier:?} win={win}");
            }
        }
    }

    #[test]
    fn test_stops_when_credit_runs_out() {
        let mut config = SlotConfig::default();
        for symbol in &mut config.symbols {
            symbol.payout = 0;
        }
        let engine = SlotEngine::new(config).unwrap();
        let ledger = OneAccount::with_credit(250);
        let sequencer = AutoSpinSequencer::new(&ledger, &engine);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = sequencer.run(
            "p",
            10,
            SpeedTier::Normal,
            &mut rng,
            &mut NoDelay::default(),
            |_| {},
        );

        assert_eq!(
            report.stop,
            StopReason::InsufficientFunds {
                credit: 50,
                stake: 100
            }
        );
        assert_eq!(report.spins_played(), 2);
        assert_eq!(ledger.account.borrow().credit, 50);
    }

    #[test]
    fn test_abort_checked_before_each_spin() {
        let engine = engine();
        let ledger = OneAccount::with_credit(10_000);
        let sequencer = AutoSpinSequencer::new(&ledger, &engine);
        let handle = sequencer.abort_handle();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let report = sequencer.run("p", 50, SpeedTier::Fast, &mut rng, &mut NoDelay::default(), |_| {
            handle.abort()
        });

        assert_eq!(report.stop, StopReason::Aborted);
        assert_eq!(report.spins_played(), 1);
    }

    #[test]
    fn test_ledger_failure_leaves_account() {
        let engine = engine();
        let ledger = OneAccount::with_credit(10_000);
        ledger.fail_after.set(Some(3));
        let sequencer = AutoSpinSequencer::new(&ledger, &engine);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let report = sequencer.run("p", 10, SpeedTier::Fast, &mut rng, &mut NoDelay::default(), |_| {});

        assert!(matches!(report.stop, StopReason::Failed { .. }));
        assert_eq!(report.spins_played(), 3);
        assert_eq!(ledger.account.borrow().total_bet, 300);
    }

    #[test]
    fn test_thread_pacer_wakes_on_abort() {
        let abort = AbortHandle::new();
        abort.abort();
        let start = Instant::now();
        ThreadPacer.pause(Duration::from_secs(5), &abort);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
