//! Ledger collaborator interface
//!
//! The ledger owns player accounts. The engine asks it for a snapshot,
//! settles against that snapshot, and hands the proposed account back. A spin
//! only counts once `commit` succeeds.

use rand::RngCore;

use crate::account::PlayerAccount;
use crate::engine::SlotEngine;
use crate::error::SlotResult;
use crate::settlement::SpinOutcome;

pub trait Ledger {
    /// Current state of a player's account
    fn snapshot(&self, player: &str) -> SlotResult<PlayerAccount>;

    /// Replace `expected` with `next`.
    ///
    /// Must fail with `SlotError::LedgerUnavailable` and store nothing when
    /// the stored account no longer equals `expected` or the write fails.
    fn commit(
        &self,
        player: &str,
        expected: &PlayerAccount,
        next: &PlayerAccount,
    ) -> SlotResult<PlayerAccount>;

    /// Snapshot, settle and commit one spin.
    ///
    /// Implementations holding per-account locks should override this to
    /// keep the lock across all three steps.
    fn play_spin(
        &self,
        player: &str,
        engine: &SlotEngine,
        rng: &mut dyn RngCore,
    ) -> SlotResult<SpinOutcome> {
        let snapshot = self.snapshot(player)?;
        let outcome = engine.settle_spin(&snapshot, rng)?;
        self.commit(player, &snapshot, &outcome.account)?;
        Ok(outcome)
    }
}
