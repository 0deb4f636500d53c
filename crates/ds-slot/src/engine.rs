//! Spin engine entry points

use rand::Rng;

use crate::account::PlayerAccount;
use crate::config::SlotConfig;
use crate::error::SlotResult;
use crate::grid::{Grid, GridGenerator};
use crate::paytable::{Evaluation, PayTable};
use crate::rtp::{Adjustment, RtpController};
use crate::settlement::{Settlement, SpinOutcome};
use crate::symbols::SymbolCatalog;
use crate::timing::PacingConfig;

/// Spin-outcome engine.
///
/// Holds only read-only configuration. Every call works on the account
/// snapshot it is given and returns the proposed next state; persisting it
/// and serializing spins per account is the ledger's job.
#[derive(Debug, Clone)]
pub struct SlotEngine {
    catalog: SymbolCatalog,
    paytable: PayTable,
    rtp: RtpController,
    generator: GridGenerator,
    stake: u64,
    pacing: PacingConfig,
}

impl SlotEngine {
    /// Build an engine. Invalid configuration is refused here and nowhere else.
    pub fn new(config: SlotConfig) -> SlotResult<Self> {
        config.validate()?;

        let engine = Self {
            catalog: SymbolCatalog::new(config.symbols)?,
            paytable: PayTable::new(config.paylines, config.cell_count)?,
            rtp: RtpController::new(config.rtp)?,
            generator: GridGenerator::new(config.cell_count),
            stake: config.stake,
            pacing: config.pacing,
        };

        log::info!(
            "slot engine ready: {} symbols, {} paylines, stake {}, target RTP {:.3}",
            engine.catalog.len(),
            engine.paytable.paylines().len(),
            engine.stake,
            engine.rtp.target()
        );
        Ok(engine)
    }

    /// Settle one spin against an account snapshot.
    ///
    /// The weight adjustment is read from the snapshot's totals before this
    /// spin's stake is added. Unaffordable spins fail with
    /// `SlotError::InsufficientFunds` and change nothing.
    pub fn settle_spin<R: Rng + ?Sized>(
        &self,
        snapshot: &PlayerAccount,
        rng: &mut R,
    ) -> SlotResult<SpinOutcome> {
        let adjustment = self
            .rtp
            .compute_adjustment(snapshot.total_bet, snapshot.total_win);
        self.settle_spin_with(snapshot, adjustment, rng)
    }

    /// Settle with an explicit adjustment instead of the controller's
    pub fn settle_spin_with<R: Rng + ?Sized>(
        &self,
        snapshot: &PlayerAccount,
        adjustment: Adjustment,
        rng: &mut R,
    ) -> SlotResult<SpinOutcome> {
        let mut settlement = Settlement::begin(*snapshot, self.stake);
        settlement.commit()?;

        log::debug!(
            "drawing grid with {:?} multiplier {:.2} (jackpot {:.2})",
            adjustment.regime,
            adjustment.general,
            adjustment.jackpot
        );
        let grid = self.generator.generate(&self.catalog, &adjustment, rng)?;
        let evaluation = self.paytable.evaluate(&grid, &self.catalog);

        settlement.settle(grid, evaluation, adjustment)
    }

    /// Score a grid, e.g. to replay a recorded outcome
    pub fn evaluate_grid(&self, grid: &Grid) -> SlotResult<Evaluation> {
        grid.validate(&self.catalog, self.generator.cell_count())?;
        Ok(self.paytable.evaluate(grid, &self.catalog))
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn rtp(&self) -> &RtpController {
        &self.rtp
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub fn cell_count(&self) -> usize {
        self.generator.cell_count()
    }
}
