//! Spin settlement state machine and outcome

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::account::PlayerAccount;
use crate::error::{SlotError, SlotResult};
use crate::grid::Grid;
use crate::paytable::{Evaluation, LineWin};
use crate::rtp::Adjustment;

/// Settlement lifecycle.
///
/// ```text
/// Idle ──commit──> Committing ──settle──> Settled
///   └────────(credit < stake)──> Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    Idle,
    Committing,
    Settled,
    Rejected,
}

/// Complete result of one settled spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Final grid
    pub grid: Grid,
    /// Line wins
    pub line_wins: Vec<LineWin>,
    /// Union of cells over all winning lines
    pub winning_indices: BTreeSet<usize>,
    /// Total credits won
    pub total_payout: u64,
    /// Stake charged
    pub stake: u64,
    /// Weight adjustment the grid was drawn with
    pub adjustment: Adjustment,
    /// Account before the spin
    pub before: PlayerAccount,
    /// Account after debit and credit
    pub account: PlayerAccount,
}

impl SpinOutcome {
    /// Check if this is a win
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }

    /// Payout minus stake
    pub fn net(&self) -> i128 {
        i128::from(self.total_payout) - i128::from(self.stake)
    }
}

/// One settlement against a snapshot.
///
/// Debit and credit are both derived from the snapshot taken at `begin`, so
/// a settlement either fully applies or is rejected before anything changes.
#[derive(Debug, Clone)]
pub struct Settlement {
    state: SettlementState,
    stake: u64,
    before: PlayerAccount,
    account: PlayerAccount,
}

impl Settlement {
    pub fn begin(snapshot: PlayerAccount, stake: u64) -> Self {
        Self {
            state: SettlementState::Idle,
            stake,
            before: snapshot,
            account: snapshot,
        }
    }

    pub fn state(&self) -> SettlementState {
        self.state
    }

    /// Snapshot the settlement started from
    pub fn before(&self) -> &PlayerAccount {
        &self.before
    }

    /// Working copy of the account
    pub fn account(&self) -> &PlayerAccount {
        &self.account
    }

    /// Debit the stake. Rejects without touching the account if the player
    /// cannot afford it.
    pub fn commit(&mut self) -> SlotResult<()> {
        self.transition(SettlementState::Idle, SettlementState::Committing)?;

        if !self.before.can_afford(self.stake) {
            self.state = SettlementState::Rejected;
            log::warn!(
                "spin rejected: credit {} < stake {}",
                self.before.credit,
                self.stake
            );
            return Err(SlotError::InsufficientFunds {
                credit: self.before.credit,
                stake: self.stake,
            });
        }

        let Some(total_bet) = self.before.total_bet.checked_add(self.stake) else {
            self.state = SettlementState::Rejected;
            return Err(SlotError::BalanceOverflow(format!(
                "total bet {} + stake {}",
                self.before.total_bet, self.stake
            )));
        };
        self.account.credit -= self.stake;
        self.account.total_bet = total_bet;
        log::debug!(
            "stake {} committed, credit {} -> {}",
            self.stake,
            self.before.credit,
            self.account.credit
        );
        Ok(())
    }

    /// Credit the payout and produce the outcome
    pub fn settle(
        mut self,
        grid: Grid,
        evaluation: Evaluation,
        adjustment: Adjustment,
    ) -> SlotResult<SpinOutcome> {
        self.transition(SettlementState::Committing, SettlementState::Settled)?;

        let payout = evaluation.total_payout;
        let (Some(credit), Some(total_win)) = (
            self.account.credit.checked_add(payout),
            self.account.total_win.checked_add(payout),
        ) else {
            return Err(SlotError::BalanceOverflow(format!(
                "payout {payout} on credit {} / total win {}",
                self.account.credit, self.account.total_win
            )));
        };
        self.account.credit = credit;
        self.account.total_win = total_win;
        log::debug!(
            "spin settled: payout {} over {} line(s), credit {}",
            evaluation.total_payout,
            evaluation.line_wins.len(),
            self.account.credit
        );

        Ok(SpinOutcome {
            grid,
            line_wins: evaluation.line_wins,
            winning_indices: evaluation.winning_indices,
            total_payout: evaluation.total_payout,
            stake: self.stake,
            adjustment,
            before: self.before,
            account: self.account,
        })
    }

    fn transition(&mut self, from: SettlementState, to: SettlementState) -> SlotResult<()> {
        if self.state != from {
            return Err(SlotError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
