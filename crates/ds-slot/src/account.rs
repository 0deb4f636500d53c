//! Player account snapshot

use serde::{Deserialize, Serialize};

use crate::rtp::current_ratio;

/// Balance and lifetime totals of one player.
///
/// The ledger owns the live record; the engine only ever sees copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAccount {
    /// Current balance
    pub credit: u64,
    /// Cumulative stake
    pub total_bet: u64,
    /// Cumulative payout
    pub total_win: u64,
}

impl PlayerAccount {
    /// Fresh account with a starting balance
    pub fn with_credit(credit: u64) -> Self {
        Self {
            credit,
            ..Self::default()
        }
    }

    pub fn can_afford(&self, stake: u64) -> bool {
        self.credit >= stake
    }

    /// Lifetime return-to-player ratio, `None` before the first bet
    pub fn rtp(&self) -> Option<f64> {
        current_ratio(self.total_bet, self.total_win)
    }
}
