//! Session statistics

use serde::{Deserialize, Serialize};

use crate::settlement::SpinOutcome;

/// Aggregated results over a run of spins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub losses: u64,
    /// Largest single-spin payout
    pub best_payout: u64,
    /// Spins drawn while the controller was suppressing
    pub suppressed_spins: u64,
    /// Hits per payline index
    pub line_hits: Vec<u64>,
}

impl SessionStats {
    pub fn record(&mut self, outcome: &SpinOutcome) {
        self.total_spins += 1;
        self.total_bet += outcome.stake;
        self.total_win += outcome.total_payout;

        if outcome.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.best_payout = self.best_payout.max(outcome.total_payout);

        if outcome.adjustment.regime == crate::rtp::RtpRegime::Suppress {
            self.suppressed_spins += 1;
        }

        for win in &outcome.line_wins {
            let idx = win.line_index as usize;
            if self.line_hits.len() <= idx {
                self.line_hits.resize(idx + 1, 0);
            }
            self.line_hits[idx] += 1;
        }
    }

    /// Fold another session into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.wins += other.wins;
        self.losses += other.losses;
        self.best_payout = self.best_payout.max(other.best_payout);
        self.suppressed_spins += other.suppressed_spins;

        if self.line_hits.len() < other.line_hits.len() {
            self.line_hits.resize(other.line_hits.len(), 0);
        }
        for (mine, theirs) in self.line_hits.iter_mut().zip(&other.line_hits) {
            *mine += theirs;
        }
    }

    /// Calculate RTP (ratio, not percent)
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            self.total_win as f64 / self.total_bet as f64
        } else {
            0.0
        }
    }

    /// Calculate hit rate (ratio of winning spins)
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.wins as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }
}
