//! Return-to-player feedback control
//!
//! The controller reads the player's trailing totals and picks the weight
//! multiplier for the next spin. It is a two-state step function keyed on the
//! sign of `ratio - target`: above target the pool is suppressed, otherwise
//! boosted. There is no deadband, so the realised ratio oscillates around the
//! target instead of settling on it.

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::Symbol;

/// Default target return-to-player ratio
pub const DEFAULT_TARGET_RTP: f64 = 1.0;
/// Default multiplier while the player is above target
pub const DEFAULT_SUPPRESS: f64 = 0.6;
/// Default multiplier while the player is at or below target
pub const DEFAULT_BOOST: f64 = 1.4;
/// Default extra factor applied to jackpot-tier symbols
pub const DEFAULT_JACKPOT_DAMPING: f64 = 0.5;

/// RTP controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RtpConfig {
    /// Target payout ratio (total win / total bet)
    pub target: f64,
    /// Multiplier applied when the ratio is above target (< 1)
    pub suppress: f64,
    /// Multiplier applied when the ratio is at or below target (> 1)
    pub boost: f64,
    /// Further factor applied on top of the general multiplier for jackpot-tier symbols
    pub jackpot_damping: f64,
}

impl RtpConfig {
    pub fn validate(&self) -> SlotResult<()> {
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(SlotError::config(format!(
                "target RTP must be positive, got {}",
                self.target
            )));
        }
        for (name, value) in [
            ("suppress", self.suppress),
            ("boost", self.boost),
            ("jackpot_damping", self.jackpot_damping),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SlotError::config(format!(
                    "{name} multiplier must be positive, got {value}"
                )));
            }
        }
        if self.suppress >= self.boost {
            return Err(SlotError::config(format!(
                "suppress ({}) must be below boost ({})",
                self.suppress, self.boost
            )));
        }
        Ok(())
    }
}

impl Default for RtpConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_RTP,
            suppress: DEFAULT_SUPPRESS,
            boost: DEFAULT_BOOST,
            jackpot_damping: DEFAULT_JACKPOT_DAMPING,
        }
    }
}

/// Which side of the step function fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RtpRegime {
    /// Player is above target; win frequency reduced
    Suppress,
    /// Player is at or below target (or has no history); win frequency increased
    Boost,
}

/// Weight adjustment for one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub regime: RtpRegime,
    /// Multiplier for regular symbols
    pub general: f64,
    /// Multiplier for jackpot-tier symbols
    pub jackpot: f64,
}

impl Adjustment {
    /// Flat multiplier for every symbol, jackpot tier included
    pub fn uniform(multiplier: f64) -> Self {
        Self {
            regime: if multiplier < 1.0 {
                RtpRegime::Suppress
            } else {
                RtpRegime::Boost
            },
            general: multiplier,
            jackpot: multiplier,
        }
    }

    /// Multiplier that applies to a given symbol
    pub fn factor_for(&self, symbol: &Symbol) -> f64 {
        if symbol.is_jackpot() {
            self.jackpot
        } else {
            self.general
        }
    }

    /// Effective sampling weight of a symbol
    pub fn effective_weight(&self, symbol: &Symbol) -> f64 {
        symbol.weight * self.factor_for(symbol)
    }
}

/// Step-function RTP controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtpController {
    config: RtpConfig,
}

impl RtpController {
    pub fn new(config: RtpConfig) -> SlotResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RtpConfig {
        &self.config
    }

    pub fn target(&self) -> f64 {
        self.config.target
    }

    /// Multiplier for the next spin given the trailing totals.
    ///
    /// `total_bet == 0` has no ratio and counts as under target.
    pub fn compute_adjustment(&self, total_bet: u64, total_win: u64) -> Adjustment {
        let regime = match current_ratio(total_bet, total_win) {
            Some(ratio) if ratio > self.config.target => RtpRegime::Suppress,
            _ => RtpRegime::Boost,
        };

        let general = match regime {
            RtpRegime::Suppress => self.config.suppress,
            RtpRegime::Boost => self.config.boost,
        };

        Adjustment {
            regime,
            general,
            jackpot: general * self.config.jackpot_damping,
        }
    }
}

impl Default for RtpController {
    fn default() -> Self {
        Self {
            config: RtpConfig::default(),
        }
    }
}

/// `total_win / total_bet`, or `None` with no bets yet
pub fn current_ratio(total_bet: u64, total_win: u64) -> Option<f64> {
    if total_bet == 0 {
        None
    } else {
        Some(total_win as f64 / total_bet as f64)
    }
}
