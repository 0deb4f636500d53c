//! Auto-spin pacing profiles

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Player-selected auto-spin speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast mode
    Fast,
    /// Turbo mode
    Turbo,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Normal, SpeedTier::Fast, SpeedTier::Turbo];

    pub fn name(&self) -> &'static str {
        match self {
            SpeedTier::Normal => "normal",
            SpeedTier::Fast => "fast",
            SpeedTier::Turbo => "turbo",
        }
    }
}

impl std::str::FromStr for SpeedTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "1" | "1x" => Ok(SpeedTier::Normal),
            "fast" | "2" => Ok(SpeedTier::Fast),
            "turbo" | "3" => Ok(SpeedTier::Turbo),
            other => Err(format!("unknown speed tier '{other}'")),
        }
    }
}

/// Pause lengths after a spin for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDelays {
    /// Pause after a winning spin (ms), long enough to let the win register
    pub win_ms: u64,
    /// Pause after a losing spin (ms)
    pub loss_ms: u64,
}

impl TierDelays {
    pub const fn new(win_ms: u64, loss_ms: u64) -> Self {
        Self { win_ms, loss_ms }
    }
}

/// Inter-spin delays for every tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    pub normal: TierDelays,
    pub fast: TierDelays,
    pub turbo: TierDelays,
}

impl PacingConfig {
    /// Zero delays everywhere (batch runs, tests)
    pub fn instant() -> Self {
        let zero = TierDelays::new(0, 0);
        Self {
            normal: zero,
            fast: zero,
            turbo: zero,
        }
    }

    pub fn tier(&self, tier: SpeedTier) -> TierDelays {
        match tier {
            SpeedTier::Normal => self.normal,
            SpeedTier::Fast => self.fast,
            SpeedTier::Turbo => self.turbo,
        }
    }

    /// Pause before the next spin
    pub fn delay_after(&self, tier: SpeedTier, won: bool) -> Duration {
        let delays = self.tier(tier);
        Duration::from_millis(if won { delays.win_ms } else { delays.loss_ms })
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            normal: TierDelays::new(2000, 800),
            fast: TierDelays::new(800, 300),
            turbo: TierDelays::new(200, 50),
        }
    }
}
