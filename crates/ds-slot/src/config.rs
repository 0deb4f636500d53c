//! Slot engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::grid::GRID_CELLS;
use crate::paytable::{PayTable, Payline, standard_paylines};
use crate::rtp::RtpConfig;
use crate::symbols::{Symbol, SymbolCatalog, deep_sea_symbols};
use crate::timing::PacingConfig;

/// Credits charged per spin
pub const DEFAULT_STAKE: u64 = 100;

/// Complete engine configuration, fixed at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Credits charged per spin
    pub stake: u64,
    /// Cells per grid
    pub cell_count: usize,
    /// Symbol catalog in order
    pub symbols: Vec<Symbol>,
    /// Payline table
    pub paylines: Vec<Payline>,
    /// RTP controller settings
    pub rtp: RtpConfig,
    /// Auto-spin pacing
    pub pacing: PacingConfig,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            stake: DEFAULT_STAKE,
            cell_count: GRID_CELLS,
            symbols: deep_sea_symbols(),
            paylines: standard_paylines(),
            rtp: RtpConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl SlotConfig {
    /// Check everything an engine needs before it may start
    pub fn validate(&self) -> SlotResult<()> {
        if self.stake == 0 {
            return Err(SlotError::config("stake must be positive"));
        }
        if self.cell_count == 0 {
            return Err(SlotError::config("grid must have at least one cell"));
        }
        let catalog = SymbolCatalog::new(self.symbols.clone())?;
        let paytable = PayTable::new(self.paylines.clone(), self.cell_count)?;
        if paytable.max_payout(&catalog).is_none() {
            return Err(SlotError::config(
                "symbol payouts overflow when every payline wins",
            ));
        }
        self.rtp.validate()
    }

    /// Parse JSON
    pub fn from_json_str(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(SlotError::config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> SlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> SlotResult<String> {
        Ok(serde_yml::to_string(self)?)
    }
}
