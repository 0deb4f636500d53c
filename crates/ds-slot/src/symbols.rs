//! Symbol definitions and the symbol catalog

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Symbol tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolTier {
    /// Regular paying symbol
    #[default]
    Regular,
    /// Jackpot symbol, sampled with an extra dampening factor
    Jackpot,
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID (e.g., "whale", "fish")
    pub id: String,
    /// Display name
    pub name: String,
    /// Display glyph
    #[serde(default)]
    pub glyph: String,
    /// Relative sampling frequency (> 0)
    pub weight: f64,
    /// Credits awarded per matching line
    pub payout: u64,
    /// Symbol tier
    #[serde(default)]
    pub tier: SymbolTier,
}

impl Symbol {
    /// Create a regular symbol
    pub fn regular(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        weight: f64,
        payout: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            glyph: glyph.into(),
            weight,
            payout,
            tier: SymbolTier::Regular,
        }
    }

    /// Create a jackpot symbol
    pub fn jackpot(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        weight: f64,
        payout: u64,
    ) -> Self {
        Self {
            tier: SymbolTier::Jackpot,
            ..Self::regular(id, name, glyph, weight, payout)
        }
    }

    /// Check if this is the jackpot tier
    pub fn is_jackpot(&self) -> bool {
        self.tier == SymbolTier::Jackpot
    }

    /// Glyph if present, otherwise the ID
    pub fn label(&self) -> &str {
        if self.glyph.is_empty() {
            &self.id
        } else {
            &self.glyph
        }
    }
}

/// Fixed, validated, ordered set of symbols
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Build a catalog, rejecting empty sets, blank or duplicate IDs and
    /// non-positive weights.
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(SlotError::config("symbol catalog is empty"));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if symbol.id.trim().is_empty() {
                return Err(SlotError::config("symbol with blank id"));
            }
            if !seen.insert(symbol.id.as_str()) {
                return Err(SlotError::config(format!(
                    "duplicate symbol id '{}'",
                    symbol.id
                )));
            }
            if !symbol.weight.is_finite() || symbol.weight <= 0.0 {
                return Err(SlotError::config(format!(
                    "symbol '{}' has non-positive weight {}",
                    symbol.id, symbol.weight
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// The deep-sea catalog the game ships with.
    /// The whale is the rarest, highest-paying symbol and sits in the jackpot tier.
    pub fn deep_sea() -> Self {
        Self {
            symbols: deep_sea_symbols(),
        }
    }

    /// Get symbol by ID
    pub fn get(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Position of a symbol in catalog order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.id == id)
    }

    /// Symbol at catalog position
    pub fn at(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Sum of base weights
    pub fn total_weight(&self) -> f64 {
        self.symbols.iter().map(|s| s.weight).sum()
    }

    /// Highest-paying symbol (first one wins ties)
    pub fn highest_payout(&self) -> Option<&Symbol> {
        self.symbols
            .iter()
            .fold(None, |best: Option<&Symbol>, s| match best {
                Some(b) if b.payout >= s.payout => Some(b),
                _ => Some(s),
            })
    }

    /// IDs of jackpot-tier symbols
    pub fn jackpot_ids(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .filter(|s| s.is_jackpot())
            .map(|s| s.id.as_str())
            .collect()
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::deep_sea()
    }
}

/// Symbol rows of the deep-sea catalog
pub fn deep_sea_symbols() -> Vec<Symbol> {
    vec![
        Symbol::jackpot("whale", "Ancient Whale", "🐳", 1.0, 250),
        Symbol::regular("shark", "Deep Hunter", "🦈", 3.0, 100),
        Symbol::regular("octopus", "Abyssal Kraken", "🐙", 5.0, 50),
        Symbol::regular("seven", "Lucky Abyss", "7️⃣", 2.0, 150),
        Symbol::regular("cherry", "Sea Berry", "🍒", 8.0, 20),
        Symbol::regular("fish", "Tropic Neon", "🐠", 10.0, 10),
    ]
}
