//! Weighted symbol sampling

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::{SlotError, SlotResult};
use crate::rtp::Adjustment;
use crate::symbols::{Symbol, SymbolCatalog};

/// Draws symbols proportionally to their effective weight.
///
/// Effective weights are kept as `f64` and sampled through a cumulative
/// weight table, so fractional weights are never truncated.
#[derive(Debug, Clone)]
pub struct WeightedSampler<'a> {
    catalog: &'a SymbolCatalog,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<'a> WeightedSampler<'a> {
    /// Build a sampler for one spin's adjustment
    pub fn new(catalog: &'a SymbolCatalog, adjustment: &Adjustment) -> SlotResult<Self> {
        let mut weights = Vec::with_capacity(catalog.len());
        for symbol in catalog.iter() {
            let weight = adjustment.effective_weight(symbol);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(SlotError::config(format!(
                    "effective weight of '{}' is not positive ({})",
                    symbol.id, weight
                )));
            }
            weights.push(weight);
        }

        let index = WeightedIndex::new(weights.iter().copied())
            .map_err(|e| SlotError::config(format!("weight table rejected: {e}")))?;

        Ok(Self {
            catalog,
            weights,
            index,
        })
    }

    /// Draw one symbol
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a Symbol {
        &self.catalog.symbols()[self.draw_index(rng)]
    }

    /// Draw one catalog position
    pub fn draw_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }

    /// Effective weights in catalog order
    pub fn effective_weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Probability of drawing a given symbol
    pub fn probability(&self, id: &str) -> Option<f64> {
        let idx = self.catalog.index_of(id)?;
        Some(self.weights[idx] / self.total_weight())
    }

    pub fn catalog(&self) -> &'a SymbolCatalog {
        self.catalog
    }
}

/// One-shot draw without keeping the sampler around
pub fn draw<'a, R: Rng + ?Sized>(
    catalog: &'a SymbolCatalog,
    adjustment: &Adjustment,
    rng: &mut R,
) -> SlotResult<&'a Symbol> {
    Ok(WeightedSampler::new(catalog, adjustment)?.draw(rng))
}
