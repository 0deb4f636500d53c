//! Symbol grid and grid generation

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::rtp::Adjustment;
use crate::sampler::WeightedSampler;
use crate::symbols::SymbolCatalog;

/// Visible rows
pub const GRID_ROWS: usize = 3;
/// Reels (columns)
pub const GRID_REELS: usize = 5;
/// Total cells; cell index = row * GRID_REELS + reel
pub const GRID_CELLS: usize = GRID_ROWS * GRID_REELS;

/// Row-major grid of symbol IDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<String>,
}

impl Grid {
    /// Grid from symbol IDs, e.g. for replaying a recorded outcome
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Grid with every cell holding the same symbol
    pub fn filled(id: &str, cell_count: usize) -> Self {
        Self {
            cells: vec![id.to_string(); cell_count],
        }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows of `GRID_REELS` cells
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(GRID_REELS)
    }

    /// Check cell count and that every ID exists in the catalog
    pub fn validate(&self, catalog: &SymbolCatalog, expected_cells: usize) -> SlotResult<()> {
        if self.cells.len() != expected_cells {
            return Err(SlotError::InvalidGrid {
                expected: expected_cells,
                actual: self.cells.len(),
            });
        }
        match self.cells.iter().find(|id| catalog.get(id).is_none()) {
            Some(unknown) => Err(SlotError::UnknownSymbol(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Render with catalog glyphs, one row per line
    pub fn render(&self, catalog: &SymbolCatalog) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|id| catalog.get(id).map_or(id.as_str(), |s| s.label()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// Fills a grid by independent weighted draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGenerator {
    cell_count: usize,
}

impl GridGenerator {
    pub fn new(cell_count: usize) -> Self {
        Self { cell_count }
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Draw every cell with the same adjustment. Cells are independent.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        catalog: &SymbolCatalog,
        adjustment: &Adjustment,
        rng: &mut R,
    ) -> SlotResult<Grid> {
        let sampler = WeightedSampler::new(catalog, adjustment)?;
        Ok(self.generate_with(&sampler, rng))
    }

    /// Draw every cell from an already built sampler
    pub fn generate_with<R: Rng + ?Sized>(&self, sampler: &WeightedSampler<'_>, rng: &mut R) -> Grid {
        let cells = (0..self.cell_count)
            .map(|_| sampler.draw(rng).id.clone())
            .collect();
        Grid { cells }
    }
}

impl Default for GridGenerator {
    fn default() -> Self {
        Self::new(GRID_CELLS)
    }
}
