//! Paylines and win evaluation

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::grid::{GRID_CELLS, GRID_REELS, Grid};
use crate::symbols::SymbolCatalog;

/// Cells per payline
pub const LINE_LENGTH: usize = GRID_REELS;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Grid cell indices, one per reel
    pub cells: Vec<usize>,
}

impl Payline {
    pub fn new(index: u8, name: impl Into<String>, cells: Vec<usize>) -> Self {
        Self {
            index,
            name: name.into(),
            cells,
        }
    }

    /// Straight line across one row
    pub fn row(index: u8, row: usize) -> Self {
        let start = row * GRID_REELS;
        Self::new(index, format!("Row {}", row + 1), (start..start + GRID_REELS).collect())
    }

    /// Exactly LINE_LENGTH distinct cells inside the grid
    pub fn validate(&self, cell_count: usize) -> SlotResult<()> {
        if self.cells.len() != LINE_LENGTH {
            return Err(SlotError::config(format!(
                "payline {} has {} cells, expected {}",
                self.index,
                self.cells.len(),
                LINE_LENGTH
            )));
        }
        if let Some(&cell) = self.cells.iter().find(|&&c| c >= cell_count) {
            return Err(SlotError::config(format!(
                "payline {} references cell {} outside [0, {})",
                self.index, cell, cell_count
            )));
        }
        let distinct: HashSet<_> = self.cells.iter().collect();
        if distinct.len() != self.cells.len() {
            return Err(SlotError::config(format!(
                "payline {} repeats a cell",
                self.index
            )));
        }
        Ok(())
    }
}

/// The seven lines of the 5×3 game: three rows, V, inverted V, dip and hill
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        Payline::row(0, 0),
        Payline::row(1, 1),
        Payline::row(2, 2),
        Payline::new(3, "V", vec![0, 6, 12, 8, 4]),
        Payline::new(4, "Inverted V", vec![10, 6, 2, 8, 14]),
        Payline::new(5, "Dip", vec![0, 1, 7, 3, 4]),
        Payline::new(6, "Hill", vec![10, 11, 7, 13, 14]),
    ]
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index
    pub line_index: u8,
    /// Winning symbol ID
    pub symbol_id: String,
    /// Credits paid by this line
    pub payout: u64,
    /// Cells of the line
    pub cells: Vec<usize>,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Line wins in payline order
    pub line_wins: Vec<LineWin>,
    /// Union of cells over all winning lines
    pub winning_indices: BTreeSet<usize>,
    /// Sum of line payouts
    pub total_payout: u64,
}

impl Evaluation {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }

    pub fn win_count(&self) -> usize {
        self.line_wins.len()
    }
}

/// Validated payline table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayTable {
    paylines: Vec<Payline>,
    cell_count: usize,
}

impl PayTable {
    pub fn new(paylines: Vec<Payline>, cell_count: usize) -> SlotResult<Self> {
        if paylines.is_empty() {
            return Err(SlotError::config("payline table is empty"));
        }
        for line in &paylines {
            line.validate(cell_count)?;
        }
        Ok(Self {
            paylines,
            cell_count,
        })
    }

    /// Seven-line table over the 15-cell grid
    pub fn standard() -> Self {
        Self {
            paylines: standard_paylines(),
            cell_count: GRID_CELLS,
        }
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Largest payout a single grid can produce, `None` if it overflows `u64`
    pub fn max_payout(&self, catalog: &SymbolCatalog) -> Option<u64> {
        let best = catalog.highest_payout().map_or(0, |s| s.payout);
        best.checked_mul(self.paylines.len() as u64)
    }

    /// Score a grid.
    ///
    /// A line wins when all of its cells hold the same symbol ID. Every
    /// winning line pays its symbol's payout in full, so overlapping lines
    /// pay the same cells more than once. Lines whose symbol pays nothing are
    /// not reported. Cells missing from the grid never match.
    pub fn evaluate(&self, grid: &Grid, catalog: &SymbolCatalog) -> Evaluation {
        let mut eval = Evaluation::default();

        for line in &self.paylines {
            let Some(win) = self.evaluate_line(grid, line, catalog) else {
                continue;
            };
            // cannot saturate for tables that pass `max_payout`
            eval.total_payout = eval.total_payout.saturating_add(win.payout);
            eval.winning_indices.extend(win.cells.iter().copied());
            eval.line_wins.push(win);
        }

        eval
    }

    fn evaluate_line(&self, grid: &Grid, line: &Payline, catalog: &SymbolCatalog) -> Option<LineWin> {
        let (&first, rest) = line.cells.split_first()?;
        let symbol_id = grid.cell(first)?;

        for &cell in rest {
            if grid.cell(cell)? != symbol_id {
                return None;
            }
        }

        let symbol = catalog.get(symbol_id)?;
        if symbol.payout == 0 {
            return None;
        }

        Some(LineWin {
            line_index: line.index,
            symbol_id: symbol.id.clone(),
            payout: symbol.payout,
            cells: line.cells.clone(),
        })
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}
