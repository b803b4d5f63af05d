//! Cells picked by the user for the flight.
//!
//! Insertion order is kept for display and reports; path planning sorts on
//! its own. Membership checks go through a hash set so large `[row, col]`
//! lists stay linear to build.

use crate::grid::{CellIndex, Grid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Insertion-ordered set of selected cells.
///
/// Membership is driven from outside (pointer hit-testing, config files);
/// the core only needs the indices. Serialized as a plain list; duplicates in
/// the input are dropped on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CellIndex>", into = "Vec<CellIndex>")]
pub struct Selection {
    order: Vec<CellIndex>,
    members: HashSet<CellIndex>,
}

impl From<Vec<CellIndex>> for Selection {
    fn from(cells: Vec<CellIndex>) -> Self {
        Self::from_indices(cells)
    }
}

impl From<Selection> for Vec<CellIndex> {
    fn from(sel: Selection) -> Self {
        sel.order
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from indices, dropping duplicates but keeping first-seen order.
    pub fn from_indices<I: IntoIterator<Item = CellIndex>>(indices: I) -> Self {
        let mut sel = Self::new();
        for index in indices {
            sel.insert(index);
        }
        sel
    }

    /// Every cell of the grid, row-major.
    pub fn all(grid: &Grid) -> Self {
        Self::from_indices(grid.cells().iter().map(|c| c.index))
    }

    /// Add or remove `index`. Returns `true` if it is selected afterwards.
    pub fn toggle(&mut self, index: CellIndex) -> bool {
        if self.remove(index) {
            false
        } else {
            self.insert(index)
        }
    }

    /// Returns `false` if the cell was already selected.
    pub fn insert(&mut self, index: CellIndex) -> bool {
        if !self.members.insert(index) {
            return false;
        }
        self.order.push(index);
        true
    }

    /// Returns `false` if the cell was not selected.
    pub fn remove(&mut self, index: CellIndex) -> bool {
        if !self.members.remove(&index) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&c| c == index) {
            self.order.remove(pos);
        }
        true
    }

    #[inline]
    pub fn contains(&self, index: CellIndex) -> bool {
        self.members.contains(&index)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.order.iter().copied()
    }

    /// Keep the selection for `new` only if its cells are identical to `old`.
    pub fn carry_over(self, old: &Grid, new: &Grid) -> Self {
        if old.same_cells(new) {
            self
        } else {
            if !self.is_empty() {
                log::info!("grid changed, dropping {} selected cells", self.len());
            }
            Self::new()
        }
    }
}
