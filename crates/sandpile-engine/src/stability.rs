//! Stability tracking.
//!
//! [`CriticalCounter`] keeps an exact count of critical cells so that
//! [`Sandpile::stable()`](crate::Sandpile::stable) is O(1). It is owned by
//! the [`GridStore`](crate::GridStore) and updated on every value
//! transition, including the initial fill. The scan functions are the
//! reference the counter is checked against.

use sandpile_core::{is_critical, Grain};

/// Incrementally maintained number of cells at or above the threshold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalCounter {
    critical: usize,
}

impl CriticalCounter {
    /// Count the critical cells of an existing field.
    pub fn from_cells(cells: &[Grain]) -> Self {
        Self {
            critical: scan_critical(cells),
        }
    }

    /// Record a single cell changing from `old` to `new`.
    #[inline]
    pub fn transition(&mut self, old: Grain, new: Grain) {
        match (is_critical(old), is_critical(new)) {
            (false, true) => self.critical += 1,
            (true, false) => self.critical -= 1,
            _ => {}
        }
    }

    /// Number of critical cells.
    pub fn count(&self) -> usize {
        self.critical
    }

    /// `true` iff no cell is critical.
    pub fn is_stable(&self) -> bool {
        self.critical == 0
    }
}

/// Number of critical cells, by full scan.
pub fn scan_critical(cells: &[Grain]) -> usize {
    cells.iter().filter(|&&v| is_critical(v)).count()
}

/// `true` iff a full scan finds no critical cell.
pub fn scan_stable(cells: &[Grain]) -> bool {
    !cells.iter().any(|&v| is_critical(v))
}
