//! Grid store: the flat row-major grain field and its geometry.
//!
//! [`GridStore`] exclusively owns the cell buffer. Readers get either a
//! borrowed slice ([`cells()`](GridStore::cells)) or an owned copy
//! ([`read_all()`](GridStore::read_all)). Mutation is crate-private and
//! funnels through a handful of methods that keep the critical-cell
//! counter and the running mass total exact.
//!
//! # Capacity
//!
//! The total mass is tracked as a `u64` and capped at `u32::MAX`. No cell
//! can ever hold more grains than the whole grid, so keeping the total
//! within `u32` rules out per-cell overflow during any cascade.

use sandpile_core::{Grain, GridError, THRESHOLD};

use crate::stability::CriticalCounter;

/// Largest total grain mass a grid may hold.
pub const MAX_TOTAL_GRAINS: u64 = u32::MAX as u64;

/// Initial contents of a new (or reset) grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FillPolicy {
    /// Every cell starts empty.
    #[default]
    Zero,
    /// Caller-supplied row-major values, exactly one per cell.
    Seeded(Vec<Grain>),
}

impl FillPolicy {
    /// Materialise the fill for a grid of `len` cells.
    pub(crate) fn into_cells(self, len: usize) -> Result<Vec<Grain>, GridError> {
        match self {
            Self::Zero => Ok(vec![0; len]),
            Self::Seeded(values) => {
                if values.len() != len {
                    return Err(GridError::SeedLengthMismatch {
                        expected: len,
                        actual: values.len(),
                    });
                }
                Ok(values)
            }
        }
    }

    /// Check the fill against a grid of `len` cells without building it.
    pub(crate) fn validate(&self, len: usize) -> Result<(), GridError> {
        if let Self::Seeded(values) = self {
            if values.len() != len {
                return Err(GridError::SeedLengthMismatch {
                    expected: len,
                    actual: values.len(),
                });
            }
            total_mass(values)?;
        }
        Ok(())
    }
}

/// Validate dimensions and return the cell count.
pub(crate) fn checked_area(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 {
        return Err(GridError::InvalidDimension {
            name: "width",
            value: width,
        });
    }
    if height == 0 {
        return Err(GridError::InvalidDimension {
            name: "height",
            value: height,
        });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::InvalidDimension {
            name: "cells",
            value: usize::MAX,
        })
}

/// Sum of `cells`, rejecting totals above [`MAX_TOTAL_GRAINS`].
fn total_mass(cells: &[Grain]) -> Result<u64, GridError> {
    let total: u64 = cells.iter().map(|&v| u64::from(v)).sum();
    if total > MAX_TOTAL_GRAINS {
        return Err(GridError::CapacityExceeded { total });
    }
    Ok(total)
}

/// Owner of the grain field.
///
/// Cell `(row, col)` lives at `row * width + col`, with
/// `0 <= row < height` and `0 <= col < width`. Dimensions are fixed at
/// construction.
#[derive(Clone, Debug)]
pub struct GridStore {
    width: usize,
    height: usize,
    cells: Vec<Grain>,
    critical: CriticalCounter,
    total: u64,
}

impl GridStore {
    /// Create a `width x height` grid with the given initial fill.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidDimension`] if either dimension is zero.
    /// - [`GridError::SeedLengthMismatch`] if a seeded fill has the wrong length.
    /// - [`GridError::CapacityExceeded`] if the seeded mass exceeds
    ///   [`MAX_TOTAL_GRAINS`].
    pub fn new(width: usize, height: usize, fill: FillPolicy) -> Result<Self, GridError> {
        let len = checked_area(width, height)?;
        let cells = fill.into_cells(len)?;
        let total = total_mass(&cells)?;
        Ok(Self {
            width,
            height,
            critical: CriticalCounter::from_cells(&cells),
            cells,
            total,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `width * height`.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Read-only row-major view of every cell.
    pub fn cells(&self) -> &[Grain] {
        &self.cells
    }

    /// Owned row-major copy of every cell.
    pub fn read_all(&self) -> Vec<Grain> {
        self.cells.clone()
    }

    /// Flat index of `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] if the coordinate is outside the grid.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + col)
    }

    /// Grains at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Grain, GridError> {
        let idx = self.index_of(row, col)?;
        Ok(self.cells[idx])
    }

    /// Number of critical cells.
    pub fn critical_count(&self) -> usize {
        self.critical.count()
    }

    /// `true` iff every cell is below the threshold.
    pub fn is_stable(&self) -> bool {
        self.critical.is_stable()
    }

    /// Total grains on the grid.
    pub fn total_grains(&self) -> u64 {
        self.total
    }

    /// Grains at flat index `idx`.
    #[inline]
    pub(crate) fn value_at(&self, idx: usize) -> Grain {
        self.cells[idx]
    }

    /// Fail if adding `delta` grains would exceed [`MAX_TOTAL_GRAINS`].
    pub(crate) fn check_capacity(&self, delta: Grain) -> Result<(), GridError> {
        let total = self.total + u64::from(delta);
        if total > MAX_TOTAL_GRAINS {
            return Err(GridError::CapacityExceeded { total });
        }
        Ok(())
    }

    /// Add `delta` grains to `(row, col)` and return the cell's flat index.
    ///
    /// Validates bounds and capacity before mutating.
    pub(crate) fn add(&mut self, row: usize, col: usize, delta: Grain) -> Result<usize, GridError> {
        let idx = self.index_of(row, col)?;
        self.check_capacity(delta)?;
        self.add_at(idx, delta);
        Ok(idx)
    }

    /// Overwrite `(row, col)` with `value`.
    ///
    /// Validates bounds and capacity before mutating.
    #[allow(dead_code)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Grain) -> Result<(), GridError> {
        let idx = self.index_of(row, col)?;
        let total = self.total - u64::from(self.cells[idx]) + u64::from(value);
        if total > MAX_TOTAL_GRAINS {
            return Err(GridError::CapacityExceeded { total });
        }
        self.set_at(idx, value);
        Ok(())
    }

    /// Add `delta` grains at `idx` and return the new value.
    ///
    /// Callers must have checked capacity.
    #[inline]
    pub(crate) fn add_at(&mut self, idx: usize, delta: Grain) -> Grain {
        let old = self.cells[idx];
        let new = old + delta;
        self.cells[idx] = new;
        self.critical.transition(old, new);
        self.total += u64::from(delta);
        new
    }

    #[inline]
    fn set_at(&mut self, idx: usize, value: Grain) {
        let old = self.cells[idx];
        self.cells[idx] = value;
        self.critical.transition(old, value);
        self.total = self.total - u64::from(old) + u64::from(value);
    }

    /// Remove one threshold's worth of grains from a critical cell and
    /// return the remainder. The caller redistributes them.
    #[inline]
    pub(crate) fn take_threshold(&mut self, idx: usize) -> Grain {
        let old = self.cells[idx];
        debug_assert!(old >= THRESHOLD, "toppling non-critical cell {idx}");
        let new = old - THRESHOLD;
        self.cells[idx] = new;
        self.critical.transition(old, new);
        self.total -= u64::from(THRESHOLD);
        new
    }

    /// Replace every cell with a new fill, keeping the dimensions.
    ///
    /// The fill is validated in full before the first write, so a failed
    /// refill leaves the grid untouched.
    pub(crate) fn refill(&mut self, fill: FillPolicy) -> Result<(), GridError> {
        let values = fill.into_cells(self.cell_count())?;
        total_mass(&values)?;
        for (idx, value) in values.into_iter().enumerate() {
            self.set_at(idx, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stability::{scan_critical, scan_stable};

    fn grid(width: usize, height: usize, values: &[Grain]) -> GridStore {
        GridStore::new(width, height, FillPolicy::Seeded(values.to_vec())).unwrap()
    }

    #[test]
    fn zero_fill_dimensions() {
        let g = GridStore::new(4, 3, FillPolicy::Zero).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.cell_count(), 12);
        assert!(g.cells().iter().all(|&v| v == 0));
        assert!(g.is_stable());
        assert_eq!(g.total_grains(), 0);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert_eq!(
            GridStore::new(0, 3, FillPolicy::Zero).unwrap_err(),
            GridError::InvalidDimension {
                name: "width",
                value: 0
            }
        );
        assert_eq!(
            GridStore::new(3, 0, FillPolicy::Zero).unwrap_err(),
            GridError::InvalidDimension {
                name: "height",
                value: 0
            }
        );
    }

    #[test]
    fn area_overflow_rejected() {
        assert!(matches!(
            checked_area(usize::MAX, 2),
            Err(GridError::InvalidDimension { name: "cells", .. })
        ));
    }

    #[test]
    fn seed_length_checked() {
        let err = GridStore::new(2, 2, FillPolicy::Seeded(vec![1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            GridError::SeedLengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn seed_mass_capped() {
        let err = GridStore::new(2, 1, FillPolicy::Seeded(vec![u32::MAX, 1])).unwrap_err();
        assert!(matches!(err, GridError::CapacityExceeded { .. }));
        assert!(GridStore::new(2, 1, FillPolicy::Seeded(vec![u32::MAX, 0])).is_ok());
    }

    #[test]
    fn row_major_indexing() {
        // 3 wide, 2 tall.
        let g = grid(3, 2, &[0, 1, 2, 3, 4, 5]);
        assert_eq!(g.get(0, 2).unwrap(), 2);
        assert_eq!(g.get(1, 0).unwrap(), 3);
        assert_eq!(g.index_of(1, 2).unwrap(), 5);
    }

    #[test]
    fn out_of_bounds_access() {
        let g = GridStore::new(3, 2, FillPolicy::Zero).unwrap();
        assert_eq!(
            g.get(2, 0).unwrap_err(),
            GridError::OutOfBounds {
                row: 2,
                col: 0,
                width: 3,
                height: 2
            }
        );
        assert!(g.get(0, 3).is_err());
    }

    #[test]
    fn seeded_counter_and_mass() {
        let g = grid(2, 2, &[4, 0, 7, 3]);
        assert_eq!(g.critical_count(), 2);
        assert_eq!(g.total_grains(), 14);
        assert!(!g.is_stable());
    }

    #[test]
    fn read_all_is_a_copy() {
        let g = grid(2, 1, &[1, 2]);
        let mut copy = g.read_all();
        copy[0] = 99;
        assert_eq!(g.cells(), &[1, 2]);
    }

    #[test]
    fn add_tracks_counter_and_mass() {
        let mut g = GridStore::new(2, 2, FillPolicy::Zero).unwrap();
        assert_eq!(g.add(1, 1, 3).unwrap(), 3);
        assert!(g.is_stable());
        g.add(1, 1, 1).unwrap();
        assert_eq!(g.critical_count(), 1);
        assert_eq!(g.total_grains(), 4);
        assert!(g.add(2, 0, 1).is_err());
        assert_eq!(g.total_grains(), 4);
    }

    #[test]
    fn add_rejects_capacity_overflow_without_mutation() {
        let mut g = grid(2, 1, &[u32::MAX, 0]);
        let err = g.add(0, 1, 1).unwrap_err();
        assert!(matches!(err, GridError::CapacityExceeded { .. }));
        assert_eq!(g.cells(), &[u32::MAX, 0]);
    }

    #[test]
    fn set_tracks_counter_and_mass() {
        let mut g = grid(2, 1, &[5, 1]);
        g.set(0, 0, 2).unwrap();
        assert!(g.is_stable());
        assert_eq!(g.total_grains(), 3);
        g.set(0, 1, 9).unwrap();
        assert_eq!(g.critical_count(), 1);
        assert_eq!(g.total_grains(), 11);
        assert!(g.set(1, 0, 0).is_err());
    }

    #[test]
    fn take_threshold_removes_four() {
        let mut g = grid(1, 1, &[9]);
        assert_eq!(g.take_threshold(0), 5);
        assert_eq!(g.critical_count(), 1);
        assert_eq!(g.take_threshold(0), 1);
        assert!(g.is_stable());
        assert_eq!(g.total_grains(), 1);
    }

    #[test]
    fn refill_replaces_contents() {
        let mut g = grid(2, 2, &[9, 9, 9, 9]);
        g.refill(FillPolicy::Seeded(vec![0, 4, 1, 2])).unwrap();
        assert_eq!(g.cells(), &[0, 4, 1, 2]);
        assert_eq!(g.critical_count(), 1);
        assert_eq!(g.total_grains(), 7);
        g.refill(FillPolicy::Zero).unwrap();
        assert!(g.is_stable());
        assert_eq!(g.total_grains(), 0);
    }

    #[test]
    fn refill_keeps_counters_exact() {
        let mut g = grid(3, 2, &[7, 0, 4, 1, 9, 2]);
        g.refill(FillPolicy::Seeded(vec![3, 5, 0, 4, 1, 6])).unwrap();
        assert_eq!(g.cells(), &[3, 5, 0, 4, 1, 6]);
        assert_eq!(g.critical_count(), scan_critical(g.cells()));
        assert_eq!(g.critical_count(), 3);
        assert_eq!(g.total_grains(), 19);
        g.refill(FillPolicy::Seeded(vec![u32::MAX, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(g.total_grains(), MAX_TOTAL_GRAINS);
        assert_eq!(g.critical_count(), 1);
    }

    #[test]
    fn failed_refill_leaves_grid_untouched() {
        let mut g = grid(2, 1, &[1, 5]);
        assert!(g.refill(FillPolicy::Seeded(vec![1])).is_err());
        assert!(g
            .refill(FillPolicy::Seeded(vec![u32::MAX, u32::MAX]))
            .is_err());
        assert_eq!(g.cells(), &[1, 5]);
        assert_eq!(g.critical_count(), scan_critical(g.cells()));
        assert_eq!(g.is_stable(), scan_stable(g.cells()));
    }
}
