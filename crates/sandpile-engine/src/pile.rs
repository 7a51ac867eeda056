//! The sandpile engine: one grid, one step at a time.
//!
//! [`Sandpile`] owns the [`GridStore`], the relaxation scratch state and
//! the step counter. Each [`step()`](Sandpile::step) drops one grain and
//! relaxes the resulting avalanche before returning.
//!
//! # Ownership model
//!
//! `Sandpile` is [`Send`] but every mutating method takes `&mut self`,
//! and [`cells()`](Sandpile::cells) returns a slice borrowing from `self`.
//! A caller therefore cannot step while holding a view of the grid. Hosts
//! that share an engine across threads wrap it in their own lock; the
//! engine does no internal synchronization.

use std::time::Instant;

use sandpile_core::{Grain, GridError, TickId};

use crate::config::{default_topple_budget, ConfigError, SandpileConfig};
use crate::grid::{FillPolicy, GridStore};
use crate::hash::grid_hash;
use crate::metrics::StepMetrics;
use crate::relax::{Avalanche, CascadeOutcome, Odometer, Relaxer};
use crate::stability::scan_stable;

// Compile-time assertion: Sandpile is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Sandpile>();
    }
};

// ── StepResult ──────────────────────────────────────────────────

/// Result of a [`Sandpile::step()`] or [`Sandpile::relax()`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// Tick after the call. Relaxation passes do not advance it.
    pub tick: TickId,
    /// Whether the cascade ran to completion.
    pub outcome: CascadeOutcome,
    /// Number of topples performed.
    pub topples: u64,
    /// Grains drained past the boundary.
    pub drained: u64,
    /// Timing and queue metrics for this call.
    pub metrics: StepMetrics,
}

impl StepResult {
    /// `true` if the topple budget cut the cascade short.
    pub fn is_truncated(&self) -> bool {
        self.outcome == CascadeOutcome::Truncated
    }
}

// ── Sandpile ────────────────────────────────────────────────────

/// An Abelian sandpile on a fixed rectangular grid with sink boundaries.
///
/// # Example
///
/// ```
/// use sandpile_engine::{FillPolicy, Sandpile};
///
/// let mut pile = Sandpile::new(3, 3, FillPolicy::Zero).unwrap();
/// for _ in 0..4 {
///     pile.step(1, 1).unwrap();
/// }
/// assert_eq!(pile.read_all(), vec![0, 1, 0, 1, 0, 1, 0, 1, 0]);
/// assert!(pile.stable());
/// ```
pub struct Sandpile {
    grid: GridStore,
    relaxer: Relaxer,
    topple_budget: Option<u64>,
    tick: TickId,
    last_metrics: StepMetrics,
}

impl Sandpile {
    /// Create a `width x height` sandpile with the default topple budget.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDimension`] if either dimension is zero,
    /// [`GridError::SeedLengthMismatch`] or
    /// [`GridError::CapacityExceeded`] for a bad seeded fill.
    pub fn new(width: usize, height: usize, fill: FillPolicy) -> Result<Self, GridError> {
        let grid = GridStore::new(width, height, fill)?;
        Ok(Self::from_grid(grid, None))
    }

    /// Create a sandpile from a [`SandpileConfig`].
    ///
    /// Validates the configuration before allocating the grid.
    pub fn with_config(config: SandpileConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = GridStore::new(config.width, config.height, config.fill)?;
        Ok(Self::from_grid(grid, config.topple_budget))
    }

    fn from_grid(grid: GridStore, topple_budget: Option<u64>) -> Self {
        let pile = Self {
            relaxer: Relaxer::new(grid.cell_count()),
            grid,
            topple_budget,
            tick: TickId::default(),
            last_metrics: StepMetrics::default(),
        };
        tracing::debug!(
            width = pile.width(),
            height = pile.height(),
            critical = pile.critical_count(),
            total_grains = pile.total_grains(),
            topple_budget = pile.topple_budget(),
            "sandpile created"
        );
        pile
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// `width * height`.
    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    /// Owned row-major snapshot of every cell.
    pub fn read_all(&self) -> Vec<Grain> {
        self.grid.read_all()
    }

    /// Borrowed row-major view of every cell.
    pub fn cells(&self) -> &[Grain] {
        self.grid.cells()
    }

    /// Grains at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Grain, GridError> {
        self.grid.get(row, col)
    }

    /// `true` iff every cell is below the threshold. O(1).
    pub fn stable(&self) -> bool {
        self.grid.is_stable()
    }

    /// Number of critical cells. O(1).
    pub fn critical_count(&self) -> usize {
        self.grid.critical_count()
    }

    /// Total grains on the grid. O(1).
    pub fn total_grains(&self) -> u64 {
        self.grid.total_grains()
    }

    /// Grain drops performed since construction or the last reset.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// Maximum topples for a relaxation pass over the current grid.
    ///
    /// Without an explicit budget this is [`default_topple_budget`] for
    /// the current mass, re-evaluated at every call.
    pub fn topple_budget(&self) -> u64 {
        self.topple_budget.unwrap_or_else(|| {
            default_topple_budget(self.width(), self.height(), self.total_grains())
        })
    }

    /// Metrics from the most recent step or relaxation pass.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// FNV-1a hash of the dimensions and cell values.
    pub fn state_hash(&self) -> u64 {
        grid_hash(self.width(), self.height(), self.cells())
    }

    /// A zeroed [`Odometer`] sized for this grid.
    pub fn odometer(&self) -> Odometer {
        Odometer::for_grid(&self.grid)
    }

    /// Drop one grain on `(row, col)` and relax the avalanche.
    ///
    /// If the grid was already unstable (seeded critical cells or an
    /// earlier truncated cascade), every critical cell is relaxed too.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] for a coordinate outside the grid, or
    /// [`GridError::CapacityExceeded`] if the grid is full. Nothing is
    /// mutated on error.
    pub fn step(&mut self, row: usize, col: usize) -> Result<StepResult, GridError> {
        self.drop_grain(row, col, None)
    }

    /// Like [`step()`](Self::step), also adding each topple to `odometer`.
    ///
    /// # Errors
    ///
    /// As [`step()`](Self::step), plus [`GridError::OdometerMismatch`] if
    /// the odometer was sized for a different grid.
    pub fn step_with_odometer(
        &mut self,
        row: usize,
        col: usize,
        odometer: &mut Odometer,
    ) -> Result<StepResult, GridError> {
        odometer.check_shape(&self.grid)?;
        self.drop_grain(row, col, Some(odometer))
    }

    /// Relax every critical cell without adding a grain.
    ///
    /// Used to resume after a truncated step. A no-op on a stable grid.
    /// Does not advance the tick.
    pub fn relax(&mut self) -> StepResult {
        self.relax_inner(None)
    }

    /// Like [`relax()`](Self::relax), also adding each topple to `odometer`.
    ///
    /// # Errors
    ///
    /// [`GridError::OdometerMismatch`] if the odometer was sized for a
    /// different grid. Nothing is mutated on error.
    pub fn relax_with_odometer(
        &mut self,
        odometer: &mut Odometer,
    ) -> Result<StepResult, GridError> {
        odometer.check_shape(&self.grid)?;
        Ok(self.relax_inner(Some(odometer)))
    }

    /// Re-initialise the grid with `fill`, resetting the tick and metrics.
    ///
    /// Dimensions and any explicit topple budget are unchanged. On error the grid is
    /// left as it was.
    pub fn reset(&mut self, fill: FillPolicy) -> Result<(), GridError> {
        self.grid.refill(fill)?;
        self.tick = TickId::default();
        self.last_metrics = StepMetrics::default();
        tracing::debug!(
            critical = self.grid.critical_count(),
            total_grains = self.grid.total_grains(),
            "sandpile reset"
        );
        Ok(())
    }

    fn drop_grain(
        &mut self,
        row: usize,
        col: usize,
        odometer: Option<&mut Odometer>,
    ) -> Result<StepResult, GridError> {
        let start = Instant::now();
        let rescanned = !self.grid.is_stable();
        let idx = self.grid.add(row, col, 1)?;
        if rescanned {
            self.relaxer.enqueue_all_critical(&self.grid);
        } else {
            self.relaxer.enqueue(&self.grid, idx);
        }
        let budget = self.topple_budget();
        let avalanche = self.relaxer.run(&mut self.grid, budget, odometer);
        self.tick = self.tick.next();
        Ok(self.finish(avalanche, rescanned, start))
    }

    fn relax_inner(&mut self, odometer: Option<&mut Odometer>) -> StepResult {
        let start = Instant::now();
        let rescanned = !self.grid.is_stable();
        if rescanned {
            self.relaxer.enqueue_all_critical(&self.grid);
        }
        let budget = self.topple_budget();
        let avalanche = self.relaxer.run(&mut self.grid, budget, odometer);
        self.finish(avalanche, rescanned, start)
    }

    fn finish(&mut self, avalanche: Avalanche, rescanned: bool, start: Instant) -> StepResult {
        debug_assert_eq!(self.grid.is_stable(), scan_stable(self.grid.cells()));
        let outcome = avalanche.outcome();
        if outcome == CascadeOutcome::Truncated {
            tracing::warn!(
                tick = self.tick.0,
                topples = avalanche.topples,
                critical = self.grid.critical_count(),
                "cascade truncated by topple budget"
            );
        } else {
            tracing::trace!(
                tick = self.tick.0,
                topples = avalanche.topples,
                drained = avalanche.drained,
                "relaxation pass complete"
            );
        }
        let metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            topples: avalanche.topples,
            drained: avalanche.drained,
            peak_queue_len: avalanche.peak_queue_len,
            rescanned,
        };
        self.last_metrics = metrics.clone();
        StepResult {
            tick: self.tick,
            outcome,
            topples: avalanche.topples,
            drained: avalanche.drained,
            metrics,
        }
    }
}

impl std::fmt::Debug for Sandpile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sandpile")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("current_tick", &self.tick)
            .field("critical", &self.critical_count())
            .field("total_grains", &self.total_grains())
            .finish()
    }
}
