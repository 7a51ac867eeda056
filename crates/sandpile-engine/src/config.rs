//! Engine configuration, validation, and error types.
//!
//! [`SandpileConfig`] is the builder input for
//! [`Sandpile::with_config()`](crate::Sandpile::with_config).
//! [`validate()`](SandpileConfig::validate) checks every structural
//! invariant before any memory is allocated for the grid.

use std::error::Error;
use std::fmt;

use sandpile_core::GridError;

use crate::grid::{checked_area, FillPolicy};

/// Default grid width, matching the reference visualization.
pub const DEFAULT_WIDTH: usize = 110;

/// Default grid height, matching the reference visualization.
pub const DEFAULT_HEIGHT: usize = 110;

/// Minimum default per-call topple budget, as a multiple of the cell count.
pub const DEFAULT_BUDGET_PER_CELL: u64 = 1024;

/// Default topple budget for a `width x height` grid holding
/// `total_grains` grains (saturating).
///
/// A grain topples fewer than `width * height` times before it drains,
/// so `total_grains * width * height` bounds every cascade the grid can
/// start. Small grids keep a floor of [`DEFAULT_BUDGET_PER_CELL`] per cell.
pub fn default_topple_budget(width: usize, height: usize, total_grains: u64) -> u64 {
    let area = (width as u64).saturating_mul(height as u64);
    area.saturating_mul(DEFAULT_BUDGET_PER_CELL)
        .max(total_grains.saturating_mul(area))
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SandpileConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Dimensions or initial fill are invalid.
    Grid(GridError),
    /// An explicit topple budget of zero would truncate every cascade.
    ZeroToppleBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::ZeroToppleBudget => write!(f, "topple_budget must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::ZeroToppleBudget => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── SandpileConfig ─────────────────────────────────────────────────

/// Complete configuration for constructing a [`Sandpile`](crate::Sandpile).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SandpileConfig {
    /// Number of columns. Must be at least 1.
    pub width: usize,
    /// Number of rows. Must be at least 1.
    pub height: usize,
    /// Initial contents of the grid.
    pub fill: FillPolicy,
    /// Maximum topples per step or relaxation pass. `None` selects
    /// [`default_topple_budget`] for the grid's mass at each call.
    pub topple_budget: Option<u64>,
}

impl Default for SandpileConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl SandpileConfig {
    /// An empty `width x height` grid with the default budget.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            fill: FillPolicy::Zero,
            topple_budget: None,
        }
    }

    /// Replace the initial fill.
    pub fn with_fill(mut self, fill: FillPolicy) -> Self {
        self.fill = fill;
        self
    }

    /// Set an explicit topple budget.
    pub fn with_topple_budget(mut self, budget: u64) -> Self {
        self.topple_budget = Some(budget);
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Both dimensions >= 1 and the area fits in usize.
        let cell_count = checked_area(self.width, self.height)?;
        // 2. Seeded fill has one value per cell and a representable mass.
        self.fill.validate(cell_count)?;
        // 3. An explicit budget must allow at least one topple.
        if self.topple_budget == Some(0) {
            return Err(ConfigError::ZeroToppleBudget);
        }
        Ok(())
    }

    /// The budget for a first pass over the initial fill, applying the
    /// default if `None`.
    pub fn resolved_topple_budget(&self) -> u64 {
        self.topple_budget.unwrap_or_else(|| {
            let mass = match &self.fill {
                FillPolicy::Zero => 0,
                FillPolicy::Seeded(values) => values.iter().map(|&v| u64::from(v)).sum(),
            };
            default_topple_budget(self.width, self.height, mass)
        })
    }
}
