//! Error types for grid construction and access.

use std::error::Error;
use std::fmt;

/// Errors from grid construction, cell access and grain drops.
///
/// Every variant is raised synchronously by the call that caused it and
/// before any mutation takes place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A grid dimension is zero, or the cell count overflows `usize`.
    InvalidDimension {
        /// Which dimension was rejected (`"width"`, `"height"` or `"cells"`).
        name: &'static str,
        /// The rejected value.
        value: usize,
    },
    /// A coordinate lies outside `[0, height) x [0, width)`.
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid width (number of columns).
        width: usize,
        /// Grid height (number of rows).
        height: usize,
    },
    /// A seeded fill does not have exactly one value per cell.
    SeedLengthMismatch {
        /// `width * height`.
        expected: usize,
        /// Number of seed values supplied.
        actual: usize,
    },
    /// An odometer sized for one grid was passed to a grid of another shape.
    OdometerMismatch {
        /// `(width, height)` of the grid being stepped.
        expected: (usize, usize),
        /// `(width, height)` the odometer was created for.
        actual: (usize, usize),
    },
    /// Total grain mass would exceed what a single cell can represent.
    CapacityExceeded {
        /// The total mass that was rejected.
        total: u64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { name, value } => {
                write!(f, "invalid grid dimension: {name} = {value}")
            }
            Self::OutOfBounds {
                row,
                col,
                width,
                height,
            } => write!(
                f,
                "cell ({row}, {col}) out of bounds for {width}x{height} grid"
            ),
            Self::SeedLengthMismatch { expected, actual } => {
                write!(f, "seed has {actual} values, grid has {expected} cells")
            }
            Self::OdometerMismatch { expected, actual } => write!(
                f,
                "odometer sized for {}x{} grid, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::CapacityExceeded { total } => {
                write!(f, "total grain mass {total} exceeds capacity {}", u32::MAX)
            }
        }
    }
}

impl Error for GridError {}
