//! Core types for the sandpile simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! grain representation, the toppling threshold, the step counter and the
//! error type shared by every grid operation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::GridError;
pub use id::TickId;

/// Number of grains held by a single cell.
///
/// Unsigned, so a cell can never hold a negative count.
pub type Grain = u32;

/// Grain count at which a cell becomes critical and topples.
///
/// Equal to the neighbour count of an interior cell on the 4-connected
/// square lattice, so a toppling interior cell hands one grain to each
/// neighbour.
pub const THRESHOLD: Grain = 4;

/// Returns `true` if a cell holding `value` grains is critical.
#[inline]
pub fn is_critical(value: Grain) -> bool {
    value >= THRESHOLD
}
