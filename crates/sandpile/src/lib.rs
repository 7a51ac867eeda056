//! Sandpile: a deterministic Abelian sandpile simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the sandpile sub-crates. For most users, adding `sandpile` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sandpile::prelude::*;
//!
//! // A 3x3 grid, empty to start.
//! let mut pile = Sandpile::new(3, 3, FillPolicy::Zero).unwrap();
//!
//! // Four grains on the center: the fourth makes it topple.
//! for _ in 0..4 {
//!     pile.step(1, 1).unwrap();
//! }
//! assert_eq!(pile.read_all(), vec![0, 1, 0, 1, 0, 1, 0, 1, 0]);
//! assert!(pile.stable());
//!
//! // Randomness lives in the driver, seeded explicitly.
//! let mut dropper = RandomDropper::for_pile(&pile, 42);
//! let summary = dropper.drive(&mut pile, 100).unwrap();
//! assert_eq!(summary.drops, 100);
//! assert_eq!(pile.total_grains() + summary.drained, 104);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sandpile-core` | `Grain`, `THRESHOLD`, `TickId`, `GridError` |
//! | [`engine`] | `sandpile-engine` | `Sandpile`, grid store, relaxation, stability, drivers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`sandpile-core`).
pub use sandpile_core as types;

/// The grid engine (`sandpile-engine`).
///
/// [`engine::Sandpile`] is the main entry point; [`engine::RandomDropper`]
/// and [`engine::uniform_fill`] provide seeded drivers and initial grids.
pub use sandpile_engine as engine;

/// Common imports for typical sandpile usage.
///
/// ```rust
/// use sandpile::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use sandpile_core::{Grain, GridError, TickId, THRESHOLD};

    // Engine
    pub use sandpile_engine::{
        uniform_fill, CascadeOutcome, ConfigError, DriveSummary, FillPolicy, Odometer,
        RandomDropper, Sandpile, SandpileConfig, StepMetrics, StepResult,
    };
}
