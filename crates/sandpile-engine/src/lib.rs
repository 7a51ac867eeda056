//! Abelian sandpile grid engine.
//!
//! A deterministic, discrete-time cellular automaton on a fixed
//! rectangular grid. Each [`Sandpile::step()`] drops one grain on a cell
//! and relaxes the resulting avalanche: any cell holding
//! [`THRESHOLD`](sandpile_core::THRESHOLD) or more grains topples, sending
//! one grain to each orthogonal neighbour. Grains pushed past the edge
//! are lost.
//!
//! # Components
//!
//! - [`GridStore`]: the flat row-major grain field and its geometry.
//! - [`relax`]: the FIFO work-queue scheduler that drives avalanches,
//!   bounded by a per-call topple budget.
//! - [`stability`]: the incrementally maintained critical-cell counter
//!   behind [`Sandpile::stable()`].
//!
//! The engine draws no random numbers. Drivers such as
//! [`RandomDropper`] choose drop targets from an explicit seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod grid;
pub mod hash;
pub mod metrics;
pub mod pile;
pub mod relax;
pub mod stability;
pub mod topology;

pub use config::{ConfigError, SandpileConfig};
pub use driver::{uniform_fill, DriveSummary, RandomDropper};
pub use grid::{FillPolicy, GridStore};
pub use metrics::StepMetrics;
pub use pile::{Sandpile, StepResult};
pub use relax::{CascadeOutcome, Odometer};
