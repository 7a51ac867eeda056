//! Test utilities and reference models for sandpile development.
//!
//! Provides a deliberately naive reference relaxer with a pluggable pick
//! order ([`reference_relax`]) for checking order independence, plus
//! seeded grid fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod reference;

pub use fixtures::{checkerboard, max_stable, seeded_cells, total_mass};
pub use reference::{reference_relax, PickOrder};
