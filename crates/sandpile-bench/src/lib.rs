//! Benchmark profiles for the sandpile engine.
//!
//! - [`reference_profile`]: 110x110 grid seeded uniformly in `0..10`,
//!   the starting point of the reference visualization
//! - [`stress_profile`]: 512x512 grid, same seeding
//! - [`settled_pile`]: a profile relaxed to stability and driven for a
//!   while, so benchmarks measure steady-state avalanches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sandpile_core::GridError;
use sandpile_engine::{uniform_fill, ConfigError, RandomDropper, Sandpile, SandpileConfig};

/// 110x110 grid with grains drawn uniformly from `0..10`.
pub fn reference_profile(seed: u64) -> Result<SandpileConfig, GridError> {
    profile(110, 110, seed)
}

/// 512x512 grid with grains drawn uniformly from `0..10`.
pub fn stress_profile(seed: u64) -> Result<SandpileConfig, GridError> {
    profile(512, 512, seed)
}

fn profile(width: usize, height: usize, seed: u64) -> Result<SandpileConfig, GridError> {
    Ok(SandpileConfig::new(width, height).with_fill(uniform_fill(width, height, 10, seed)?))
}

/// Build `config`, relax it fully, then drop `warmup` random grains.
///
/// The result is in the self-organised critical regime where single
/// drops trigger avalanches of every size.
pub fn settled_pile(
    config: SandpileConfig,
    seed: u64,
    warmup: u64,
) -> Result<Sandpile, ConfigError> {
    let mut pile = Sandpile::with_config(config)?;
    while !pile.stable() {
        pile.relax();
    }
    let mut dropper = RandomDropper::for_pile(&pile, seed);
    dropper.drive(&mut pile, warmup)?;
    Ok(pile)
}
