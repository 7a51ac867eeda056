//! Naive full-scan relaxation used as a test oracle.
//!
//! Every iteration scans the whole grid for critical cells and topples
//! exactly one of them, chosen by a [`PickOrder`]. Slow, but independent
//! of the engine's queue so it can cross-check both the final grid and
//! the per-cell topple counts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sandpile_core::{is_critical, Grain, THRESHOLD};

/// Which critical cell the reference relaxer topples next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickOrder {
    /// Lowest row-major index first.
    FirstCritical,
    /// Highest row-major index first.
    LastCritical,
    /// Uniformly random among critical cells, from a seeded RNG.
    Random(u64),
}

/// Relax `cells` (row-major, `width x height`) to stability in place.
///
/// Returns per-cell topple counts. Boundary shares are dropped.
pub fn reference_relax(
    width: usize,
    height: usize,
    cells: &mut [Grain],
    order: PickOrder,
) -> Vec<u64> {
    assert_eq!(cells.len(), width * height, "cell buffer size mismatch");
    let mut counts = vec![0u64; cells.len()];
    let mut rng = match order {
        PickOrder::Random(seed) => Some(ChaCha8Rng::seed_from_u64(seed)),
        _ => None,
    };

    loop {
        let critical: Vec<usize> = (0..cells.len()).filter(|&i| is_critical(cells[i])).collect();
        let Some(&last) = critical.last() else {
            break;
        };
        let idx = match (order, rng.as_mut()) {
            (PickOrder::FirstCritical, _) => critical[0],
            (PickOrder::LastCritical, _) => last,
            (PickOrder::Random(_), Some(rng)) => critical[rng.random_range(0..critical.len())],
            (PickOrder::Random(_), None) => unreachable!("rng is built for Random"),
        };

        cells[idx] -= THRESHOLD;
        counts[idx] += 1;
        let (row, col) = (idx / width, idx % width);
        if row > 0 {
            cells[idx - width] += 1;
        }
        if row + 1 < height {
            cells[idx + width] += 1;
        }
        if col > 0 {
            cells[idx - 1] += 1;
        }
        if col + 1 < width {
            cells[idx + 1] += 1;
        }
    }
    counts
}
