//! Reusable grid fixtures.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sandpile_core::{Grain, THRESHOLD};

/// Row-major cells drawn uniformly from `0..max_exclusive` with a seeded RNG.
pub fn seeded_cells(width: usize, height: usize, max_exclusive: Grain, seed: u64) -> Vec<Grain> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..width * height)
        .map(|_| rng.random_range(0..max_exclusive))
        .collect()
}

/// Alternating `hi`/`lo` cells, `hi` at `(0, 0)`.
pub fn checkerboard(width: usize, height: usize, hi: Grain, lo: Grain) -> Vec<Grain> {
    (0..width * height)
        .map(|i| {
            let (row, col) = (i / width, i % width);
            if (row + col) % 2 == 0 {
                hi
            } else {
                lo
            }
        })
        .collect()
}

/// The maximal stable configuration: every cell one grain short of toppling.
pub fn max_stable(width: usize, height: usize) -> Vec<Grain> {
    vec![THRESHOLD - 1; width * height]
}

/// Sum of all cells.
pub fn total_mass(cells: &[Grain]) -> u64 {
    cells.iter().map(|&v| u64::from(v)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_layout() {
        assert_eq!(checkerboard(3, 2, 5, 1), vec![5, 1, 5, 1, 5, 1]);
    }

    #[test]
    fn seeded_cells_deterministic() {
        let a = seeded_cells(4, 4, 8, 5);
        assert_eq!(a, seeded_cells(4, 4, 8, 5));
        assert!(a.iter().all(|&v| v < 8));
    }

    #[test]
    fn max_stable_mass() {
        assert_eq!(total_mass(&max_stable(3, 3)), 27);
    }
}
