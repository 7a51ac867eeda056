//! 4-connected square lattice with absorbing (sink) boundaries.
//!
//! Neighbours that would fall outside the grid are omitted: an interior
//! cell has 4 neighbours, an edge cell 3 and a corner cell 2. A 1-wide
//! grid degenerates further (a 1x1 grid has none).

use smallvec::SmallVec;

use sandpile_core::THRESHOLD;

/// Offsets for north, south, west, east as `(d_row, d_col)`.
const OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Resolve a single axis value, returning `None` when it leaves the grid.
#[inline]
fn resolve_axis(val: isize, len: usize) -> Option<usize> {
    if val >= 0 && (val as usize) < len {
        Some(val as usize)
    } else {
        None
    }
}

/// Flat row-major indices of the in-bounds 4-connected neighbours of
/// `(row, col)` on a `width x height` grid.
pub(crate) fn neighbours_flat(
    row: usize,
    col: usize,
    width: usize,
    height: usize,
) -> SmallVec<[usize; 4]> {
    let mut result = SmallVec::new();
    for (dr, dc) in OFFSETS {
        let nr = resolve_axis(row as isize + dr, height);
        let nc = resolve_axis(col as isize + dc, width);
        if let (Some(nr), Some(nc)) = (nr, nc) {
            result.push(nr * width + nc);
        }
    }
    result
}

/// Grains lost past the boundary when `(row, col)` topples once.
///
/// Equal to the number of off-grid neighbour directions.
pub fn boundary_loss(row: usize, col: usize, width: usize, height: usize) -> u32 {
    THRESHOLD - neighbours_flat(row, col, width, height).len() as u32
}
