//! Relaxation scheduler: drives an avalanche to a stable configuration.
//!
//! The scheduler keeps a FIFO work queue of critical cell indices with a
//! membership bitmap so no index is queued twice at once. Each dequeue
//! topples the cell at most once: one threshold's worth of grains is
//! removed and one grain goes to each in-bounds orthogonal neighbour.
//! Shares that would leave the grid are drained. A cell still critical
//! after its topple goes to the back of the queue.
//!
//! The final configuration and per-cell topple counts do not depend on
//! the processing order (the abelian property). FIFO order only shapes
//! how the avalanche front grows.
//!
//! A per-call topple budget bounds the work. When it trips, the queue is
//! discarded and the pass reports [`CascadeOutcome::Truncated`]; the grid
//! is left valid but still holds critical cells.

use std::collections::VecDeque;

use sandpile_core::{is_critical, GridError, THRESHOLD};

use crate::grid::{checked_area, GridStore};
use crate::topology;

/// How a relaxation pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CascadeOutcome {
    /// The queue emptied; every cell is below the threshold.
    Stable,
    /// The topple budget ran out with critical cells remaining.
    Truncated,
}

/// Statistics from a single relaxation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Avalanche {
    /// Number of topples performed.
    pub topples: u64,
    /// Grains lost past the boundary.
    pub drained: u64,
    /// Largest queue length observed.
    pub peak_queue_len: usize,
    /// Whether the topple budget tripped.
    pub truncated: bool,
}

impl Avalanche {
    /// The pass outcome.
    pub fn outcome(&self) -> CascadeOutcome {
        if self.truncated {
            CascadeOutcome::Truncated
        } else {
            CascadeOutcome::Stable
        }
    }
}

/// Per-cell topple counts, accumulated across relaxation passes.
///
/// Indexed row-major like the grid it was created for, and remembers that
/// grid's shape so it can only be applied to a grid of the same size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Odometer {
    width: usize,
    height: usize,
    counts: Vec<u64>,
}

impl Odometer {
    /// A zeroed odometer for a `width x height` grid.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDimension`] under the same rules as grid
    /// construction.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let cell_count = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            counts: vec![0; cell_count],
        })
    }

    /// A zeroed odometer matching `grid`.
    pub(crate) fn for_grid(grid: &GridStore) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            counts: vec![0; grid.cell_count()],
        }
    }

    /// Number of columns of the grid this odometer tracks.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows of the grid this odometer tracks.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` if the odometer tracks no cells.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Topples recorded at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.counts.get(row * self.width + col).copied()
    }

    /// All counts, row-major.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Grains drained past the boundary by the recorded topples.
    ///
    /// Each topple of a cell loses one grain per off-grid direction.
    pub fn boundary_drain(&self) -> u64 {
        let (width, height) = (self.width, self.height);
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(idx, &n)| {
                let loss = topology::boundary_loss(idx / width, idx % width, width, height);
                n * u64::from(loss)
            })
            .sum()
    }

    /// Zero every count.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Fail unless this odometer was sized for a grid of `grid`'s shape.
    pub(crate) fn check_shape(&self, grid: &GridStore) -> Result<(), GridError> {
        let expected = (grid.width(), grid.height());
        let actual = (self.width, self.height);
        if expected != actual {
            return Err(GridError::OdometerMismatch { expected, actual });
        }
        Ok(())
    }

    #[inline]
    fn record(&mut self, idx: usize) {
        self.counts[idx] += 1;
    }
}

/// Work queue and scratch state for relaxation passes.
///
/// Reused across steps so a pass allocates nothing once warmed up. The
/// queue is empty between passes.
#[derive(Debug)]
pub(crate) struct Relaxer {
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl Relaxer {
    pub(crate) fn new(cell_count: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: vec![false; cell_count],
        }
    }

    #[inline]
    fn push(&mut self, idx: usize) {
        if !self.queued[idx] {
            self.queued[idx] = true;
            self.queue.push_back(idx);
        }
    }

    /// Queue `idx` if it is critical.
    pub(crate) fn enqueue(&mut self, grid: &GridStore, idx: usize) {
        if is_critical(grid.value_at(idx)) {
            self.push(idx);
        }
    }

    /// Queue every critical cell in row-major order.
    pub(crate) fn enqueue_all_critical(&mut self, grid: &GridStore) {
        for (idx, &v) in grid.cells().iter().enumerate() {
            if is_critical(v) {
                self.push(idx);
            }
        }
    }

    /// Topple queued cells until the queue empties or `budget` topples
    /// have been performed.
    ///
    /// Every critical cell must be queued on entry for a non-truncated
    /// pass to leave the grid stable.
    pub(crate) fn run(
        &mut self,
        grid: &mut GridStore,
        budget: u64,
        mut odometer: Option<&mut Odometer>,
    ) -> Avalanche {
        let (width, height) = (grid.width(), grid.height());
        let mut av = Avalanche {
            peak_queue_len: self.queue.len(),
            ..Avalanche::default()
        };

        while let Some(&idx) = self.queue.front() {
            if av.topples >= budget {
                av.truncated = true;
                break;
            }
            self.queue.pop_front();
            self.queued[idx] = false;

            // Queued cells only gain grains until dequeued, but re-check
            // so a stale entry can never topple a stable cell.
            if !is_critical(grid.value_at(idx)) {
                continue;
            }

            grid.take_threshold(idx);
            let neighbours = topology::neighbours_flat(idx / width, idx % width, width, height);
            av.drained += u64::from(THRESHOLD) - neighbours.len() as u64;
            for n in neighbours {
                if is_critical(grid.add_at(n, 1)) {
                    self.push(n);
                }
            }
            self.enqueue(grid, idx);

            av.topples += 1;
            if let Some(odo) = odometer.as_deref_mut() {
                odo.record(idx);
            }
            av.peak_queue_len = av.peak_queue_len.max(self.queue.len());
        }

        for idx in self.queue.drain(..) {
            self.queued[idx] = false;
        }
        debug_assert!(av.truncated || grid.is_stable());
        av
    }
}
