//! End-to-end scenarios through the public API.

use sandpile_core::{GridError, TickId};
use sandpile_engine::{uniform_fill, CascadeOutcome, FillPolicy, Sandpile, SandpileConfig};

#[test]
fn three_by_three_center() {
    let mut pile = Sandpile::new(3, 3, FillPolicy::Zero).unwrap();
    for _ in 0..3 {
        pile.step(1, 1).unwrap();
    }
    assert_eq!(pile.read_all(), vec![0, 0, 0, 0, 3, 0, 0, 0, 0]);
    let result = pile.step(1, 1).unwrap();
    assert_eq!(result.outcome, CascadeOutcome::Stable);
    assert_eq!(pile.read_all(), vec![0, 1, 0, 1, 0, 1, 0, 1, 0]);
    assert!(pile.stable());
    assert_eq!(pile.total_grains(), 4);
}

#[test]
fn one_by_one_drains_everything() {
    let mut pile = Sandpile::new(1, 1, FillPolicy::Zero).unwrap();
    for expected in 1..=3 {
        pile.step(0, 0).unwrap();
        assert_eq!(pile.get(0, 0).unwrap(), expected);
    }
    let result = pile.step(0, 0).unwrap();
    assert_eq!(result.drained, 4);
    assert_eq!(pile.read_all(), vec![0]);
    assert!(pile.stable());
    assert_eq!(pile.current_tick(), TickId(4));
}

#[test]
fn default_config_matches_visualization() {
    let pile = Sandpile::with_config(SandpileConfig::default()).unwrap();
    assert_eq!(pile.width(), 110);
    assert_eq!(pile.height(), 110);
    assert_eq!(pile.read_all().len(), 110 * 110);
    assert!(pile.stable());
}

#[test]
fn snapshot_is_independent_of_engine() {
    let mut pile = Sandpile::new(2, 2, FillPolicy::Zero).unwrap();
    let mut snap = pile.read_all();
    snap[0] = 42;
    pile.step(0, 0).unwrap();
    assert_eq!(pile.read_all(), vec![1, 0, 0, 0]);
}

#[test]
fn errors_are_raised_at_the_call() {
    assert!(matches!(
        Sandpile::new(0, 0, FillPolicy::Zero),
        Err(GridError::InvalidDimension { .. })
    ));
    let mut pile = Sandpile::new(4, 2, FillPolicy::Zero).unwrap();
    assert!(matches!(pile.get(2, 0), Err(GridError::OutOfBounds { .. })));
    assert!(matches!(pile.step(0, 4), Err(GridError::OutOfBounds { .. })));
    assert_eq!(pile.current_tick(), TickId(0));
}

#[test]
fn capacity_limit_is_enforced_before_mutation() {
    let mut pile = Sandpile::new(2, 1, FillPolicy::Seeded(vec![u32::MAX, 0])).unwrap();
    assert!(!pile.stable());
    let err = pile.step(0, 1).unwrap_err();
    assert!(matches!(err, GridError::CapacityExceeded { .. }));
    assert_eq!(pile.read_all(), vec![u32::MAX, 0]);
}

#[test]
fn uniform_start_relaxes_in_one_step() {
    // 110x110 seeded uniformly from 0..10, as the visualization starts.
    let fill = uniform_fill(110, 110, 10, 42).unwrap();
    let mut pile = Sandpile::new(110, 110, fill).unwrap();
    assert!(!pile.stable());
    let budget = pile.topple_budget();
    assert!(budget > 110 * 110 * 1024);

    let result = pile.step(0, 0).unwrap();
    assert!(!result.is_truncated());
    assert!(result.metrics.rescanned);
    assert!(result.topples < budget);
    assert!(pile.stable());
    assert!(pile.cells().iter().all(|&v| v < 4));
}
