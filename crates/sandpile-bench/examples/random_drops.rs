//! Drop random grains on the reference grid and print avalanche stats.
//!
//! Run with: `cargo run -p sandpile-bench --example random_drops`

use sandpile_bench::{reference_profile, settled_pile};
use sandpile_engine::{ConfigError, RandomDropper};

fn main() {
    let pile = reference_profile(42)
        .map_err(ConfigError::from)
        .and_then(|cfg| settled_pile(cfg, 1, 0));
    let mut pile = match pile {
        Ok(pile) => pile,
        Err(e) => {
            eprintln!("bad profile: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "{}x{} grid settled with {} grains",
        pile.width(),
        pile.height(),
        pile.total_grains()
    );

    let mut dropper = RandomDropper::for_pile(&pile, 2);
    for round in 1..=10 {
        match dropper.drive(&mut pile, 10_000) {
            Ok(s) => println!(
                "round {round:>2}: tick {:>6}  topples {:>8}  drained {:>6}  largest {:>6}  grains {:>6}  stable {}",
                pile.current_tick(),
                s.topples,
                s.drained,
                s.largest_avalanche,
                pile.total_grains(),
                pile.stable(),
            ),
            Err(e) => {
                eprintln!("step failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
