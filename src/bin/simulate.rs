//! Fight Simulation Tool - headless boss fights with a scripted player
//!
//! Runs batches of fights without rendering to collect balancing metrics.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --fights 200 --skill 0.7
//!   cargo run --bin simulate -- --seed 42 --attack-mode held:0.6 --verbose

use bossball::simulation::{FightConfig, run_simulation};

fn main() {
    let config = FightConfig::from_args();
    if let Err(e) = run_simulation(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
