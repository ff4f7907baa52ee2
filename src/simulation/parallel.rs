//! Parallel fight execution
//!
//! Uses Rayon to run many fights concurrently. Each fight runs in its own
//! Bevy app with a single task thread to avoid hitting OS thread limits.

use rayon::prelude::*;
use serde::Serialize;

use crate::tuning::CombatTuning;

use super::config::FightConfig;
use super::metrics::{BatchSummary, FightResult};
use super::runner::run_fight;

/// Initialize the global Rayon pool. Call once at startup; 0 keeps
/// Rayon's default (one thread per core).
pub fn init_parallel(threads: usize) -> Result<(), String> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| format!("Failed to initialize Rayon thread pool: {}", e))?;
    }
    Ok(())
}

/// Seed for fight `index` of a batch
pub fn fight_seed(base_seed: u64, index: u32) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Run `config.fights` fights in parallel, seeds `base_seed + i`.
/// Results come back in fight order.
pub fn run_fights_parallel(config: &FightConfig, tuning: &CombatTuning, base_seed: u64) -> Vec<FightResult> {
    (0..config.fights)
        .into_par_iter()
        .map(|i| run_fight(config, tuning, fight_seed(base_seed, i), false))
        .collect()
}

#[derive(Serialize)]
struct BatchReport<'a> {
    config: &'a FightConfig,
    summary: &'a BatchSummary,
    fights: &'a [FightResult],
}

/// Default results file name
pub fn default_output_path() -> String {
    format!(
        "fight_results_{}.json",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    )
}

/// Write the batch as pretty JSON
pub fn write_results(
    path: &str,
    config: &FightConfig,
    summary: &BatchSummary,
    results: &[FightResult],
) -> Result<(), String> {
    let report = BatchReport {
        config,
        summary,
        fights: results,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize results: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path, e))
}
