//! Fight simulation - headless fights with a scripted player
//!
//! Runs the combat plugin without rendering, collecting per-fight results
//! and batch summaries for balancing.

pub mod config;
pub mod metrics;
pub mod parallel;
pub mod runner;
pub mod scripted;

pub use config::{FIGHT_SETTINGS_FILE, FightConfig, parse_attack_mode};
pub use metrics::{BatchSummary, FightResult, StrikeCounts};
pub use parallel::{default_output_path, init_parallel, run_fights_parallel, write_results};
pub use runner::{build_fight_app, run_fight, run_simulation, step_frame};
pub use scripted::{ScriptedPlayer, drive_scripted_player, plan_input};
