//! Bossball - plays a single fight and prints its event log
//!
//! Takes the same flags as `simulate` (seed, skill, attack mode, tuning file).
//! Combat runs on the fixed clock; with `--verbose` every event is also
//! logged as it happens.

use std::time::Duration;

use bevy::prelude::*;
use bossball::simulation::{FightConfig, FightResult, build_fight_app, step_frame};
use bossball::{EventBus, FIXED_TIMESTEP, FightState, serialize_event};
use rand::Rng;

fn main() {
    let config = FightConfig::from_args();
    let tuning = config.load_tuning();
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    let mut app = build_fight_app(&config, &tuning, seed, true);
    info!("Seed {}", seed);

    let dt = Duration::from_secs_f32(FIXED_TIMESTEP);
    // Hit-stops hold the fight clock, so allow some frames beyond the limit
    let max_frames = (config.duration_limit / FIXED_TIMESTEP) as u64 * 2;
    let mut frames = 0;
    while !app.world().resource::<FightState>().is_over() && frames < max_frames {
        step_frame(&mut app, dt);
        frames += 1;
    }

    let events = app.world().resource::<EventBus>().processed();
    if !config.quiet {
        for event in events {
            println!("{}", serialize_event(event.time_ms, &event.event));
        }
    }

    let result = FightResult::from_events(seed, events, &tuning);
    println!(
        "{:?} after {:.1}s - boss health {}, player health {}, score {}",
        result.outcome, result.duration, result.boss_health, result.player_health, result.score
    );
}
