//! Headless fight runner
//!
//! Builds a minimal Bevy app around the combat plugin and steps it by hand
//! with a fixed clock, so a fight with a given seed always plays out the same.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use rand::Rng;

use crate::constants::FIXED_TIMESTEP;
use crate::effects::CombatRng;
use crate::events::EventBus;
use crate::plugin::{CombatPlugin, FightState, fight_in_progress, move_player};
use crate::tuning::CombatTuning;

use super::config::FightConfig;
use super::metrics::{BatchSummary, FightResult};
use super::parallel::{default_output_path, init_parallel, run_fights_parallel, write_results};
use super::scripted::{ScriptedPlayer, drive_scripted_player};

/// Frames past the time limit before the runner gives up on a fight
const FRAME_SLACK: u64 = 600;

/// Build a fight app ready to step. `logging` installs the LogPlugin, which
/// may only happen once per process.
pub fn build_fight_app(config: &FightConfig, tuning: &CombatTuning, seed: u64, logging: bool) -> App {
    let mut app = App::new();

    // Single task thread per app so many fights can run side by side
    app.add_plugins(
        MinimalPlugins
            .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f32(FIXED_TIMESTEP)))
            .set(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            }),
    );
    if logging {
        let level = if config.verbose {
            bevy::log::Level::DEBUG
        } else {
            bevy::log::Level::INFO
        };
        app.add_plugins(bevy::log::LogPlugin {
            level,
            ..default()
        });
    }

    app.insert_resource(Time::<Fixed>::from_duration(Duration::from_secs_f32(
        FIXED_TIMESTEP,
    )));
    app.insert_resource(tuning.clone());
    app.insert_resource(CombatRng::seeded(seed));
    app.insert_resource(EventBus::new());
    app.insert_resource(FightState::with_time_limit(config.duration_limit));
    app.insert_resource(ScriptedPlayer::new(config.skill));

    app.add_plugins(CombatPlugin);
    app.add_systems(
        Update,
        drive_scripted_player
            .before(move_player)
            .run_if(fight_in_progress),
    );

    app.finish();
    app.cleanup();
    app.update();
    app
}

/// Advance one frame of `dt` seconds: FixedUpdate, then Update, as Bevy's
/// main schedule orders them. While a hit-stop holds virtual time, only real
/// time moves and FixedUpdate is skipped.
pub fn step_frame(app: &mut App, dt: Duration) {
    let world = app.world_mut();
    world.resource_mut::<Time<Real>>().advance_by(dt);

    if world.resource::<Time<Virtual>>().is_paused() {
        world.resource_mut::<Time>().advance_by(Duration::ZERO);
        world.run_schedule(Update);
        return;
    }

    world.resource_mut::<Time<Virtual>>().advance_by(dt);
    world.resource_mut::<Time<Fixed>>().advance_by(dt);
    world.resource_mut::<Time>().advance_by(dt);
    world.run_schedule(FixedUpdate);
    world.run_schedule(Update);
}

/// Play one fight to its end and summarize it
pub fn run_fight(config: &FightConfig, tuning: &CombatTuning, seed: u64, logging: bool) -> FightResult {
    let mut app = build_fight_app(config, tuning, seed, logging);
    let dt = Duration::from_secs_f32(FIXED_TIMESTEP);
    let max_frames = (config.duration_limit.max(0.0) / FIXED_TIMESTEP) as u64 + FRAME_SLACK;

    let mut frames = 0;
    while !app.world().resource::<FightState>().is_over() {
        if frames >= max_frames {
            warn!("Fight {} did not finish after {} frames", seed, frames);
            break;
        }
        step_frame(&mut app, dt);
        frames += 1;
    }

    FightResult::from_events(seed, app.world().resource::<EventBus>().processed(), tuning)
}

/// Run a batch from the command line config: fights, summary, results file
pub fn run_simulation(config: FightConfig) -> Result<BatchSummary, String> {
    init_parallel(config.threads)?;
    let tuning = config.load_tuning();
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    if !config.quiet {
        println!(
            "Running {} fight(s), base seed {}, skill {:.2}, attack mode {:?}",
            config.fights, base_seed, config.skill, tuning.boss.attack_mode
        );
    }

    // A single fight gets the full log; batches stay quiet
    let results = if config.fights == 1 {
        vec![run_fight(&config, &tuning, base_seed, config.verbose)]
    } else {
        run_fights_parallel(&config, &tuning, base_seed)
    };
    let summary = BatchSummary::from_results(&results);

    if !config.quiet {
        for result in &results {
            println!(
                "  seed {:>6}: {:?} after {:.1}s, boss {} / player {}, {} staggers, score {}",
                result.seed,
                result.outcome,
                result.duration,
                result.boss_health,
                result.player_health,
                result.staggers,
                result.score
            );
        }
        summary.print();
    }

    let path = config.output_file.clone().unwrap_or_else(default_output_path);
    write_results(&path, &config, &summary, &results)?;
    if !config.quiet {
        println!("\nResults written to {}", path);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::Boss;
    use crate::events::FightOutcome;
    use crate::player::Player;

    fn short_config(seconds: f32) -> FightConfig {
        FightConfig {
            duration_limit: seconds,
            ..Default::default()
        }
    }

    #[test]
    fn test_fight_ends_by_time_limit_at_latest() {
        let config = short_config(5.0);
        let result = run_fight(&config, &CombatTuning::default(), 3, false);
        assert!(result.duration <= 5.0 + FIXED_TIMESTEP * 2.0);
        if result.outcome == FightOutcome::TimeLimit {
            assert!(result.duration >= 5.0 - FIXED_TIMESTEP);
        }
    }

    #[test]
    fn test_boss_attacks_during_fight() {
        let config = short_config(5.0);
        let result = run_fight(&config, &CombatTuning::default(), 11, false);
        assert!(result.balls_spawned >= 1);
    }

    #[test]
    fn test_same_seed_same_fight() {
        let config = short_config(8.0);
        let tuning = CombatTuning::default();
        let a = run_fight(&config, &tuning, 42, false);
        let b = run_fight(&config, &tuning, 42, false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_startup_spawns_combatants() {
        let mut app = build_fight_app(&short_config(5.0), &CombatTuning::default(), 1, false);
        let world = app.world_mut();
        assert_eq!(world.query::<&Player>().iter(world).count(), 1);
        assert_eq!(world.query::<&Boss>().iter(world).count(), 1);
        let fight = app.world().resource::<FightState>();
        assert!(!fight.is_over());
        assert_eq!(fight.time_limit, Some(5.0));
    }
}
