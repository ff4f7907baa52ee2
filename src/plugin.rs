//! Combat plugin - wires the combat core into Bevy systems
//!
//! Ball travel and contacts run in FixedUpdate. Timers, the boss state
//! machine, bat swings and effects run in Update on scaled time, so they all
//! freeze together while a hit-stop has virtual time paused.

use bevy::prelude::*;
use rand::Rng;

use crate::arena::{Arena, TriggerPresence, boss_trigger_radius, overlaps, sphere_contact};
use crate::ball::{
    ActiveTargetPolicy, Ball, BallFlags, BallMotion, BallOwner, BoostWindow, CollisionEffects,
    Contact, OwnershipWindow, TargetContext, TriggerOutcome, TriggerZone, resolve_collision,
    resolve_trigger,
};
use crate::boss::{Boss, BossContext, BossStats, StateMachine};
use crate::constants::{BOSS_START, PLAYER_START};
use crate::effects::{
    CombatRng, HitStop, Lifetime, ScorePopup, ScreenShake, Spark, expire_lifetimes,
    update_hit_stop, update_screen_shake,
};
use crate::events::{CombatEvent, EventBus, FightOutcome, Surface, serialize_event, update_event_bus_time};
use crate::helpers::{flat_direction, flatten};
use crate::player::{
    BatSwing, DamageResult, Facing, Player, PlayerHealth, PlayerInput, closest_ball_in_range,
    plan_strike,
};
use crate::scoring::{Score, ScoreSink};
use crate::tuning::{BallTuning, CombatTuning, ImpactTuning};

/// How the current fight stands
#[derive(Resource, Debug, Default)]
pub struct FightState {
    pub outcome: Option<FightOutcome>,
    /// Scaled seconds since the fight started
    pub elapsed: f32,
    pub time_limit: Option<f32>,
}

impl FightState {
    pub fn with_time_limit(limit: f32) -> Self {
        Self {
            time_limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Run condition: gameplay systems stop once the fight is decided
pub fn fight_in_progress(fight: Res<FightState>) -> bool {
    !fight.is_over()
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatTuning>()
            .init_resource::<Arena>()
            .init_resource::<Score>()
            .init_resource::<HitStop>()
            .init_resource::<ScreenShake>()
            .init_resource::<ActiveTargetPolicy>()
            .init_resource::<FightState>();

        // Callers may have installed their own seeded rng or bus
        if !app.world().contains_resource::<EventBus>() {
            app.insert_resource(EventBus::new());
        }
        if !app.world().contains_resource::<CombatRng>() {
            app.insert_resource(CombatRng::seeded(0));
        }

        app.add_systems(Startup, spawn_combatants)
            .add_systems(
                Update,
                (
                    update_event_bus_time,
                    update_hit_stop,
                    update_screen_shake,
                    (
                        tick_player_timers,
                        move_player,
                        swing_bat,
                        tick_boss,
                        tick_ownership,
                        expire_lifetimes,
                        check_fight_end,
                    )
                        .chain()
                        .run_if(fight_in_progress),
                    log_combat_events,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (step_balls, resolve_ball_contacts)
                    .chain()
                    .run_if(fight_in_progress),
            );
    }
}

/// Spawn the boss (already in Idle) and the player, and zero the score
pub fn spawn_combatants(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    mut bus: ResMut<EventBus>,
    mut score: ResMut<Score>,
) {
    score.reset();
    let mut stats = BossStats::new(tuning.boss.health);
    let mut machine = StateMachine::standard();
    let mut spawned: Vec<Vec3> = Vec::new();
    machine.start(&mut BossContext {
        stats: &mut stats,
        tuning: &tuning.boss,
        spawner: &mut spawned,
        events: &mut bus,
        position: BOSS_START,
    });

    commands.spawn((Boss, stats, machine, Transform::from_translation(BOSS_START)));
    commands.spawn((
        Player,
        Facing::default(),
        PlayerInput::default(),
        BatSwing::default(),
        PlayerHealth::new(tuning.player.health),
        Transform::from_translation(PLAYER_START),
    ));
    info!(
        "Fight started: boss health {}, player health {}",
        tuning.boss.health, tuning.player.health
    );
}

/// Spawn a ball heading off in a random ground-plane direction
pub fn spawn_ball(commands: &mut Commands, position: Vec3, tuning: &BallTuning, rng: &mut impl Rng) {
    let direction = loop {
        let candidate = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
        if let Some(dir) = flat_direction(candidate) {
            break dir;
        }
    };
    commands.spawn((
        Ball,
        BallMotion::new(tuning.base_speed, direction),
        BoostWindow::default(),
        BallOwner::Boss,
        BallFlags::default(),
        OwnershipWindow::default(),
        TriggerPresence::default(),
        Transform::from_translation(flatten(position)),
    ));
}

pub fn tick_player_timers(time: Res<Time>, mut players: Query<(&mut BatSwing, &mut PlayerHealth)>) {
    let dt = time.delta_secs();
    for (mut swing, mut health) in &mut players {
        swing.tick(dt);
        health.tick(dt);
    }
}

pub fn move_player(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    arena: Res<Arena>,
    mut players: Query<(&mut Transform, &mut Facing, &PlayerInput), With<Player>>,
) {
    for (mut transform, mut facing, input) in &mut players {
        let movement = flatten(input.movement).clamp_length_max(1.0);
        let next = transform.translation + movement * tuning.player.move_speed * time.delta_secs();
        transform.translation = arena.clamp(next, tuning.player.radius);

        if let Some(aim) = flat_direction(input.aim) {
            facing.0 = aim;
        }
    }
}

/// Swing at the closest ball in reach
pub fn swing_bat(
    tuning: Res<CombatTuning>,
    mut bus: ResMut<EventBus>,
    mut players: Query<(&Transform, &Facing, &mut PlayerInput, &mut BatSwing), With<Player>>,
    bosses: Query<(&Transform, &BossStats), With<Boss>>,
    mut balls: Query<
        (
            Entity,
            &Transform,
            &mut BallMotion,
            &mut BoostWindow,
            &mut BallFlags,
            &mut BallOwner,
            &mut OwnershipWindow,
        ),
        With<Ball>,
    >,
) {
    let boss = bosses
        .iter()
        .find(|(_, stats)| !stats.is_defeated())
        .map(|(transform, _)| transform.translation);

    for (transform, facing, mut input, mut swing) in &mut players {
        if !input.swing_pressed {
            continue;
        }
        input.swing_pressed = false;

        if !swing.ready() {
            debug!("Swing still cooling down");
            continue;
        }

        let player = transform.translation;
        let candidates: Vec<(Entity, Vec3)> = balls
            .iter()
            .map(|(entity, ball, ..)| (entity, ball.translation))
            .collect();
        let Some((entity, _)) = closest_ball_in_range(player, candidates, tuning.bat.max_hit_distance)
        else {
            debug!("Can't swing - no ball in range");
            continue;
        };
        let Ok((_, ball, mut motion, mut boost, mut flags, mut owner, mut window)) =
            balls.get_mut(entity)
        else {
            continue;
        };
        let Some(strike) = plan_strike(player, facing.0, ball.translation, boss, &tuning.bat) else {
            continue;
        };

        swing.try_swing(&tuning.bat);
        let speed = boost.apply(&mut motion, strike.direction, strike.multiplier, &tuning.ball);
        flags.perfect_hit = strike.is_perfect();
        flags.struck_by_player = true;
        if strike.class.transfers_ownership() && window.claim_for_player(&mut owner) {
            bus.emit(CombatEvent::OwnershipChanged {
                owner: BallOwner::Player,
            });
        }

        debug!("{:?} hit, ball speed {:.1}", strike.class, speed);
        bus.emit(CombatEvent::BallStruck {
            class: strike.class,
            multiplier: strike.multiplier,
            speed,
        });
    }
}

pub fn tick_boss(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut bus: ResMut<EventBus>,
    mut rng: ResMut<CombatRng>,
    mut bosses: Query<(&Transform, &mut BossStats, &mut StateMachine), With<Boss>>,
) {
    for (transform, mut stats, mut machine) in &mut bosses {
        let mut spawned: Vec<Vec3> = Vec::new();
        machine.tick(
            &mut BossContext {
                stats: &mut stats,
                tuning: &tuning.boss,
                spawner: &mut spawned,
                events: &mut bus,
                position: transform.translation,
            },
            time.delta_secs(),
        );
        for position in spawned {
            spawn_ball(&mut commands, position, &tuning.ball, &mut rng.0);
        }
    }
}

pub fn tick_ownership(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut bus: ResMut<EventBus>,
    mut balls: Query<(&mut BallOwner, &mut OwnershipWindow), With<Ball>>,
) {
    for (mut owner, mut window) in &mut balls {
        if window.tick(&mut owner, tuning.ownership.timeout, time.delta_secs()) {
            debug!("Ball ownership lapsed back to the boss");
            bus.emit(CombatEvent::OwnershipChanged {
                owner: BallOwner::Boss,
            });
        }
    }
}

/// Boost decay, constant-speed travel and curving
pub fn step_balls(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    policy: Res<ActiveTargetPolicy>,
    bosses: Query<(&Transform, &BossStats), (With<Boss>, Without<Ball>)>,
    players: Query<(&Transform, &Facing), (With<Player>, Without<Ball>)>,
    mut balls: Query<
        (&mut Transform, &mut BallMotion, &mut BoostWindow, &BallFlags, &BallOwner),
        With<Ball>,
    >,
) {
    let dt = time.delta_secs();
    let boss = bosses
        .iter()
        .find(|(_, stats)| !stats.is_defeated())
        .map(|(transform, _)| transform.translation);
    let player = players.single().ok();
    let player_point = player.map(|(transform, _)| transform.translation);
    let bat_point = player.map(|(transform, facing)| {
        transform.translation + facing.0 * tuning.player.radius
    });

    for (mut transform, mut motion, mut boost, flags, owner) in &mut balls {
        boost.step(&mut motion, dt);
        let target = policy.resolve(&TargetContext {
            perfect_hit: flags.perfect_hit,
            owner: *owner,
            boss,
            player: player_point,
            bat: bat_point,
        });
        let velocity = motion.step(transform.translation, target, &tuning.ball, dt);
        transform.translation += velocity * dt;
    }
}

/// Everything a collision can set off outside the ball itself
struct ImpactSinks<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    bus: &'a mut EventBus,
    score: &'a mut dyn ScoreSink,
    hit_stop: &'a mut HitStop,
    shake: &'a mut ScreenShake,
    rng: &'a mut CombatRng,
}

impl ImpactSinks<'_, '_, '_> {
    fn play(&mut self, effects: CollisionEffects, contact: &Contact, speed: f32, tuning: &ImpactTuning) {
        self.bus.emit(CombatEvent::BallCollided {
            surface: contact.surface,
            speed,
            point: contact.point,
            normal: contact.normal,
        });

        if let Some(duration) = effects.hit_stop {
            self.hit_stop.begin(duration);
            self.bus.emit(CombatEvent::HitStopStarted { duration });
        }
        if let Some(magnitude) = effects.shake {
            self.shake.start(magnitude, tuning.shake_duration);
            self.bus.emit(CombatEvent::ScreenShakeStarted { magnitude });
        }
        if effects.spark {
            let variant = self.rng.0.gen_range(0..tuning.spark_variants.max(1));
            self.commands.spawn((
                Spark {
                    variant,
                    normal: contact.normal,
                },
                Lifetime(tuning.spark_lifetime),
                Transform::from_translation(contact.point),
            ));
            self.bus.emit(CombatEvent::SparkSpawned {
                point: contact.point,
                variant,
            });
        }
        if let Some(points) = effects.points {
            let total = self.score.add_points(points);
            self.commands.spawn((
                ScorePopup { points },
                Lifetime(tuning.score_popup_lifetime),
                Transform::from_translation(contact.point),
            ));
            self.bus.emit(CombatEvent::PointsAwarded {
                points,
                total,
                point: contact.point,
            });
        }
    }
}

/// Triggers, boss body and walls, in that order
#[allow(clippy::too_many_arguments)]
pub fn resolve_ball_contacts(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    arena: Res<Arena>,
    mut bus: ResMut<EventBus>,
    mut score: ResMut<Score>,
    mut hit_stop: ResMut<HitStop>,
    mut shake: ResMut<ScreenShake>,
    mut rng: ResMut<CombatRng>,
    mut bosses: Query<(&Transform, &mut BossStats, &mut StateMachine), (With<Boss>, Without<Ball>)>,
    mut players: Query<(&Transform, &mut PlayerHealth), (With<Player>, Without<Ball>)>,
    mut balls: Query<
        (
            Entity,
            &mut Transform,
            &mut BallMotion,
            &mut BallFlags,
            &BallOwner,
            &mut TriggerPresence,
        ),
        With<Ball>,
    >,
) {
    let ball_radius = tuning.ball.radius;

    'balls: for (entity, mut transform, mut motion, mut flags, owner, mut presence) in &mut balls {
        let position = transform.translation;

        if let Ok((player, mut health)) = players.single_mut() {
            let inside = overlaps(position, ball_radius, player.translation, tuning.player.radius);
            if presence.update(TriggerZone::Player, inside)
                && matches!(
                    resolve_trigger(&mut flags, *owner, TriggerZone::Player),
                    TriggerOutcome::DamagePlayer
                )
            {
                match health.damage(tuning.player.ball_damage, tuning.player.damage_break_duration) {
                    DamageResult::Damaged { health } => {
                        debug!("Player hit, health {}", health);
                        bus.emit(CombatEvent::PlayerDamaged { health });
                    }
                    DamageResult::Defeated => {
                        info!("Player defeated");
                        bus.emit(CombatEvent::PlayerDamaged {
                            health: health.health,
                        });
                        bus.emit(CombatEvent::PlayerDefeated);
                    }
                    DamageResult::Ignored => {}
                }
            }
        }

        for (boss, mut stats, mut machine) in &mut bosses {
            if stats.is_defeated() {
                continue;
            }
            let center = boss.translation;

            let inside = overlaps(position, ball_radius, center, boss_trigger_radius(tuning.boss.radius));
            if presence.update(TriggerZone::Boss, inside) {
                if let TriggerOutcome::BossContact(contact) =
                    resolve_trigger(&mut flags, *owner, TriggerZone::Boss)
                {
                    let mut spawned: Vec<Vec3> = Vec::new();
                    let consumed = machine.handle_ball_contact(
                        &mut BossContext {
                            stats: &mut stats,
                            tuning: &tuning.boss,
                            spawner: &mut spawned,
                            events: &mut bus,
                            position: center,
                        },
                        contact,
                    );
                    if consumed {
                        commands.entity(entity).despawn();
                        continue 'balls;
                    }
                }
            }

            if let Some(contact) = sphere_contact(
                position,
                ball_radius,
                center,
                tuning.boss.radius,
                motion.direction(),
                Surface::Boss,
            ) {
                let speed = motion.current_speed();
                let effects = resolve_collision(&mut motion, &mut flags, &contact, &tuning.impact);
                ImpactSinks {
                    commands: &mut commands,
                    bus: &mut bus,
                    score: &mut *score,
                    hit_stop: &mut hit_stop,
                    shake: &mut shake,
                    rng: &mut rng,
                }
                .play(effects, &contact, speed, &tuning.impact);
            }
        }

        if let Some(contact) = arena.wall_contact(position, ball_radius, motion.direction()) {
            let speed = motion.current_speed();
            let effects = resolve_collision(&mut motion, &mut flags, &contact, &tuning.impact);
            ImpactSinks {
                commands: &mut commands,
                bus: &mut bus,
                score: &mut *score,
                hit_stop: &mut hit_stop,
                shake: &mut shake,
                rng: &mut rng,
            }
            .play(effects, &contact, speed, &tuning.impact);
        }
        transform.translation = arena.clamp(transform.translation, ball_radius);
    }
}

/// Decide the fight once either side is down or time runs out
pub fn check_fight_end(
    time: Res<Time>,
    mut fight: ResMut<FightState>,
    mut bus: ResMut<EventBus>,
    bosses: Query<&BossStats, With<Boss>>,
    players: Query<&PlayerHealth, With<Player>>,
) {
    fight.elapsed += time.delta_secs();

    let outcome = if bosses.iter().any(|stats| stats.is_defeated()) {
        Some(FightOutcome::BossDefeated)
    } else if players.iter().any(|health| health.is_defeated()) {
        Some(FightOutcome::PlayerDefeated)
    } else if fight.time_limit.is_some_and(|limit| fight.elapsed >= limit) {
        Some(FightOutcome::TimeLimit)
    } else {
        None
    };

    if let Some(outcome) = outcome {
        info!("Fight over after {:.1}s: {:?}", fight.elapsed, outcome);
        fight.outcome = Some(outcome);
        bus.emit(CombatEvent::FightEnded {
            outcome,
            duration: fight.elapsed,
        });
    }
}

/// Move this frame's events to the processed log, echoing them at debug level
pub fn log_combat_events(mut bus: ResMut<EventBus>) {
    for event in bus.drain() {
        debug!("{}", serialize_event(event.time_ms, &event.event));
    }
}
