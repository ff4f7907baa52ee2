//! Collision and trigger resolution for a single ball
//!
//! Pure functions over ball state. Side effects the outer layers care about
//! (hit-stop, shake, sparks, points) come back as a `CollisionEffects` value.

use bevy::prelude::*;

use super::components::{BallFlags, BallOwner};
use super::movement::BallMotion;
use crate::boss::BallContact;
use crate::events::Surface;
use crate::helpers::reflect;
use crate::tuning::ImpactTuning;

/// A solid contact reported by the physics layer
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub point: Vec3,
    pub normal: Vec3,
    pub surface: Surface,
}

/// Speed-gated secondary effects of one collision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionEffects {
    /// Real-time pause length
    pub hit_stop: Option<f32>,
    /// Camera shake peak magnitude
    pub shake: Option<f32>,
    pub spark: bool,
    pub points: Option<u32>,
}

impl CollisionEffects {
    pub fn for_speed(speed: f32, tuning: &ImpactTuning) -> Self {
        let mut effects = Self::default();

        if speed >= tuning.hit_stop_speed {
            effects.hit_stop = Some(tuning.hit_stop_duration);
            // Grows with how far past the threshold the ball is going
            effects.shake = Some(tuning.shake_strength * speed / tuning.hit_stop_speed);
        }
        effects.spark = speed >= tuning.spark_speed;
        if speed > tuning.score_speed {
            let points =
                (tuning.score_base_points * speed / tuning.score_speed_normalization).round();
            effects.points = Some(points as u32);
        }
        effects
    }
}

/// Bounce the ball off a solid contact.
/// Clears both hit flags; the reflected direction goes straight into `motion`.
pub fn resolve_collision(
    motion: &mut BallMotion,
    flags: &mut BallFlags,
    contact: &Contact,
    tuning: &ImpactTuning,
) -> CollisionEffects {
    let effects = CollisionEffects::for_speed(motion.current_speed(), tuning);

    flags.clear_on_contact();
    flags.struck_by_player = false;

    match reflect(motion.direction(), contact.normal) {
        Some(reflected) => {
            motion.set_direction(reflected);
        }
        None => warn!("Collision with a zero normal against {:?}, not reflecting", contact.surface),
    }
    debug!(
        "Ball hit {:?} at speed {:.1}",
        contact.surface,
        motion.current_speed()
    );
    effects
}

/// Trigger volumes a ball can pass into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerZone {
    Player,
    Boss,
}

/// What entering a trigger means for the rest of the fight
#[derive(Debug, Clone, Copy)]
pub enum TriggerOutcome {
    /// The player got hit by a ball they did not just strike
    DamagePlayer,
    /// Contact to offer to the boss state machine, captured before the flags cleared
    BossContact(BallContact),
    Nothing,
}

pub fn resolve_trigger(flags: &mut BallFlags, owner: BallOwner, zone: TriggerZone) -> TriggerOutcome {
    let outcome = match zone {
        TriggerZone::Player if !flags.struck_by_player => TriggerOutcome::DamagePlayer,
        TriggerZone::Player => TriggerOutcome::Nothing,
        TriggerZone::Boss => TriggerOutcome::BossContact(BallContact {
            perfect_hit: flags.perfect_hit,
            owner,
        }),
    };
    flags.clear_on_contact();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(normal: Vec3) -> Contact {
        Contact {
            point: Vec3::ZERO,
            normal,
            surface: Surface::Wall,
        }
    }

    #[test]
    fn test_collision_reflects_and_clears_flags() {
        let mut motion = BallMotion::new(5.0, Vec3::new(1.0, 0.0, -1.0));
        let mut flags = BallFlags {
            perfect_hit: true,
            struck_by_player: true,
        };

        resolve_collision(&mut motion, &mut flags, &wall(Vec3::Z), &ImpactTuning::default());

        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((motion.direction() - expected).length() < 1e-5);
        assert!(!flags.perfect_hit);
        assert!(!flags.struck_by_player);
    }

    #[test]
    fn test_zero_normal_keeps_direction() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        let mut flags = BallFlags::default();
        resolve_collision(&mut motion, &mut flags, &wall(Vec3::ZERO), &ImpactTuning::default());
        assert_eq!(motion.direction(), Vec3::X);
    }

    #[test]
    fn test_slow_collision_has_no_effects() {
        let effects = CollisionEffects::for_speed(5.0, &ImpactTuning::default());
        assert_eq!(effects, CollisionEffects::default());
    }

    #[test]
    fn test_fast_collision_effects() {
        let tuning = ImpactTuning::default();

        let at_threshold = CollisionEffects::for_speed(40.0, &tuning);
        assert_eq!(at_threshold.hit_stop, Some(tuning.hit_stop_duration));
        assert!(at_threshold.spark);
        // Points need strictly more than the scoring speed
        assert_eq!(at_threshold.points, None);

        let faster = CollisionEffects::for_speed(52.5, &tuning);
        assert_eq!(faster.points, Some(131));
        assert!(faster.shake.unwrap() > at_threshold.shake.unwrap());
    }

    #[test]
    fn test_spark_threshold() {
        let tuning = ImpactTuning::default();
        assert!(!CollisionEffects::for_speed(19.0, &tuning).spark);
        assert!(CollisionEffects::for_speed(30.0, &tuning).spark);
    }

    #[test]
    fn test_player_trigger_damages_unless_struck() {
        let mut flags = BallFlags::default();
        assert!(matches!(
            resolve_trigger(&mut flags, BallOwner::Boss, TriggerZone::Player),
            TriggerOutcome::DamagePlayer
        ));

        let mut struck = BallFlags {
            perfect_hit: true,
            struck_by_player: true,
        };
        assert!(matches!(
            resolve_trigger(&mut struck, BallOwner::Player, TriggerZone::Player),
            TriggerOutcome::Nothing
        ));
        assert!(!struck.perfect_hit);
    }

    #[test]
    fn test_boss_trigger_captures_then_clears() {
        let mut flags = BallFlags {
            perfect_hit: true,
            struck_by_player: true,
        };
        let outcome = resolve_trigger(&mut flags, BallOwner::Player, TriggerZone::Boss);
        match outcome {
            TriggerOutcome::BossContact(contact) => assert!(contact.can_stagger()),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!flags.perfect_hit);
    }
}
