//! Bat swings: finding a ball, classifying the hit, launching it

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::helpers::{flat_direction, flat_distance};
use crate::tuning::BatTuning;

/// How a swing connected, decided by distance to the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitClass {
    /// Out of reach
    Rejected,
    CloseRange,
    Normal,
    /// Just inside max reach with a boss to aim at
    Perfect,
}

impl HitClass {
    pub fn bounce_multiplier(&self, tuning: &BatTuning) -> Option<f32> {
        match self {
            HitClass::Rejected => None,
            HitClass::CloseRange => Some(tuning.close_range_bounce_multiplier),
            HitClass::Normal => Some(tuning.normal_bounce_multiplier),
            HitClass::Perfect => Some(tuning.normal_bounce_multiplier * tuning.perfect_bonus_factor),
        }
    }

    /// Close-range pokes leave ownership where it was
    pub fn transfers_ownership(&self) -> bool {
        matches!(self, HitClass::Normal | HitClass::Perfect)
    }
}

pub fn classify_hit(distance: f32, boss_present: bool, tuning: &BatTuning) -> HitClass {
    if distance > tuning.max_hit_distance {
        HitClass::Rejected
    } else if distance >= tuning.max_hit_distance - tuning.perfect_hit_threshold && boss_present {
        HitClass::Perfect
    } else if distance <= tuning.close_range_distance {
        HitClass::CloseRange
    } else {
        HitClass::Normal
    }
}

/// A resolved swing, ready to apply to the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub class: HitClass,
    pub direction: Vec3,
    pub multiplier: f32,
}

impl Strike {
    pub fn is_perfect(&self) -> bool {
        self.class == HitClass::Perfect
    }
}

/// Work out where and how hard a swing sends the ball.
/// Perfect hits fly from the ball to the boss; the rest follow `facing`.
pub fn plan_strike(
    player: Vec3,
    facing: Vec3,
    ball: Vec3,
    boss: Option<Vec3>,
    tuning: &BatTuning,
) -> Option<Strike> {
    let class = classify_hit(flat_distance(player, ball), boss.is_some(), tuning);
    let multiplier = class.bounce_multiplier(tuning)?;

    let aim = match (class, boss) {
        (HitClass::Perfect, Some(boss)) => boss - ball,
        _ => facing,
    };
    let Some(direction) = flat_direction(aim) else {
        warn!("Swing has no usable direction, ignoring");
        return None;
    };

    Some(Strike {
        class,
        direction,
        multiplier,
    })
}

/// Closest ball within reach, as (entity, distance)
pub fn closest_ball_in_range(
    player: Vec3,
    balls: impl IntoIterator<Item = (Entity, Vec3)>,
    max_distance: f32,
) -> Option<(Entity, f32)> {
    balls
        .into_iter()
        .map(|(entity, position)| (entity, flat_distance(player, position)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Swing cooldown
#[derive(Component, Debug, Default)]
pub struct BatSwing {
    cooldown: f32,
}

impl BatSwing {
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Start the cooldown. Returns false if still cooling down.
    pub fn try_swing(&mut self, tuning: &BatTuning) -> bool {
        if !self.ready() {
            return false;
        }
        self.cooldown = tuning.swing_cooldown;
        true
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        let t = BatTuning::default();
        assert_eq!(classify_hit(4.5, true, &t), HitClass::Rejected);
        assert_eq!(classify_hit(4.0, true, &t), HitClass::Perfect);
        let band_edge = t.max_hit_distance - t.perfect_hit_threshold;
        assert_eq!(classify_hit(band_edge, true, &t), HitClass::Perfect);
        assert_eq!(classify_hit(3.5, true, &t), HitClass::Normal);
        assert_eq!(classify_hit(2.0, true, &t), HitClass::CloseRange);
        assert_eq!(classify_hit(0.5, true, &t), HitClass::CloseRange);
    }

    #[test]
    fn test_no_perfect_without_boss() {
        let t = BatTuning::default();
        assert_eq!(classify_hit(3.9, false, &t), HitClass::Normal);
    }

    #[test]
    fn test_perfect_multiplier() {
        let t = BatTuning::default();
        assert_eq!(HitClass::Perfect.bounce_multiplier(&t), Some(3.0));
        assert_eq!(HitClass::CloseRange.bounce_multiplier(&t), Some(3.5));
        assert_eq!(HitClass::Rejected.bounce_multiplier(&t), None);
    }

    #[test]
    fn test_perfect_aims_at_boss() {
        let t = BatTuning::default();
        let boss = Vec3::new(0.0, 0.0, -6.0);
        let ball = Vec3::new(3.8, 0.0, 5.0);
        let strike = plan_strike(Vec3::new(0.0, 0.0, 5.0), Vec3::X, ball, Some(boss), &t).unwrap();

        assert!(strike.is_perfect());
        assert!((strike.direction - (boss - ball).normalize()).length() < 1e-5);
        assert_eq!(strike.multiplier, 3.0);
    }

    #[test]
    fn test_normal_follows_facing() {
        let t = BatTuning::default();
        let strike = plan_strike(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(3.0, 0.0, 0.0),
            Some(Vec3::new(0.0, 0.0, -6.0)),
            &t,
        )
        .unwrap();
        assert_eq!(strike.class, HitClass::Normal);
        assert_eq!(strike.direction, Vec3::NEG_Z);
    }

    #[test]
    fn test_out_of_reach_is_none() {
        let t = BatTuning::default();
        assert!(plan_strike(Vec3::ZERO, Vec3::X, Vec3::new(5.0, 0.0, 0.0), None, &t).is_none());
    }

    #[test]
    fn test_closest_ball_wins() {
        let far = Entity::from_raw_u32(1).unwrap();
        let near = Entity::from_raw_u32(2).unwrap();
        let out = Entity::from_raw_u32(3).unwrap();
        let balls = [
            (far, Vec3::new(3.0, 0.0, 0.0)),
            (near, Vec3::new(0.0, 0.0, 1.0)),
            (out, Vec3::new(0.0, 0.0, 0.5) * 20.0),
        ];
        let (entity, distance) = closest_ball_in_range(Vec3::ZERO, balls, 4.0).unwrap();
        assert_eq!(entity, near);
        assert_eq!(distance, 1.0);
    }

    #[test]
    fn test_swing_cooldown() {
        let t = BatTuning::default();
        let mut swing = BatSwing::default();
        assert!(swing.try_swing(&t));
        assert!(!swing.try_swing(&t));
        swing.tick(0.3);
        assert!(!swing.ready());
        swing.tick(0.3);
        assert!(swing.try_swing(&t));
    }
}
