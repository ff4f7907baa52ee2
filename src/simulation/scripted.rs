//! Scripted player for headless fights
//!
//! Engages the nearest boss-owned ball, backing off to perfect range when it
//! decides to go for a stagger and stepping in for a normal hit otherwise.
//! Skill is the chance of going for the perfect band on each swing.

use bevy::prelude::*;
use rand::Rng;

use crate::ball::{Ball, BallOwner};
use crate::boss::{Boss, BossStats};
use crate::constants::PLAYER_START;
use crate::effects::CombatRng;
use crate::helpers::{flat_direction, flat_distance};
use crate::player::{BatSwing, Player, PlayerInput};
use crate::tuning::{BatTuning, CombatTuning};

/// How close to the chosen distance the player has to be to swing
const SWING_TOLERANCE: f32 = 0.12;
/// Close enough to home to stop walking
const HOME_TOLERANCE: f32 = 0.2;

#[derive(Resource, Debug, Clone)]
pub struct ScriptedPlayer {
    skill: f32,
    go_for_perfect: bool,
}

impl ScriptedPlayer {
    pub fn new(skill: f32) -> Self {
        Self {
            skill: skill.clamp(0.0, 1.0),
            go_for_perfect: true,
        }
    }

    /// Distance to hold from the ball for the current plan
    pub fn desired_distance(&self, tuning: &BatTuning) -> f32 {
        let band_start = tuning.max_hit_distance - tuning.perfect_hit_threshold;
        if self.go_for_perfect {
            band_start + tuning.perfect_hit_threshold * 0.5
        } else {
            (tuning.close_range_distance + band_start) * 0.5
        }
    }

    fn reroll(&mut self, rng: &mut impl Rng) {
        self.go_for_perfect = rng.gen_bool(self.skill as f64);
    }
}

/// What the player does this frame, given where everything is
pub fn plan_input(
    scripted: &ScriptedPlayer,
    player: Vec3,
    ball: Option<Vec3>,
    boss: Option<Vec3>,
    swing_ready: bool,
    tuning: &BatTuning,
) -> PlayerInput {
    let aim = boss
        .and_then(|boss| flat_direction(boss - player))
        .unwrap_or(Vec3::NEG_Z);

    let Some(ball) = ball else {
        let movement = if flat_distance(player, PLAYER_START) > HOME_TOLERANCE {
            flat_direction(PLAYER_START - player).unwrap_or(Vec3::ZERO)
        } else {
            Vec3::ZERO
        };
        return PlayerInput {
            movement,
            aim,
            swing_pressed: false,
        };
    };

    let distance = flat_distance(player, ball);
    let error = distance - scripted.desired_distance(tuning);
    let toward_ball = flat_direction(ball - player).unwrap_or(Vec3::ZERO);

    let movement = if error.abs() <= SWING_TOLERANCE {
        Vec3::ZERO
    } else {
        toward_ball * error.signum()
    };
    let swing_pressed =
        swing_ready && error.abs() <= SWING_TOLERANCE && distance <= tuning.max_hit_distance;

    PlayerInput {
        movement,
        aim,
        swing_pressed,
    }
}

/// Runs before `move_player`, replacing keyboard/gamepad input
pub fn drive_scripted_player(
    tuning: Res<CombatTuning>,
    mut scripted: ResMut<ScriptedPlayer>,
    mut rng: ResMut<CombatRng>,
    mut players: Query<(&Transform, &mut PlayerInput, &BatSwing), With<Player>>,
    balls: Query<(&Transform, &BallOwner), With<Ball>>,
    bosses: Query<(&Transform, &BossStats), With<Boss>>,
) {
    let boss = bosses
        .iter()
        .find(|(_, stats)| !stats.is_defeated())
        .map(|(transform, _)| transform.translation);

    for (transform, mut input, swing) in &mut players {
        let player = transform.translation;
        // Player-owned balls are already on their way to the boss
        let ball = balls
            .iter()
            .filter(|(_, owner)| **owner == BallOwner::Boss)
            .map(|(ball, _)| ball.translation)
            .min_by(|a, b| flat_distance(player, *a).total_cmp(&flat_distance(player, *b)));

        *input = plan_input(&scripted, player, ball, boss, swing.ready(), &tuning.bat);
        if input.swing_pressed {
            scripted.reroll(&mut rng.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSS: Vec3 = Vec3::new(0.0, 0.0, -6.0);

    #[test]
    fn test_desired_distance_sits_in_band() {
        let tuning = BatTuning::default();
        let mut scripted = ScriptedPlayer::new(1.0);
        let perfect = scripted.desired_distance(&tuning);
        assert!(perfect > tuning.max_hit_distance - tuning.perfect_hit_threshold);
        assert!(perfect < tuning.max_hit_distance);

        scripted.go_for_perfect = false;
        let normal = scripted.desired_distance(&tuning);
        assert!(normal > tuning.close_range_distance);
        assert!(normal < tuning.max_hit_distance - tuning.perfect_hit_threshold);
    }

    #[test]
    fn test_swings_at_desired_distance() {
        let tuning = BatTuning::default();
        let scripted = ScriptedPlayer::new(1.0);
        let player = Vec3::new(0.0, 0.0, 4.0);
        let ball = player - Vec3::Z * scripted.desired_distance(&tuning);

        let input = plan_input(&scripted, player, Some(ball), Some(BOSS), true, &tuning);
        assert!(input.swing_pressed);
        assert_eq!(input.movement, Vec3::ZERO);
        assert!((input.aim - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_no_swing_while_cooling_down() {
        let tuning = BatTuning::default();
        let scripted = ScriptedPlayer::new(1.0);
        let player = Vec3::new(0.0, 0.0, 4.0);
        let ball = player - Vec3::Z * scripted.desired_distance(&tuning);

        let input = plan_input(&scripted, player, Some(ball), Some(BOSS), false, &tuning);
        assert!(!input.swing_pressed);
    }

    #[test]
    fn test_backs_off_from_close_ball() {
        let tuning = BatTuning::default();
        let scripted = ScriptedPlayer::new(1.0);
        let player = Vec3::new(0.0, 0.0, 4.0);
        let ball = Vec3::new(0.0, 0.0, 3.0);

        let input = plan_input(&scripted, player, Some(ball), Some(BOSS), true, &tuning);
        assert!(!input.swing_pressed);
        // Ball is at -Z, so backing off means +Z
        assert!(input.movement.z > 0.0);
    }

    #[test]
    fn test_walks_home_without_ball() {
        let tuning = BatTuning::default();
        let scripted = ScriptedPlayer::new(0.5);
        let input = plan_input(&scripted, Vec3::new(3.0, 0.0, 5.0), None, Some(BOSS), true, &tuning);
        assert!(input.movement.x < 0.0);
        assert!(!input.swing_pressed);
    }

    #[test]
    fn test_zero_skill_never_goes_for_perfect() {
        let mut scripted = ScriptedPlayer::new(0.0);
        let mut rng = CombatRng::seeded(7);
        for _ in 0..10 {
            scripted.reroll(&mut rng.0);
            assert!(!scripted.go_for_perfect);
        }
    }
}
