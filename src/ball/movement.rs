//! Constant-speed ground-plane travel with curving toward a target
//!
//! The stored direction and speed are the authority: every step the velocity
//! is rebuilt from them instead of trusting whatever the integrator left.

use bevy::prelude::*;

use super::targeting::CurveTarget;
use crate::helpers::{flat_direction, flatten, slerp_direction};
use crate::tuning::BallTuning;

#[derive(Component, Debug, Clone, Default)]
pub struct BallMotion {
    direction: Vec3,
    velocity: Vec3,
    base_speed: f32,
    current_speed: f32,
    initialized: bool,
}

impl BallMotion {
    pub fn new(base_speed: f32, direction: Vec3) -> Self {
        let mut motion = Self::default();
        motion.initialize(base_speed, direction);
        motion
    }

    /// Start travelling at base speed. A zero direction leaves the ball
    /// uninitialized.
    pub fn initialize(&mut self, base_speed: f32, direction: Vec3) {
        let Some(direction) = flat_direction(direction) else {
            warn!("Ball initialized with a zero direction, ignoring");
            return;
        };
        self.base_speed = base_speed;
        self.current_speed = base_speed;
        self.direction = direction;
        self.velocity = direction * base_speed;
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Flatten, normalize and apply immediately.
    /// Returns false (and keeps the old direction) for a zero vector.
    pub fn set_direction(&mut self, direction: Vec3) -> bool {
        match flat_direction(direction) {
            Some(dir) => {
                self.direction = dir;
                self.velocity = dir * self.current_speed;
                true
            }
            None => {
                warn!("Ignoring zero-length ball direction");
                false
            }
        }
    }

    /// Set the travel speed, never below base speed
    pub fn set_speed(&mut self, speed: f32) {
        self.current_speed = speed.max(self.base_speed);
        self.velocity = self.direction * self.current_speed;
    }

    /// Overwrite the raw velocity, as an outside impulse would
    pub fn push(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// One fixed step. Returns the velocity to integrate with.
    pub fn step(&mut self, position: Vec3, target: Option<CurveTarget>, tuning: &BallTuning, dt: f32) -> Vec3 {
        if !self.initialized {
            warn_once!("Ball stepped before initialization, skipping");
            return Vec3::ZERO;
        }

        self.velocity = flatten(self.velocity);
        if let Some(dir) = flat_direction(self.velocity) {
            self.direction = dir;
        }
        self.velocity = self.direction * self.current_speed;

        if let Some(target) = target {
            self.curve_toward(position, target, tuning, dt);
        }
        self.velocity
    }

    fn curve_toward(&mut self, position: Vec3, target: CurveTarget, tuning: &BallTuning, dt: f32) {
        // Zero velocity would normalize into NaN
        if self.velocity.length() <= crate::constants::DIRECTION_EPSILON {
            return;
        }
        let Some(to_target) = flat_direction(target.point - position) else {
            return;
        };

        let mut factor = tuning.curve_strength
            * tuning.curve_response
            * dt
            * (self.base_speed / self.current_speed);
        if target.homing {
            factor *= tuning.perfect_curve_factor;
        }

        self.direction = slerp_direction(self.direction, to_target, factor);
        self.velocity = self.direction * self.current_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn target(point: Vec3, homing: bool) -> Option<CurveTarget> {
        Some(CurveTarget { point, homing })
    }

    fn angle_to(motion: &BallMotion, position: Vec3, point: Vec3) -> f32 {
        motion.direction().angle_between((point - position).normalize())
    }

    #[test]
    fn test_initialize_flattens() {
        let motion = BallMotion::new(5.0, Vec3::new(3.0, 2.0, 4.0));
        assert!((motion.direction() - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
        assert!((motion.velocity().length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_stays_uninitialized() {
        let mut motion = BallMotion::new(5.0, Vec3::Y);
        assert!(!motion.is_initialized());
        assert_eq!(motion.step(Vec3::ZERO, None, &BallTuning::default(), DT), Vec3::ZERO);
    }

    #[test]
    fn test_step_keeps_constant_speed() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        motion.push(Vec3::new(0.0, 3.0, 1.0));
        let velocity = motion.step(Vec3::ZERO, None, &BallTuning::default(), DT);
        assert_eq!(velocity.y, 0.0);
        assert!((velocity.length() - 5.0).abs() < 1e-5);
        assert!((motion.direction() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_zero_velocity_keeps_direction() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        motion.push(Vec3::ZERO);
        let velocity = motion.step(Vec3::ZERO, target(Vec3::Z * 10.0, false), &BallTuning::default(), DT);
        assert!(velocity.is_finite());
        assert!((velocity.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_curves_toward_target() {
        let tuning = BallTuning::default();
        let mut motion = BallMotion::new(5.0, Vec3::X);
        let point = Vec3::new(0.0, 0.0, 10.0);
        let before = angle_to(&motion, Vec3::ZERO, point);
        motion.step(Vec3::ZERO, target(point, false), &tuning, DT);
        let after = angle_to(&motion, Vec3::ZERO, point);
        assert!(after < before);
    }

    #[test]
    fn test_homing_curves_harder() {
        let tuning = BallTuning::default();
        let point = Vec3::new(0.0, 0.0, 10.0);
        let mut normal = BallMotion::new(5.0, Vec3::X);
        let mut homing = BallMotion::new(5.0, Vec3::X);
        normal.step(Vec3::ZERO, target(point, false), &tuning, DT);
        homing.step(Vec3::ZERO, target(point, true), &tuning, DT);
        assert!(angle_to(&homing, Vec3::ZERO, point) < angle_to(&normal, Vec3::ZERO, point));
    }

    #[test]
    fn test_boosted_ball_curves_less() {
        let tuning = BallTuning::default();
        let point = Vec3::new(0.0, 0.0, 10.0);
        let mut slow = BallMotion::new(5.0, Vec3::X);
        let mut fast = BallMotion::new(5.0, Vec3::X);
        fast.set_speed(30.0);
        slow.step(Vec3::ZERO, target(point, false), &tuning, DT);
        fast.step(Vec3::ZERO, target(point, false), &tuning, DT);
        assert!(angle_to(&fast, Vec3::ZERO, point) > angle_to(&slow, Vec3::ZERO, point));
    }

    #[test]
    fn test_set_direction_rejects_zero() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        assert!(!motion.set_direction(Vec3::Y * 2.0));
        assert_eq!(motion.direction(), Vec3::X);
        assert!(motion.set_direction(Vec3::new(0.0, 1.0, -2.0)));
        assert!((motion.direction() + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_speed_never_below_base() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        motion.set_speed(1.0);
        assert_eq!(motion.current_speed(), 5.0);
    }
}
