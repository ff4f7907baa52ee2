//! Bat boost: a burst of speed that decays back to base speed

use bevy::prelude::*;

use super::movement::BallMotion;
use crate::tuning::{BallTuning, BoostEasing};

#[derive(Component, Debug, Clone, Default)]
pub struct BoostWindow {
    boosted_speed: f32,
    remaining: f32,
    duration: f32,
    easing: BoostEasing,
}

impl BoostWindow {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn boosted_speed(&self) -> f32 {
        self.boosted_speed
    }

    /// Launch the ball in `direction` at base × boost × bounce.
    /// Returns the boosted speed.
    pub fn apply(
        &mut self,
        motion: &mut BallMotion,
        direction: Vec3,
        bounce_multiplier: f32,
        tuning: &BallTuning,
    ) -> f32 {
        self.boosted_speed = motion.base_speed() * tuning.boost_multiplier * bounce_multiplier;
        self.duration = tuning.boost_duration;
        self.remaining = tuning.boost_duration;
        self.easing = tuning.boost_easing;

        motion.set_speed(self.boosted_speed);
        motion.set_direction(direction);
        self.boosted_speed
    }

    /// Decay toward base speed; pinned to base once the window closes
    pub fn step(&mut self, motion: &mut BallMotion, dt: f32) {
        if !self.is_active() {
            motion.set_speed(motion.base_speed());
            return;
        }

        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining == 0.0 || self.duration <= 0.0 {
            self.remaining = 0.0;
            motion.set_speed(motion.base_speed());
            return;
        }

        let progress = self.easing.apply(1.0 - self.remaining / self.duration);
        let speed = self.boosted_speed + (motion.base_speed() - self.boosted_speed) * progress;
        motion.set_speed(speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_normal_hit_boosts_to_thirty() {
        let tuning = BallTuning::default();
        let mut motion = BallMotion::new(5.0, Vec3::X);
        let mut boost = BoostWindow::default();

        let speed = boost.apply(&mut motion, Vec3::Z, 2.0, &tuning);
        assert_eq!(speed, 30.0);
        assert_eq!(motion.current_speed(), 30.0);
        assert_eq!(motion.direction(), Vec3::Z);
    }

    #[test]
    fn test_decay_is_monotonic_and_reaches_base() {
        for easing in [BoostEasing::Linear, BoostEasing::CubicOut] {
            let tuning = BallTuning {
                boost_easing: easing,
                ..Default::default()
            };
            let mut motion = BallMotion::new(5.0, Vec3::X);
            let mut boost = BoostWindow::default();
            boost.apply(&mut motion, Vec3::X, 3.5, &tuning);

            let mut last = motion.current_speed();
            for _ in 0..40 {
                boost.step(&mut motion, DT);
                assert!(motion.current_speed() <= last + 1e-4);
                assert!(motion.current_speed() >= 5.0);
                last = motion.current_speed();
            }
            assert!(!boost.is_active());
            assert_eq!(motion.current_speed(), 5.0);
        }
    }

    #[test]
    fn test_linear_halfway() {
        let tuning = BallTuning::default();
        let mut motion = BallMotion::new(5.0, Vec3::X);
        let mut boost = BoostWindow::default();
        boost.apply(&mut motion, Vec3::X, 2.0, &tuning);

        boost.step(&mut motion, 0.25);
        assert!((motion.current_speed() - 17.5).abs() < 1e-3);
    }

    #[test]
    fn test_cubic_sheds_speed_early() {
        let cubic = BallTuning {
            boost_easing: BoostEasing::CubicOut,
            ..Default::default()
        };
        let mut motion = BallMotion::new(5.0, Vec3::X);
        let mut boost = BoostWindow::default();
        boost.apply(&mut motion, Vec3::X, 2.0, &cubic);

        boost.step(&mut motion, 0.25);
        assert!(motion.current_speed() < 17.5);
    }

    #[test]
    fn test_inactive_window_pins_base() {
        let mut motion = BallMotion::new(5.0, Vec3::X);
        motion.set_speed(12.0);
        BoostWindow::default().step(&mut motion, DT);
        assert_eq!(motion.current_speed(), 5.0);
    }
}
