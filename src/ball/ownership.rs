//! Player ownership that lapses back to the boss

use bevy::prelude::*;

use super::components::BallOwner;

#[derive(Component, Debug, Clone, Default)]
pub struct OwnershipWindow {
    elapsed: f32,
}

impl OwnershipWindow {
    /// Hand the ball to the player and restart the clock.
    /// Returns true if the owner actually changed.
    pub fn claim_for_player(&mut self, owner: &mut BallOwner) -> bool {
        self.elapsed = 0.0;
        let changed = *owner != BallOwner::Player;
        *owner = BallOwner::Player;
        changed
    }

    /// Returns true on the step ownership reverts to the boss
    pub fn tick(&mut self, owner: &mut BallOwner, timeout: f32, dt: f32) -> bool {
        if *owner != BallOwner::Player {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= timeout {
            self.elapsed = 0.0;
            *owner = BallOwner::Boss;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
