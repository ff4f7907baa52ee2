//! Boss health and attack gate

use bevy::prelude::*;

/// Marker for the boss entity
#[derive(Component)]
pub struct Boss;

/// Health and the "may attack" gate
#[derive(Component, Debug, Clone)]
pub struct BossStats {
    pub health: i32,
    /// True while the boss is allowed to throw a new ball
    pub has_ball: bool,
}

impl BossStats {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            has_ball: true,
        }
    }

    /// Apply damage. Returns true if this blow defeated the boss.
    pub fn damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_defeated();
        self.health -= amount;
        was_alive && self.is_defeated()
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}
