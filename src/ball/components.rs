//! Ball-related components

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for ball entities
#[derive(Component)]
pub struct Ball;

/// Which side is currently credited with directing the ball
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallOwner {
    Player,
    #[default]
    Boss,
}

/// Per-ball hit state
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BallFlags {
    /// Last strike landed in the perfect band; cleared by any contact
    pub perfect_hit: bool,
    /// The player just struck this ball, so touching the player is harmless.
    /// Cleared on the next collision.
    pub struck_by_player: bool,
}

impl BallFlags {
    /// Any collision or trigger ends the perfect flight
    pub fn clear_on_contact(&mut self) {
        self.perfect_hit = false;
    }
}
