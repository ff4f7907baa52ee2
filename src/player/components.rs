//! Player-related components

use bevy::prelude::*;

/// Marker for the player entity
#[derive(Component)]
pub struct Player;

/// Direction the player (and bat) faces on the ground plane
#[derive(Component)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::NEG_Z) // Toward the boss end of the arena
    }
}

/// Per-frame intent, written by whatever drives the player
#[derive(Component, Default, Debug, Clone)]
pub struct PlayerInput {
    /// Desired movement on the ground plane (length <= 1)
    pub movement: Vec3,
    /// Where to face; ignored when zero
    pub aim: Vec3,
    pub swing_pressed: bool,
}
