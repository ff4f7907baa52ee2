//! Headless arena: the contact detection a physics engine would normally do
//!
//! Walls bound an XZ rectangle. The boss is a solid sphere wrapped in a
//! slightly larger trigger; the player is a trigger only.

use bevy::prelude::*;

use crate::ball::{Contact, TriggerZone};
use crate::constants::{ARENA_HALF_DEPTH, ARENA_HALF_WIDTH, BOSS_TRIGGER_MARGIN};
use crate::events::Surface;
use crate::helpers::{flat_direction, flat_distance, flatten};

#[derive(Resource, Debug, Clone)]
pub struct Arena {
    pub half_width: f32,
    pub half_depth: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            half_width: ARENA_HALF_WIDTH,
            half_depth: ARENA_HALF_DEPTH,
        }
    }
}

impl Arena {
    /// Wall the ball is pressing into, if any. Only reports walls the ball is
    /// moving toward, so a ball that already bounced is not bounced back.
    pub fn wall_contact(&self, position: Vec3, radius: f32, direction: Vec3) -> Option<Contact> {
        let walls = [
            (position.x + radius >= self.half_width, Vec3::NEG_X),
            (position.x - radius <= -self.half_width, Vec3::X),
            (position.z + radius >= self.half_depth, Vec3::NEG_Z),
            (position.z - radius <= -self.half_depth, Vec3::Z),
        ];
        walls
            .into_iter()
            .find(|(touching, normal)| *touching && direction.dot(*normal) < 0.0)
            .map(|(_, normal)| Contact {
                point: position - normal * radius,
                normal,
                surface: Surface::Wall,
            })
    }

    /// Keep a body of `radius` inside the walls
    pub fn clamp(&self, position: Vec3, radius: f32) -> Vec3 {
        Vec3::new(
            position
                .x
                .clamp(-self.half_width + radius, self.half_width - radius),
            position.y,
            position
                .z
                .clamp(-self.half_depth + radius, self.half_depth - radius),
        )
    }
}

/// Solid sphere contact, reported only while the ball moves inward
pub fn sphere_contact(
    ball: Vec3,
    ball_radius: f32,
    center: Vec3,
    radius: f32,
    direction: Vec3,
    surface: Surface,
) -> Option<Contact> {
    if flat_distance(ball, center) > ball_radius + radius {
        return None;
    }
    let normal = flat_direction(ball - center)?;
    if direction.dot(normal) >= 0.0 {
        return None;
    }
    Some(Contact {
        point: flatten(center) + normal * radius,
        normal,
        surface,
    })
}

/// Inside-or-not test for trigger volumes
pub fn overlaps(ball: Vec3, ball_radius: f32, center: Vec3, radius: f32) -> bool {
    flat_distance(ball, center) <= ball_radius + radius
}

/// Trigger radius around a boss body
pub fn boss_trigger_radius(boss_radius: f32) -> f32 {
    boss_radius + BOSS_TRIGGER_MARGIN
}

/// Which triggers a ball is currently inside, so only entries fire
#[derive(Component, Debug, Default)]
pub struct TriggerPresence {
    in_player: bool,
    in_boss: bool,
}

impl TriggerPresence {
    /// Record whether the ball is inside `zone`. Returns true on entry.
    pub fn update(&mut self, zone: TriggerZone, inside: bool) -> bool {
        let slot = match zone {
            TriggerZone::Player => &mut self.in_player,
            TriggerZone::Boss => &mut self.in_boss,
        };
        let entered = inside && !*slot;
        *slot = inside;
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_contact_only_when_moving_in() {
        let arena = Arena::default();
        let at_wall = Vec3::new(arena.half_width - 0.1, 0.0, 0.0);

        let contact = arena.wall_contact(at_wall, 0.25, Vec3::X).unwrap();
        assert_eq!(contact.normal, Vec3::NEG_X);
        assert_eq!(contact.surface, Surface::Wall);

        assert!(arena.wall_contact(at_wall, 0.25, Vec3::NEG_X).is_none());
        assert!(arena.wall_contact(Vec3::ZERO, 0.25, Vec3::X).is_none());
    }

    #[test]
    fn test_clamp_keeps_inside() {
        let arena = Arena::default();
        let p = arena.clamp(Vec3::new(100.0, 0.0, -100.0), 0.5);
        assert_eq!(p, Vec3::new(arena.half_width - 0.5, 0.0, -arena.half_depth + 0.5));
    }

    #[test]
    fn test_sphere_contact_normal_points_out() {
        let contact = sphere_contact(
            Vec3::new(0.0, 0.0, 1.6),
            0.25,
            Vec3::ZERO,
            1.5,
            Vec3::NEG_Z,
            Surface::Boss,
        )
        .unwrap();
        assert!((contact.normal - Vec3::Z).length() < 1e-5);

        // Already heading away
        assert!(
            sphere_contact(Vec3::new(0.0, 0.0, 1.6), 0.25, Vec3::ZERO, 1.5, Vec3::Z, Surface::Boss)
                .is_none()
        );
    }

    #[test]
    fn test_trigger_fires_on_entry_only() {
        let mut presence = TriggerPresence::default();
        assert!(presence.update(TriggerZone::Player, true));
        assert!(!presence.update(TriggerZone::Player, true));
        assert!(!presence.update(TriggerZone::Player, false));
        assert!(presence.update(TriggerZone::Player, true));
        assert!(presence.update(TriggerZone::Boss, true));
    }
}
