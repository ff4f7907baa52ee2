//! Player health with a short invulnerability break after each hit

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Still inside the damage break
    Ignored,
    Damaged { health: i32 },
    Defeated,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerHealth {
    pub health: i32,
    break_remaining: f32,
}

impl PlayerHealth {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            break_remaining: 0.0,
        }
    }

    pub fn in_damage_break(&self) -> bool {
        self.break_remaining > 0.0
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub fn damage(&mut self, amount: i32, break_duration: f32) -> DamageResult {
        if self.in_damage_break() || self.is_defeated() {
            return DamageResult::Ignored;
        }
        self.health -= amount;
        self.break_remaining = break_duration;
        if self.is_defeated() {
            DamageResult::Defeated
        } else {
            DamageResult::Damaged {
                health: self.health,
            }
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.break_remaining = (self.break_remaining - dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_break_blocks_repeat_hits() {
        let mut health = PlayerHealth::new(5);
        assert_eq!(health.damage(1, 3.0), DamageResult::Damaged { health: 4 });
        assert_eq!(health.damage(1, 3.0), DamageResult::Ignored);

        health.tick(2.0);
        assert_eq!(health.damage(1, 3.0), DamageResult::Ignored);
        health.tick(1.0);
        assert_eq!(health.damage(1, 3.0), DamageResult::Damaged { health: 3 });
    }

    #[test]
    fn test_defeat() {
        let mut health = PlayerHealth::new(1);
        assert_eq!(health.damage(1, 3.0), DamageResult::Defeated);
        health.tick(10.0);
        assert_eq!(health.damage(1, 3.0), DamageResult::Ignored);
    }
}
