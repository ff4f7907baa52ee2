//! Tunable constants for bossball
//!
//! Default values for every gameplay knob. `CombatTuning::default()` is built
//! from these, and config files only need to override what they change.

use bevy::prelude::*;

// =============================================================================
// BALL MOVEMENT
// =============================================================================

pub const BALL_BASE_SPEED: f32 = 5.0;
pub const BALL_RADIUS: f32 = 0.25;
pub const CURVE_STRENGTH: f32 = 0.02; // How much to bend toward the target per step
pub const CURVE_RESPONSE: f32 = 2.0; // How fast the bend is applied
pub const PERFECT_CURVE_FACTOR: f32 = 2.0; // Homing multiplier while flying at the boss

/// Below this length a vector is treated as zero (no direction can be derived)
pub const DIRECTION_EPSILON: f32 = 1e-4;

// =============================================================================
// BOOST
// =============================================================================

pub const BOOST_MULTIPLIER: f32 = 3.0;
pub const BOOST_DURATION: f32 = 0.5; // Seconds to decay from boosted back to base speed

// =============================================================================
// BAT
// =============================================================================

pub const MAX_HIT_DISTANCE: f32 = 4.0;
pub const PERFECT_HIT_THRESHOLD: f32 = 0.3; // Band just inside max distance
pub const CLOSE_RANGE_DISTANCE: f32 = 2.0;
pub const NORMAL_BOUNCE_MULTIPLIER: f32 = 2.0;
pub const CLOSE_RANGE_BOUNCE_MULTIPLIER: f32 = 3.5;
pub const PERFECT_BONUS_FACTOR: f32 = 1.5; // Extra power on top of the normal multiplier
pub const SWING_COOLDOWN: f32 = 0.5;

// =============================================================================
// BOSS
// =============================================================================

pub const BOSS_HEALTH: i32 = 3;
pub const STAGGER_DAMAGE: i32 = 1;
pub const ATTACK_INTERVAL: f32 = 2.0;
pub const STAGGER_DURATION: f32 = 3.0;
pub const ATTACK_HOLD_DURATION: f32 = 0.6; // Animation window when attacks are held
pub const BOSS_RADIUS: f32 = 1.5;
pub const BALL_SPAWN_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 2.5); // In front of the boss, toward the player

// =============================================================================
// IMPACTS
// =============================================================================

pub const HIT_STOP_SPEED: f32 = 40.0;
pub const HIT_STOP_DURATION: f32 = 0.03; // Real-time seconds
pub const SCREEN_SHAKE_STRENGTH: f32 = 0.4;
pub const SCREEN_SHAKE_DURATION: f32 = 1.0;
pub const SCREEN_SHAKE_PEAK: f32 = 0.1; // Fraction of duration where shake peaks
pub const SPARK_SPEED: f32 = 20.0;
pub const SPARK_LIFETIME: f32 = 1.0;
pub const SPARK_VARIANTS: u8 = 3;
pub const SCORE_SPEED: f32 = 40.0;
pub const SCORE_BASE_POINTS: f32 = 100.0;
pub const SCORE_SPEED_NORMALIZATION: f32 = 40.0;
pub const SCORE_POPUP_LIFETIME: f32 = 1.0;

// =============================================================================
// OWNERSHIP
// =============================================================================

pub const OWNERSHIP_TIMEOUT: f32 = 3.0;

// =============================================================================
// PLAYER
// =============================================================================

pub const PLAYER_HEALTH: i32 = 5;
pub const PLAYER_DAMAGE: i32 = 1;
pub const DAMAGE_BREAK_DURATION: f32 = 3.0; // Invulnerable window after a hit
pub const PLAYER_MOVE_SPEED: f32 = 6.0;
pub const PLAYER_RADIUS: f32 = 0.5;

// =============================================================================
// ARENA
// =============================================================================

pub const ARENA_HALF_WIDTH: f32 = 12.0; // X extent
pub const ARENA_HALF_DEPTH: f32 = 8.0; // Z extent
pub const BOSS_START: Vec3 = Vec3::new(0.0, 0.0, -6.0);
pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const BOSS_TRIGGER_MARGIN: f32 = 0.3; // Trigger shell around the boss body

// =============================================================================
// SIMULATION
// =============================================================================

pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
pub const FIGHT_TIME_LIMIT: f32 = 180.0; // Seconds before a simulated fight is called

