//! Combat tuning settings loaded from config
//!
//! Every field has a serde default so a config file only has to list the
//! values it changes.

use bevy::log::warn;
use bevy::prelude::{Resource, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Path to the combat tuning config
pub const COMBAT_TUNING_FILE: &str = "config/combat_tuning.json";

/// How the boost speed falls back to base speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostEasing {
    #[default]
    Linear,
    /// Cubic ease-out: most of the speed is shed early
    CubicOut,
}

impl BoostEasing {
    /// Map linear progress (0..1) onto eased progress (0..1)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            BoostEasing::Linear => t,
            BoostEasing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// What the Attacking state does after spawning its ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum AttackMode {
    /// Spawn and return to Idle inside the same transition
    #[default]
    Instant,
    /// Stay in Attacking for an animation window, then return to Idle
    Held { duration: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub base_speed: f32,
    pub boost_multiplier: f32,
    pub boost_duration: f32,
    pub boost_easing: BoostEasing,
    pub curve_strength: f32,
    pub curve_response: f32,
    pub perfect_curve_factor: f32,
    pub radius: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            base_speed: BALL_BASE_SPEED,
            boost_multiplier: BOOST_MULTIPLIER,
            boost_duration: BOOST_DURATION,
            boost_easing: BoostEasing::Linear,
            curve_strength: CURVE_STRENGTH,
            curve_response: CURVE_RESPONSE,
            perfect_curve_factor: PERFECT_CURVE_FACTOR,
            radius: BALL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatTuning {
    pub max_hit_distance: f32,
    pub perfect_hit_threshold: f32,
    pub close_range_distance: f32,
    pub normal_bounce_multiplier: f32,
    pub close_range_bounce_multiplier: f32,
    pub perfect_bonus_factor: f32,
    pub swing_cooldown: f32,
}

impl Default for BatTuning {
    fn default() -> Self {
        Self {
            max_hit_distance: MAX_HIT_DISTANCE,
            perfect_hit_threshold: PERFECT_HIT_THRESHOLD,
            close_range_distance: CLOSE_RANGE_DISTANCE,
            normal_bounce_multiplier: NORMAL_BOUNCE_MULTIPLIER,
            close_range_bounce_multiplier: CLOSE_RANGE_BOUNCE_MULTIPLIER,
            perfect_bonus_factor: PERFECT_BONUS_FACTOR,
            swing_cooldown: SWING_COOLDOWN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub health: i32,
    pub stagger_damage: i32,
    pub attack_interval: f32,
    pub stagger_duration: f32,
    pub attack_mode: AttackMode,
    pub spawn_offset: Vec3,
    pub radius: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            health: BOSS_HEALTH,
            stagger_damage: STAGGER_DAMAGE,
            attack_interval: ATTACK_INTERVAL,
            stagger_duration: STAGGER_DURATION,
            attack_mode: AttackMode::Instant,
            spawn_offset: BALL_SPAWN_OFFSET,
            radius: BOSS_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactTuning {
    pub hit_stop_speed: f32,
    pub hit_stop_duration: f32,
    pub shake_strength: f32,
    pub shake_duration: f32,
    pub spark_speed: f32,
    pub spark_lifetime: f32,
    pub spark_variants: u8,
    pub score_speed: f32,
    pub score_base_points: f32,
    pub score_speed_normalization: f32,
    pub score_popup_lifetime: f32,
}

impl Default for ImpactTuning {
    fn default() -> Self {
        Self {
            hit_stop_speed: HIT_STOP_SPEED,
            hit_stop_duration: HIT_STOP_DURATION,
            shake_strength: SCREEN_SHAKE_STRENGTH,
            shake_duration: SCREEN_SHAKE_DURATION,
            spark_speed: SPARK_SPEED,
            spark_lifetime: SPARK_LIFETIME,
            spark_variants: SPARK_VARIANTS,
            score_speed: SCORE_SPEED,
            score_base_points: SCORE_BASE_POINTS,
            score_speed_normalization: SCORE_SPEED_NORMALIZATION,
            score_popup_lifetime: SCORE_POPUP_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipTuning {
    pub timeout: f32,
}

impl Default for OwnershipTuning {
    fn default() -> Self {
        Self {
            timeout: OWNERSHIP_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub health: i32,
    pub ball_damage: i32,
    pub damage_break_duration: f32,
    pub move_speed: f32,
    pub radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            health: PLAYER_HEALTH,
            ball_damage: PLAYER_DAMAGE,
            damage_break_duration: DAMAGE_BREAK_DURATION,
            move_speed: PLAYER_MOVE_SPEED,
            radius: PLAYER_RADIUS,
        }
    }
}

/// All combat tunables
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub ball: BallTuning,
    pub bat: BatTuning,
    pub boss: BossTuning,
    pub impact: ImpactTuning,
    pub ownership: OwnershipTuning,
    pub player: PlayerTuning,
}

impl CombatTuning {
    /// Reject values the combat code cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("ball.base_speed", self.ball.base_speed),
            ("ball.boost_duration", self.ball.boost_duration),
            ("ball.radius", self.ball.radius),
            ("bat.max_hit_distance", self.bat.max_hit_distance),
            ("boss.stagger_duration", self.boss.stagger_duration),
            ("boss.radius", self.boss.radius),
            ("impact.hit_stop_speed", self.impact.hit_stop_speed),
            ("impact.score_speed_normalization", self.impact.score_speed_normalization),
            ("ownership.timeout", self.ownership.timeout),
            ("player.radius", self.player.radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(format!("{} must be positive (got {})", name, value));
            }
        }

        let multipliers = [
            ("ball.boost_multiplier", self.ball.boost_multiplier),
            ("bat.normal_bounce_multiplier", self.bat.normal_bounce_multiplier),
            ("bat.close_range_bounce_multiplier", self.bat.close_range_bounce_multiplier),
            ("bat.perfect_bonus_factor", self.bat.perfect_bonus_factor),
        ];
        for (name, value) in multipliers {
            if value < 1.0 {
                return Err(format!("{} must be at least 1.0 (got {})", name, value));
            }
        }

        if self.bat.perfect_hit_threshold < 0.0
            || self.bat.perfect_hit_threshold > self.bat.max_hit_distance
        {
            return Err(format!(
                "bat.perfect_hit_threshold must be within 0..={} (got {})",
                self.bat.max_hit_distance, self.bat.perfect_hit_threshold
            ));
        }
        if self.boss.health <= 0 {
            return Err(format!("boss.health must be positive (got {})", self.boss.health));
        }
        if self.boss.stagger_damage <= 0 {
            return Err(format!(
                "boss.stagger_damage must be positive (got {})",
                self.boss.stagger_damage
            ));
        }
        if let AttackMode::Held { duration } = self.boss.attack_mode {
            if duration < 0.0 {
                return Err(format!("boss.attack_mode hold must not be negative (got {})", duration));
            }
        }
        if self.impact.spark_variants == 0 {
            return Err("impact.spark_variants must be at least 1".to_string());
        }
        if self.player.health <= 0 {
            return Err(format!("player.health must be positive (got {})", self.player.health));
        }
        Ok(())
    }
}

pub fn load_combat_tuning_from_file(path: &str) -> Result<CombatTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let tuning: CombatTuning =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))?;
    tuning
        .validate()
        .map_err(|e| format!("Invalid tuning in {}: {}", path, e))?;
    Ok(tuning)
}

/// Load tuning from `path`, falling back to defaults on any error
pub fn load_or_default(path: &str) -> CombatTuning {
    match load_combat_tuning_from_file(path) {
        Ok(tuning) => tuning,
        Err(err) => {
            warn!("{}, using defaults", err);
            CombatTuning::default()
        }
    }
}
