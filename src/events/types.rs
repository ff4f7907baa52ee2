//! Combat event definitions

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ball::BallOwner;
use crate::boss::BossStateKind;
use crate::player::HitClass;

/// What the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Wall,
    Boss,
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Surface::Wall => write!(f, "W"),
            Surface::Boss => write!(f, "B"),
        }
    }
}

/// How a fight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightOutcome {
    BossDefeated,
    PlayerDefeated,
    TimeLimit,
}

/// Everything the combat core reports to the outer game layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    // === Ball Events ===
    /// Boss attack produced a ball
    BallSpawned { position: Vec3 },
    /// Player bat connected with a ball
    BallStruck {
        class: HitClass,
        multiplier: f32,
        speed: f32,
    },
    /// Ball bounced off something solid
    BallCollided {
        surface: Surface,
        speed: f32,
        point: Vec3,
        normal: Vec3,
    },
    /// Ball was used up staggering the boss
    BallConsumed,
    /// Ball changed hands
    OwnershipChanged { owner: BallOwner },

    // === Impact Events ===
    PointsAwarded { points: u32, total: u32, point: Vec3 },
    HitStopStarted { duration: f32 },
    ScreenShakeStarted { magnitude: f32 },
    SparkSpawned { point: Vec3, variant: u8 },

    // === Boss Events ===
    BossStateChanged {
        from: Option<BossStateKind>,
        to: BossStateKind,
    },
    BossDamaged { health: i32 },
    BossDefeated,

    // === Player Events ===
    PlayerDamaged { health: i32 },
    PlayerDefeated,

    // === Fight Events ===
    FightEnded { outcome: FightOutcome, duration: f32 },
}

impl CombatEvent {
    /// Two-letter code used by the compact log format
    pub fn type_code(&self) -> &'static str {
        match self {
            CombatEvent::BallSpawned { .. } => "BS",
            CombatEvent::BallStruck { .. } => "ST",
            CombatEvent::BallCollided { .. } => "BC",
            CombatEvent::BallConsumed => "BX",
            CombatEvent::OwnershipChanged { .. } => "OW",
            CombatEvent::PointsAwarded { .. } => "PT",
            CombatEvent::HitStopStarted { .. } => "HS",
            CombatEvent::ScreenShakeStarted { .. } => "SH",
            CombatEvent::SparkSpawned { .. } => "SP",
            CombatEvent::BossStateChanged { .. } => "BT",
            CombatEvent::BossDamaged { .. } => "BD",
            CombatEvent::BossDefeated => "BK",
            CombatEvent::PlayerDamaged { .. } => "PD",
            CombatEvent::PlayerDefeated => "PK",
            CombatEvent::FightEnded { .. } => "FE",
        }
    }
}
