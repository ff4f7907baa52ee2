//! Compact text format for combat event logs
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:02000|BT|I|A
//! T:02000|BS|0.0,-3.5
//! T:03150|ST|P|3.00|30.0
//! T:03900|BC|B|27.4|0.0,-4.5|0.0,1.0
//! T:03900|BD|2
//! ```

use bevy::prelude::Vec3;

use super::types::{CombatEvent, FightOutcome};
use crate::ball::BallOwner;
use crate::boss::BossStateKind;
use crate::player::HitClass;

/// Format a float with fixed precision (1 decimal)
fn fmt_f1(v: f32) -> String {
    format!("{:.1}", v)
}

/// Format a ground-plane point as x,z
fn fmt_xz(v: Vec3) -> String {
    format!("{:.1},{:.1}", v.x, v.z)
}

fn state_code(kind: BossStateKind) -> &'static str {
    match kind {
        BossStateKind::Idle => "I",
        BossStateKind::Attacking => "A",
        BossStateKind::Staggered => "S",
    }
}

fn class_code(class: HitClass) -> &'static str {
    match class {
        HitClass::Rejected => "X",
        HitClass::CloseRange => "C",
        HitClass::Normal => "N",
        HitClass::Perfect => "P",
    }
}

fn owner_code(owner: BallOwner) -> &'static str {
    match owner {
        BallOwner::Player => "P",
        BallOwner::Boss => "B",
    }
}

fn outcome_code(outcome: FightOutcome) -> &'static str {
    match outcome {
        FightOutcome::BossDefeated => "W",
        FightOutcome::PlayerDefeated => "L",
        FightOutcome::TimeLimit => "T",
    }
}

/// Serialize a CombatEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &CombatEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        CombatEvent::BallSpawned { position } => fmt_xz(*position),
        CombatEvent::BallStruck {
            class,
            multiplier,
            speed,
        } => format!("{}|{:.2}|{}", class_code(*class), multiplier, fmt_f1(*speed)),
        CombatEvent::BallCollided {
            surface,
            speed,
            point,
            normal,
        } => format!("{}|{}|{}|{}", surface, fmt_f1(*speed), fmt_xz(*point), fmt_xz(*normal)),
        CombatEvent::BallConsumed => String::new(),
        CombatEvent::OwnershipChanged { owner } => owner_code(*owner).to_string(),
        CombatEvent::PointsAwarded {
            points,
            total,
            point,
        } => format!("{}|{}|{}", points, total, fmt_xz(*point)),
        CombatEvent::HitStopStarted { duration } => format!("{:.3}", duration),
        CombatEvent::ScreenShakeStarted { magnitude } => format!("{:.2}", magnitude),
        CombatEvent::SparkSpawned { point, variant } => format!("{}|{}", fmt_xz(*point), variant),
        CombatEvent::BossStateChanged { from, to } => format!(
            "{}|{}",
            from.map(state_code).unwrap_or("-"),
            state_code(*to)
        ),
        CombatEvent::BossDamaged { health } => health.to_string(),
        CombatEvent::BossDefeated => String::new(),
        CombatEvent::PlayerDamaged { health } => health.to_string(),
        CombatEvent::PlayerDefeated => String::new(),
        CombatEvent::FightEnded { outcome, duration } => {
            format!("{}|{}", outcome_code(*outcome), fmt_f1(*duration))
        }
    };

    if data.is_empty() {
        format!("{}|{}", ts, code)
    } else {
        format!("{}|{}|{}", ts, code, data)
    }
}
