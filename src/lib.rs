//! Bossball - a bat-and-ball boss fight built with Bevy
//!
//! The boss throws balls; the player bats them back. A perfect hit from just
//! inside max reach homes in on the boss and staggers it. Three staggers win.
//!
//! This crate provides the combat core, its Bevy plugin and a headless
//! simulator for balancing.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod simulation;
pub mod tuning;

// Combat modules
pub mod arena;
pub mod ball;
pub mod boss;
pub mod effects;
pub mod player;
pub mod plugin;
pub mod scoring;

// Re-export commonly used types for convenience
pub use arena::{Arena, TriggerPresence};
pub use ball::{
    ActiveTargetPolicy, Ball, BallFlags, BallMotion, BallOwner, BoostWindow, CurveTarget,
    DefaultTargetPolicy, OwnershipWindow, TargetContext, TargetPolicy,
};
pub use boss::{
    BallContact, BallSpawner, Boss, BossContext, BossState, BossStateKind, BossStats, StateMachine,
};
pub use constants::*;
pub use effects::{CombatRng, HitStop, ScreenShake};
pub use events::{BusEvent, CombatEvent, EventBus, FightOutcome, Surface, serialize_event};
pub use helpers::*;
pub use player::{BatSwing, Facing, HitClass, Player, PlayerHealth, PlayerInput, Strike};
pub use plugin::{CombatPlugin, FightState, fight_in_progress};
pub use scoring::{Score, ScoreSink};
pub use tuning::{AttackMode, BoostEasing, COMBAT_TUNING_FILE, CombatTuning};
