//! Combat events
//!
//! The EventBus is the "something happened" surface the combat core exposes.
//! Score, effects and fight-flow layers consume it; the compact text format
//! turns it into a readable fight log.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use format::serialize_event;
pub use types::{CombatEvent, FightOutcome, Surface};
