//! Boss module - stats, state machine, and the Idle/Attacking/Staggered states

mod state_machine;
mod states;
mod stats;

pub use state_machine::*;
pub use states::*;
pub use stats::*;
