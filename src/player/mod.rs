//! Player module - components, bat swings and health

mod batting;
mod components;
mod health;

pub use batting::*;
pub use components::*;
pub use health::*;
