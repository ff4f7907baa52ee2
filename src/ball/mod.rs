//! Ball module - movement, boost, ownership, collision and targeting

mod boost;
mod collision;
mod components;
mod movement;
mod ownership;
mod targeting;

pub use boost::*;
pub use collision::*;
pub use components::*;
pub use movement::*;
pub use ownership::*;
pub use targeting::*;
