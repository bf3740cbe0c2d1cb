mod components;
pub mod constants;
mod messages;
mod resources;

pub use components::*;
pub use messages::*;
pub use resources::*;
