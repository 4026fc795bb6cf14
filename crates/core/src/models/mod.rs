//! Data models for haxroom

mod game;
mod message;
mod player;
mod role;

pub use game::*;
pub use message::*;
pub use player::*;
pub use role::*;
