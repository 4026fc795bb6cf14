//! haxroom host bridge
//!
//! Connects a [`haxroom_core::Room`] to a host shim running next to the real
//! game host.
//!
//! # Architecture
//!
//! - **Server**: listens for the shim and pumps its callbacks into the room
//! - **BridgeHost**: the room's host handle, queueing commands for the shim
//! - **Mirror**: world state pushed by the shim, answering host queries
//! - **Protocol**: Length-prefixed JSON messages
//!
//! # Usage
//!
//! ```ignore
//! let server = BridgeServer::bind("127.0.0.1:7331").await?;
//! let (stream, _addr) = server.accept().await?;
//! serve_connection(stream, room.clone()).await?;
//! ```

pub mod bridge;
pub mod error;
mod frame;
pub mod mirror;
pub mod protocol;
pub mod server;

pub use bridge::{BridgeHost, BridgeHostFactory};
pub use error::{Error, Result};
pub use mirror::HostMirror;
pub use protocol::{BridgeMessage, HostCommand, PlayerDisc, WorldSnapshot};
pub use server::{serve_connection, BridgeServer};

/// Default port the bridge listens on
pub const DEFAULT_PORT: u16 = 7331;
