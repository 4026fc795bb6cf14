//! haxroom core library
//!
//! Typed events, players and roles, chat interception, command resolution
//! and the room façade over a ball-game host.

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod interceptor;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod players;
pub mod registry;
pub mod room;
pub mod stadium;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utility;

pub use command::{
    Command, CommandFactory, CommandId, CommandResolver, DeclaredCommand, PrefixCommandResolver,
};
pub use config::{AppConfig, BridgeConfig, CommandsConfig, RoomConfig};
pub use error::{Error, Result};
pub use event::{Handler, TypedEvent};
pub use host::{HostEvent, HostFactory, HostRoom};
pub use interceptor::{
    CommandExecutionInterceptor, CommandSettingInterceptor, DeniedCommand, InterceptorChain,
    MessageInterceptor,
};
pub use models::*;
pub use permissions::*;
pub use players::{PlayerService, RolePlayerService};
pub use registry::{CommandCatalog, CommandMetadata, CommandOptions, CommandRegistry};
pub use room::{
    ChatHandler, KickRateLimit, PlayerChange, PlayerKick, Room, RoomBuilder, RoomEvents,
    StadiumChange,
};
pub use stadium::Stadium;
pub use utility::{GameState, GoalScored, UtilityRoom};
