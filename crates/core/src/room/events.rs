//! Typed events raised by the room, one per host callback

use crate::event::TypedEvent;
use crate::models::{Player, Scores, Team};

/// A player whose admin flag or team changed
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerChange {
    pub player: Player,
    pub by: Option<Player>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerKick {
    pub player: Player,
    pub reason: String,
    pub ban: bool,
    pub by: Option<Player>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StadiumChange {
    pub stadium_name: String,
    pub by: Option<Player>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KickRateLimit {
    pub min: u32,
    pub rate: u32,
    pub burst: u32,
    pub by: Option<Player>,
}

/// Public subscription points of a room.
///
/// Chat is not here: it goes through the interceptor chain or the room's
/// chat handler slot.
#[derive(Debug, Default)]
pub struct RoomEvents {
    pub player_join: TypedEvent<Player>,
    pub player_leave: TypedEvent<Player>,
    pub team_victory: TypedEvent<Scores>,
    pub player_ball_kick: TypedEvent<Player>,
    pub team_goal: TypedEvent<Team>,
    /// Argument is the player who started the game, if any
    pub game_start: TypedEvent<Option<Player>>,
    pub game_stop: TypedEvent<Option<Player>>,
    pub player_admin_change: TypedEvent<PlayerChange>,
    pub player_team_change: TypedEvent<PlayerChange>,
    pub player_kicked: TypedEvent<PlayerKick>,
    pub game_tick: TypedEvent<()>,
    pub game_pause: TypedEvent<Option<Player>>,
    pub game_unpause: TypedEvent<Option<Player>>,
    pub positions_reset: TypedEvent<()>,
    pub player_activity: TypedEvent<Player>,
    pub stadium_change: TypedEvent<StadiumChange>,
    /// Argument is the room link URL
    pub room_link: TypedEvent<String>,
    pub kick_rate_limit_set: TypedEvent<KickRateLimit>,
}
