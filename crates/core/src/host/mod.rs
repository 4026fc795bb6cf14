//! Host game room interface
//!
//! The host owns physics, connections and real game state. The framework
//! only consumes its command surface ([`HostRoom`]) and its callbacks
//! ([`HostEvent`]). Every method is a passthrough: preconditions such as
//! "does nothing while a game is running" are the host's behavior.

mod event;

use std::sync::Arc;

pub use event::HostEvent;

use crate::config::RoomConfig;
use crate::models::{
    Announcement, DiscProperties, PlayerId, Position, RawPlayer, Scores, Team, TeamColors,
};

/// Command and query surface of a host room handle
pub trait HostRoom: Send + Sync {
    /// Send a chat line as the host, to everyone or one player
    fn send_chat(&self, message: &str, target: Option<PlayerId>);

    /// Send a styled announcement
    fn send_announcement(&self, message: &str, target: Option<PlayerId>, announcement: &Announcement);

    fn set_player_admin(&self, player_id: PlayerId, admin: bool);

    fn set_player_team(&self, player_id: PlayerId, team: Team);

    /// Kick or ban a player
    fn kick_player(&self, player_id: PlayerId, reason: &str, ban: bool);

    fn clear_ban(&self, player_id: PlayerId);

    fn clear_bans(&self);

    /// No effect while a game is in progress
    fn set_score_limit(&self, limit: u32);

    /// No effect while a game is in progress
    fn set_time_limit(&self, minutes: u32);

    /// Load a stadium from its `.hbs` JSON text. No effect while a game is in progress.
    fn set_custom_stadium(&self, stadium_json: &str);

    /// Load one of the built-in stadiums by name
    fn set_default_stadium(&self, name: &str);

    fn set_teams_lock(&self, locked: bool);

    fn set_team_colors(&self, team: Team, colors: &TeamColors);

    /// No effect if a game is already in progress
    fn start_game(&self);

    fn stop_game(&self);

    fn pause_game(&self, paused: bool);

    fn get_player(&self, player_id: PlayerId) -> Option<RawPlayer>;

    /// Every player in the room, the host included
    fn get_player_list(&self) -> Vec<RawPlayer>;

    /// None when no game is in progress
    fn get_scores(&self) -> Option<Scores>;

    /// None when no game is in progress
    fn get_ball_position(&self) -> Option<Position>;

    fn start_recording(&self);

    /// Recorded replay, or None if no recording was running
    fn stop_recording(&self) -> Option<Vec<u8>>;

    fn set_password(&self, password: Option<&str>);

    fn set_require_recaptcha(&self, required: bool);

    fn reorder_players(&self, player_ids: &[PlayerId], move_to_top: bool);

    fn set_kick_rate_limit(&self, min: u32, rate: u32, burst: u32);

    fn set_player_avatar(&self, player_id: PlayerId, avatar: Option<&str>);

    fn set_disc_properties(&self, disc_index: usize, properties: &DiscProperties);

    fn get_disc_properties(&self, disc_index: usize) -> Option<DiscProperties>;

    fn set_player_disc_properties(&self, player_id: PlayerId, properties: &DiscProperties);

    fn get_player_disc_properties(&self, player_id: PlayerId) -> Option<DiscProperties>;

    fn get_disc_count(&self) -> usize;
}

/// Acquires the host room handle. Called at most once per room.
pub trait HostFactory {
    fn create_room(&self, config: &RoomConfig) -> Arc<dyn HostRoom>;
}

impl<F> HostFactory for F
where
    F: Fn(&RoomConfig) -> Arc<dyn HostRoom>,
{
    fn create_room(&self, config: &RoomConfig) -> Arc<dyn HostRoom> {
        self(config)
    }
}
