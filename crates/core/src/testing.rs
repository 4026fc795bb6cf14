//! Test support: a recording host and player helpers

use std::sync::{Arc, Mutex};

use crate::config::RoomConfig;
use crate::host::{HostFactory, HostRoom};
use crate::models::{
    Announcement, DiscProperties, Player, PlayerId, Position, RawPlayer, Scores, Team, TeamColors,
};

/// Host command recorded by [`MockHost`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SendChat { message: String, target: Option<PlayerId> },
    SendAnnouncement { message: String, target: Option<PlayerId> },
    SetPlayerAdmin { player_id: PlayerId, admin: bool },
    SetPlayerTeam { player_id: PlayerId, team: Team },
    KickPlayer { player_id: PlayerId, reason: String, ban: bool },
    StartGame,
    StopGame,
    PauseGame(bool),
    SetCustomStadium(String),
    Other(&'static str),
}

/// In-memory host that records commands and answers queries from fixtures
#[derive(Default)]
pub struct MockHost {
    calls: Mutex<Vec<HostCall>>,
    players: Mutex<Vec<RawPlayer>>,
    ball: Mutex<Option<Position>>,
    scores: Mutex<Option<Scores>>,
    discs: Mutex<Vec<DiscProperties>>,
    player_discs: Mutex<Vec<(PlayerId, DiscProperties)>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_players(&self, players: Vec<RawPlayer>) {
        *self.players.lock().unwrap() = players;
    }

    pub fn set_ball(&self, position: Option<Position>) {
        *self.ball.lock().unwrap() = position;
    }

    pub fn set_scores(&self, scores: Option<Scores>) {
        *self.scores.lock().unwrap() = scores;
    }

    pub fn set_discs(&self, discs: Vec<DiscProperties>) {
        *self.discs.lock().unwrap() = discs;
    }

    pub fn set_player_disc(&self, player_id: PlayerId, properties: DiscProperties) {
        self.player_discs.lock().unwrap().push((player_id, properties));
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostRoom for MockHost {
    fn send_chat(&self, message: &str, target: Option<PlayerId>) {
        self.record(HostCall::SendChat {
            message: message.to_string(),
            target,
        });
    }

    fn send_announcement(&self, message: &str, target: Option<PlayerId>, _: &Announcement) {
        self.record(HostCall::SendAnnouncement {
            message: message.to_string(),
            target,
        });
    }

    fn set_player_admin(&self, player_id: PlayerId, admin: bool) {
        self.record(HostCall::SetPlayerAdmin { player_id, admin });
    }

    fn set_player_team(&self, player_id: PlayerId, team: Team) {
        self.record(HostCall::SetPlayerTeam { player_id, team });
    }

    fn kick_player(&self, player_id: PlayerId, reason: &str, ban: bool) {
        self.record(HostCall::KickPlayer {
            player_id,
            reason: reason.to_string(),
            ban,
        });
    }

    fn clear_ban(&self, _: PlayerId) {
        self.record(HostCall::Other("clear_ban"));
    }

    fn clear_bans(&self) {
        self.record(HostCall::Other("clear_bans"));
    }

    fn set_score_limit(&self, _: u32) {
        self.record(HostCall::Other("set_score_limit"));
    }

    fn set_time_limit(&self, _: u32) {
        self.record(HostCall::Other("set_time_limit"));
    }

    fn set_custom_stadium(&self, stadium_json: &str) {
        self.record(HostCall::SetCustomStadium(stadium_json.to_string()));
    }

    fn set_default_stadium(&self, _: &str) {
        self.record(HostCall::Other("set_default_stadium"));
    }

    fn set_teams_lock(&self, _: bool) {
        self.record(HostCall::Other("set_teams_lock"));
    }

    fn set_team_colors(&self, _: Team, _: &TeamColors) {
        self.record(HostCall::Other("set_team_colors"));
    }

    fn start_game(&self) {
        self.record(HostCall::StartGame);
    }

    fn stop_game(&self) {
        self.record(HostCall::StopGame);
    }

    fn pause_game(&self, paused: bool) {
        self.record(HostCall::PauseGame(paused));
    }

    fn get_player(&self, player_id: PlayerId) -> Option<RawPlayer> {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
    }

    fn get_player_list(&self) -> Vec<RawPlayer> {
        self.players.lock().unwrap().clone()
    }

    fn get_scores(&self) -> Option<Scores> {
        *self.scores.lock().unwrap()
    }

    fn get_ball_position(&self) -> Option<Position> {
        *self.ball.lock().unwrap()
    }

    fn start_recording(&self) {
        self.record(HostCall::Other("start_recording"));
    }

    fn stop_recording(&self) -> Option<Vec<u8>> {
        self.record(HostCall::Other("stop_recording"));
        None
    }

    fn set_password(&self, _: Option<&str>) {
        self.record(HostCall::Other("set_password"));
    }

    fn set_require_recaptcha(&self, _: bool) {
        self.record(HostCall::Other("set_require_recaptcha"));
    }

    fn reorder_players(&self, _: &[PlayerId], _: bool) {
        self.record(HostCall::Other("reorder_players"));
    }

    fn set_kick_rate_limit(&self, _: u32, _: u32, _: u32) {
        self.record(HostCall::Other("set_kick_rate_limit"));
    }

    fn set_player_avatar(&self, _: PlayerId, _: Option<&str>) {
        self.record(HostCall::Other("set_player_avatar"));
    }

    fn set_disc_properties(&self, _: usize, _: &DiscProperties) {
        self.record(HostCall::Other("set_disc_properties"));
    }

    fn get_disc_properties(&self, disc_index: usize) -> Option<DiscProperties> {
        self.discs.lock().unwrap().get(disc_index).copied()
    }

    fn set_player_disc_properties(&self, _: PlayerId, _: &DiscProperties) {
        self.record(HostCall::Other("set_player_disc_properties"));
    }

    fn get_player_disc_properties(&self, player_id: PlayerId) -> Option<DiscProperties> {
        self.player_discs
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, props)| *props)
    }

    fn get_disc_count(&self) -> usize {
        self.discs.lock().unwrap().len()
    }
}

/// Hands out one shared [`MockHost`] and counts how often it was asked to
pub struct MockHostFactory {
    pub host: Arc<MockHost>,
    pub created: Mutex<usize>,
}

impl MockHostFactory {
    pub fn new() -> Self {
        Self {
            host: Arc::new(MockHost::new()),
            created: Mutex::new(0),
        }
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

impl Default for MockHostFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFactory for MockHostFactory {
    fn create_room(&self, _config: &RoomConfig) -> Arc<dyn HostRoom> {
        *self.created.lock().unwrap() += 1;
        self.host.clone()
    }
}

/// Raw spectator with the given id and name
pub fn raw_player(id: PlayerId, name: &str) -> RawPlayer {
    RawPlayer {
        id,
        name: name.to_string(),
        team: Team::Spectators,
        admin: false,
        position: None,
        conn: String::new(),
        auth: None,
    }
}

/// Raw player on `team` standing at (x, y)
pub fn raw_player_at(id: PlayerId, name: &str, team: Team, x: f64, y: f64) -> RawPlayer {
    RawPlayer {
        team,
        position: Some(Position::new(x, y)),
        ..raw_player(id, name)
    }
}

/// Spectator without roles
pub fn player(id: PlayerId, name: &str) -> Player {
    Player::from(&raw_player(id, name))
}
