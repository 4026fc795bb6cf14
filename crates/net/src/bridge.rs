//! Host room handle backed by a bridge connection
//!
//! Commands are queued for the connection's writer task without waiting.
//! Queries are answered from the [`HostMirror`].

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use haxroom_core::{
    Announcement, DiscProperties, HostFactory, HostRoom, PlayerId, Position, RawPlayer, RoomConfig,
    Scores, Team, TeamColors,
};

use crate::mirror::HostMirror;
use crate::protocol::{BridgeMessage, HostCommand};

pub struct BridgeHost {
    tx: mpsc::Sender<BridgeMessage>,
    mirror: Arc<HostMirror>,
}

impl BridgeHost {
    pub fn new(tx: mpsc::Sender<BridgeMessage>, mirror: Arc<HostMirror>) -> Self {
        Self { tx, mirror }
    }

    pub fn mirror(&self) -> &Arc<HostMirror> {
        &self.mirror
    }

    fn send(&self, command: HostCommand) {
        match self.tx.try_send(BridgeMessage::Command(command)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full, dropping host command");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Bridge connection gone, dropping host command");
            }
        }
    }
}

impl HostRoom for BridgeHost {
    fn send_chat(&self, message: &str, target: Option<PlayerId>) {
        self.send(HostCommand::SendChat {
            message: message.to_string(),
            target,
        });
    }

    fn send_announcement(&self, message: &str, target: Option<PlayerId>, announcement: &Announcement) {
        self.send(HostCommand::SendAnnouncement {
            message: message.to_string(),
            target,
            announcement: announcement.clone(),
        });
    }

    fn set_player_admin(&self, player_id: PlayerId, admin: bool) {
        self.send(HostCommand::SetPlayerAdmin { player_id, admin });
    }

    fn set_player_team(&self, player_id: PlayerId, team: Team) {
        self.send(HostCommand::SetPlayerTeam { player_id, team });
    }

    fn kick_player(&self, player_id: PlayerId, reason: &str, ban: bool) {
        self.send(HostCommand::KickPlayer {
            player_id,
            reason: reason.to_string(),
            ban,
        });
    }

    fn clear_ban(&self, player_id: PlayerId) {
        self.send(HostCommand::ClearBan { player_id });
    }

    fn clear_bans(&self) {
        self.send(HostCommand::ClearBans);
    }

    fn set_score_limit(&self, limit: u32) {
        self.send(HostCommand::SetScoreLimit { limit });
    }

    fn set_time_limit(&self, minutes: u32) {
        self.send(HostCommand::SetTimeLimit { minutes });
    }

    fn set_custom_stadium(&self, stadium_json: &str) {
        self.send(HostCommand::SetCustomStadium {
            stadium: stadium_json.to_string(),
        });
    }

    fn set_default_stadium(&self, name: &str) {
        self.send(HostCommand::SetDefaultStadium {
            name: name.to_string(),
        });
    }

    fn set_teams_lock(&self, locked: bool) {
        self.send(HostCommand::SetTeamsLock { locked });
    }

    fn set_team_colors(&self, team: Team, colors: &TeamColors) {
        self.send(HostCommand::SetTeamColors {
            team,
            colors: colors.clone(),
        });
    }

    fn start_game(&self) {
        self.send(HostCommand::StartGame);
    }

    fn stop_game(&self) {
        self.send(HostCommand::StopGame);
    }

    fn pause_game(&self, paused: bool) {
        self.send(HostCommand::PauseGame { paused });
    }

    fn get_player(&self, player_id: PlayerId) -> Option<RawPlayer> {
        self.mirror.player(player_id)
    }

    fn get_player_list(&self) -> Vec<RawPlayer> {
        self.mirror.players()
    }

    fn get_scores(&self) -> Option<Scores> {
        self.mirror.scores()
    }

    fn get_ball_position(&self) -> Option<Position> {
        self.mirror.ball()
    }

    fn start_recording(&self) {
        self.send(HostCommand::StartRecording);
    }

    // The shim keeps the recording; nothing comes back synchronously.
    fn stop_recording(&self) -> Option<Vec<u8>> {
        self.send(HostCommand::StopRecording);
        None
    }

    fn set_password(&self, password: Option<&str>) {
        self.send(HostCommand::SetPassword {
            password: password.map(str::to_string),
        });
    }

    fn set_require_recaptcha(&self, required: bool) {
        self.send(HostCommand::SetRequireRecaptcha { required });
    }

    fn reorder_players(&self, player_ids: &[PlayerId], move_to_top: bool) {
        self.send(HostCommand::ReorderPlayers {
            player_ids: player_ids.to_vec(),
            move_to_top,
        });
    }

    fn set_kick_rate_limit(&self, min: u32, rate: u32, burst: u32) {
        self.send(HostCommand::SetKickRateLimit { min, rate, burst });
    }

    fn set_player_avatar(&self, player_id: PlayerId, avatar: Option<&str>) {
        self.send(HostCommand::SetPlayerAvatar {
            player_id,
            avatar: avatar.map(str::to_string),
        });
    }

    fn set_disc_properties(&self, disc_index: usize, properties: &DiscProperties) {
        self.send(HostCommand::SetDiscProperties {
            index: disc_index,
            properties: *properties,
        });
    }

    fn get_disc_properties(&self, disc_index: usize) -> Option<DiscProperties> {
        self.mirror.disc(disc_index)
    }

    fn set_player_disc_properties(&self, player_id: PlayerId, properties: &DiscProperties) {
        self.send(HostCommand::SetPlayerDiscProperties {
            player_id,
            properties: *properties,
        });
    }

    fn get_player_disc_properties(&self, player_id: PlayerId) -> Option<DiscProperties> {
        self.mirror.player_disc(player_id)
    }

    fn get_disc_count(&self) -> usize {
        self.mirror.disc_count()
    }
}

/// Opens the room on the shim side and hands out the bridge handle
pub struct BridgeHostFactory {
    tx: mpsc::Sender<BridgeMessage>,
    mirror: Arc<HostMirror>,
}

impl BridgeHostFactory {
    pub fn new(tx: mpsc::Sender<BridgeMessage>, mirror: Arc<HostMirror>) -> Self {
        Self { tx, mirror }
    }
}

impl HostFactory for BridgeHostFactory {
    fn create_room(&self, config: &RoomConfig) -> Arc<dyn HostRoom> {
        if self.tx.try_send(BridgeMessage::Open(config.clone())).is_err() {
            warn!(room_name = %config.room_name, "Could not queue room open request");
        }
        Arc::new(BridgeHost::new(self.tx.clone(), self.mirror.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commands_are_queued_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let host = BridgeHost::new(tx, Arc::new(HostMirror::new()));

        host.set_player_admin(3, true);
        host.send_chat("hi", None);

        assert_eq!(
            rx.recv().await,
            Some(BridgeMessage::Command(HostCommand::SetPlayerAdmin {
                player_id: 3,
                admin: true
            }))
        );
        assert_eq!(
            rx.recv().await,
            Some(BridgeMessage::Command(HostCommand::SendChat {
                message: "hi".to_string(),
                target: None
            }))
        );
    }

    #[tokio::test]
    async fn test_full_or_closed_queue_drops_silently() {
        let (tx, mut rx) = mpsc::channel(1);
        let host = BridgeHost::new(tx, Arc::new(HostMirror::new()));

        host.start_game();
        host.stop_game();
        assert_eq!(rx.recv().await, Some(BridgeMessage::Command(HostCommand::StartGame)));

        drop(rx);
        host.pause_game(true);
    }

    #[tokio::test]
    async fn test_factory_opens_room_first() {
        let (tx, mut rx) = mpsc::channel(8);
        let factory = BridgeHostFactory::new(tx, Arc::new(HostMirror::new()));
        let config = RoomConfig::default();

        let host = factory.create_room(&config);
        host.clear_bans();

        assert_eq!(rx.recv().await, Some(BridgeMessage::Open(config)));
        assert_eq!(rx.recv().await, Some(BridgeMessage::Command(HostCommand::ClearBans)));
    }
}
