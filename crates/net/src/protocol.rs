//! Bridge protocol message types
//!
//! All messages are JSON-serialized and length-prefixed on the wire.

use serde::{Deserialize, Serialize};

use haxroom_core::{
    Announcement, DiscProperties, HostEvent, PlayerId, Position, RawPlayer, RoomConfig, Scores,
    Team, TeamColors,
};

/// Host method call, sent from the room to the host shim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    SendChat {
        message: String,
        target: Option<PlayerId>,
    },
    SendAnnouncement {
        message: String,
        target: Option<PlayerId>,
        announcement: Announcement,
    },
    SetPlayerAdmin {
        player_id: PlayerId,
        admin: bool,
    },
    SetPlayerTeam {
        player_id: PlayerId,
        team: Team,
    },
    KickPlayer {
        player_id: PlayerId,
        reason: String,
        ban: bool,
    },
    ClearBan {
        player_id: PlayerId,
    },
    ClearBans,
    SetScoreLimit {
        limit: u32,
    },
    SetTimeLimit {
        minutes: u32,
    },
    SetCustomStadium {
        stadium: String,
    },
    SetDefaultStadium {
        name: String,
    },
    SetTeamsLock {
        locked: bool,
    },
    SetTeamColors {
        team: Team,
        colors: TeamColors,
    },
    StartGame,
    StopGame,
    PauseGame {
        paused: bool,
    },
    StartRecording,
    StopRecording,
    SetPassword {
        password: Option<String>,
    },
    SetRequireRecaptcha {
        required: bool,
    },
    ReorderPlayers {
        player_ids: Vec<PlayerId>,
        move_to_top: bool,
    },
    SetKickRateLimit {
        min: u32,
        rate: u32,
        burst: u32,
    },
    SetPlayerAvatar {
        player_id: PlayerId,
        avatar: Option<String>,
    },
    SetDiscProperties {
        index: usize,
        properties: DiscProperties,
    },
    SetPlayerDiscProperties {
        player_id: PlayerId,
        properties: DiscProperties,
    },
}

/// Disc properties of one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDisc {
    pub player_id: PlayerId,
    pub properties: DiscProperties,
}

/// Host world state pushed by the shim, used to answer queries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldSnapshot {
    pub players: Vec<RawPlayer>,
    pub scores: Option<Scores>,
    pub ball: Option<Position>,
    /// Disc 0 is the ball
    pub discs: Vec<DiscProperties>,
    pub player_discs: Vec<PlayerDisc>,
}

/// Bridge protocol messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum BridgeMessage {
    /// Room configuration, sent once when the room is initialized
    Open(RoomConfig),

    /// A host callback fired
    Event(HostEvent),

    /// Host method to invoke
    Command(HostCommand),

    /// Fresh world state
    Snapshot(WorldSnapshot),

    /// Answer to a chat event: whether the host should relay the line
    ChatDecision { player_id: PlayerId, broadcast: bool },

    /// Handling a host callback failed
    Failure { callback: String, message: String },

    /// Ping to keep connection alive
    Ping,

    /// Pong response to ping
    Pong,
}

impl BridgeMessage {
    /// Serialize message to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_shim_json() {
        let json = br#"{"type":"Event","event":"playerChat","player":{"id":3,"name":"amy","team":0,"admin":false},"message":"!help"}"#;

        match BridgeMessage::from_bytes(json).unwrap() {
            BridgeMessage::Event(HostEvent::PlayerChat { player, message }) => {
                assert_eq!(player.id, 3);
                assert_eq!(message, "!help");
            }
            other => panic!("Wrong message: {other:?}"),
        }
    }

    #[test]
    fn test_command_wire_shape() {
        let msg = BridgeMessage::Command(HostCommand::SetPlayerTeam {
            player_id: 4,
            team: Team::Blue,
        });

        let value: serde_json::Value = serde_json::from_slice(&msg.to_bytes().unwrap()).unwrap();
        assert_eq!(value["type"], "Command");
        assert_eq!(value["command"], "setPlayerTeam");
        assert_eq!(value["playerId"], 4);
        assert_eq!(value["team"], 2);
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let json = br#"{"type":"Snapshot","ball":{"x":1.0,"y":2.0}}"#;

        match BridgeMessage::from_bytes(json).unwrap() {
            BridgeMessage::Snapshot(snapshot) => {
                assert_eq!(snapshot.ball, Some(Position::new(1.0, 2.0)));
                assert!(snapshot.players.is_empty());
                assert!(snapshot.scores.is_none());
            }
            other => panic!("Wrong message: {other:?}"),
        }
    }
}
