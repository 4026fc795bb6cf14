//! Host callbacks as data

use serde::{Deserialize, Serialize};

use crate::models::{RawPlayer, Scores, Team};

/// One host callback invocation with its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    PlayerJoin {
        player: RawPlayer,
    },
    PlayerLeave {
        player: RawPlayer,
    },
    TeamVictory {
        scores: Scores,
    },
    /// The only callback whose answer matters: whether to relay the line
    PlayerChat {
        player: RawPlayer,
        message: String,
    },
    PlayerBallKick {
        player: RawPlayer,
    },
    TeamGoal {
        team: Team,
    },
    GameStart {
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    GameStop {
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    PlayerAdminChange {
        changed_player: RawPlayer,
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    PlayerTeamChange {
        changed_player: RawPlayer,
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    PlayerKicked {
        kicked_player: RawPlayer,
        reason: String,
        ban: bool,
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    GameTick,
    GamePause {
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    GameUnpause {
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    PositionsReset,
    PlayerActivity {
        player: RawPlayer,
    },
    StadiumChange {
        new_stadium_name: String,
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
    RoomLink {
        url: String,
    },
    KickRateLimitSet {
        min: u32,
        rate: u32,
        burst: u32,
        #[serde(default)]
        by_player: Option<RawPlayer>,
    },
}

impl HostEvent {
    /// Callback name as the host spells it
    pub fn callback_name(&self) -> &'static str {
        match self {
            HostEvent::PlayerJoin { .. } => "onPlayerJoin",
            HostEvent::PlayerLeave { .. } => "onPlayerLeave",
            HostEvent::TeamVictory { .. } => "onTeamVictory",
            HostEvent::PlayerChat { .. } => "onPlayerChat",
            HostEvent::PlayerBallKick { .. } => "onPlayerBallKick",
            HostEvent::TeamGoal { .. } => "onTeamGoal",
            HostEvent::GameStart { .. } => "onGameStart",
            HostEvent::GameStop { .. } => "onGameStop",
            HostEvent::PlayerAdminChange { .. } => "onPlayerAdminChange",
            HostEvent::PlayerTeamChange { .. } => "onPlayerTeamChange",
            HostEvent::PlayerKicked { .. } => "onPlayerKicked",
            HostEvent::GameTick => "onGameTick",
            HostEvent::GamePause { .. } => "onGamePause",
            HostEvent::GameUnpause { .. } => "onGameUnpause",
            HostEvent::PositionsReset => "onPositionsReset",
            HostEvent::PlayerActivity { .. } => "onPlayerActivity",
            HostEvent::StadiumChange { .. } => "onStadiumChange",
            HostEvent::RoomLink { .. } => "onRoomLink",
            HostEvent::KickRateLimitSet { .. } => "onKickRateLimitSet",
        }
    }
}
