//! Player models
//!
//! [`RawPlayer`] is the record handed over by the host on every callback.
//! [`Player`] is the framework's view of it, with roles attached by the
//! player service.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::error::Error;

/// Player id, stable for the lifetime of the room
pub type PlayerId = i32;

/// Id the host reserves for itself in the player list
pub const HOST_PLAYER_ID: PlayerId = 0;

/// Team a player belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Team {
    Spectators = 0,
    Red = 1,
    Blue = 2,
}

impl Team {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Red or blue
    pub fn is_playing(self) -> bool {
        self != Team::Spectators
    }

    /// The other playing team. Spectators stay spectators.
    pub fn opposite(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
            Team::Spectators => Team::Spectators,
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Team::Spectators),
            1 => Ok(Team::Red),
            2 => Ok(Team::Blue),
            other => Err(Error::InvalidTeam(other)),
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        team.id()
    }
}

/// Point on the field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Player record as supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayer {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub admin: bool,
    /// None when the player is not on the field
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub conn: String,
    #[serde(default)]
    pub auth: Option<String>,
}

/// Player as seen by events, commands and interceptors
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub admin: bool,
    pub position: Option<Position>,
    pub conn: String,
    pub auth: Option<String>,
    pub roles: Vec<Role>,
}

impl Player {
    /// Cast a raw host record with the given roles attached
    pub fn from_raw(raw: &RawPlayer, roles: Vec<Role>) -> Self {
        Self {
            id: raw.id,
            name: raw.name.clone(),
            team: raw.team,
            admin: raw.admin,
            position: raw.position,
            conn: raw.conn.clone(),
            auth: raw.auth.clone(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_host(&self) -> bool {
        self.id == HOST_PLAYER_ID
    }

    pub fn is_playing(&self) -> bool {
        self.team.is_playing()
    }

    /// Same player in the same team context
    pub fn same_touch_context(&self, other: &Player) -> bool {
        self.id == other.id && self.team == other.team
    }
}

impl From<&RawPlayer> for Player {
    fn from(raw: &RawPlayer) -> Self {
        Player::from_raw(raw, Vec::new())
    }
}
