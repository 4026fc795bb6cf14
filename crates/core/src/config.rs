//! Configuration schema and loader
//!
//! Defines the TOML-parseable configuration for a room process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings handed to the host when the room is created
    pub room: RoomConfig,
    /// Command prefix and matching
    pub commands: CommandsConfig,
    /// Where the host shim connects
    pub bridge: BridgeConfig,
    /// Password accepted by the login command
    pub admin_password: Option<String>,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration directly from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Host room creation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub room_name: String,
    /// Name of the host player
    pub player_name: String,
    pub password: Option<String>,
    pub max_players: u8,
    pub public: bool,
    pub geo: Option<GeoLocation>,
    /// Headless token
    pub token: Option<String>,
    /// Hide the host player from the room
    pub no_player: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_name: "haxroom".to_string(),
            player_name: "Host".to_string(),
            password: None,
            max_players: 12,
            public: false,
            geo: None,
            token: None,
            no_player: true,
        }
    }
}

/// Advertised room location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
}

/// Command matching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub prefix: String,
    pub case_sensitive: bool,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            case_sensitive: false,
        }
    }
}

/// Host bridge listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub listen: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7331".to_string(),
        }
    }
}
