//! Error types for haxroom core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Command {command} is registered more than once")]
    DuplicateCommand { command: String },

    #[error("Command {command} does not declare any names")]
    CommandWithoutNames { command: String },

    #[error("Command {command} declares a blank name")]
    BlankCommandName { command: String },

    #[error("Command name \"{name}\" is declared by both {first} and {second}")]
    DuplicateCommandName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Command {command} declares name {name:?} containing whitespace")]
    InvalidCommandName { name: String, command: String },

    #[error("Invalid command prefix: {0:?}")]
    InvalidPrefix(String),

    #[error("Invalid team id: {0}")]
    InvalidTeam(u8),

    #[error("Room has not been initialized")]
    RoomNotInitialized,

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Interceptor failed: {0}")]
    Interceptor(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Stadium error: {0}")]
    Stadium(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while validating the room setup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::DuplicateCommand { .. }
                | Error::CommandWithoutNames { .. }
                | Error::BlankCommandName { .. }
                | Error::InvalidCommandName { .. }
                | Error::DuplicateCommandName { .. }
                | Error::InvalidPrefix(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
