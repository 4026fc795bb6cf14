//! Bridge error types

use std::io;

/// Bridge result type
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Room already initialized")]
    RoomAlreadyInitialized,
}
