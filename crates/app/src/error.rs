//! Application error type

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Room(#[from] haxroom_core::Error),

    #[error(transparent)]
    Bridge(#[from] haxroom_net::Error),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
