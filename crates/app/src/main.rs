//! haxroom - a bot room driven through the host bridge
//!
//! Loads the configuration, builds the room with the bundled commands and
//! announcer, then serves the first host shim that connects.

use std::sync::Arc;

use haxroom_core::{
    AppConfig, CommandExecutionInterceptor, DeniedCommand, RolePlayerService, RoomBuilder,
    UtilityRoom,
};
use haxroom_net::{serve_connection, BridgeServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod announcer;
mod commands;
mod error;
mod roles;
mod state;

use announcer::Announcer;
use error::Result;

fn main() {
    let path = state::config_path(std::env::args().nth(1));
    let config = state::load_config(path.as_deref());

    // RUST_LOG wins over the configured level
    let fallback = config
        .as_ref()
        .ok()
        .and_then(|c| c.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = ?path, "Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(config = ?path, "Starting haxroom");

    if let Err(e) = run(config) {
        tracing::error!("haxroom stopped: {}", e);
        std::process::exit(1);
    }
}

fn run(config: AppConfig) -> Result<()> {
    let players = Arc::new(RolePlayerService::new());
    let builder = RoomBuilder::from_config(&config)
        .player_service(players.clone())
        .interceptor(
            CommandExecutionInterceptor::new().on_denied(DeniedCommand::Swallow { notify: true }),
        );
    let room = UtilityRoom::new(commands::register(builder, &config, players).build()?);

    Arc::new(Announcer::new()).attach(&room);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = BridgeServer::bind(&config.bridge.listen).await?;
        let (stream, addr) = server.accept().await?;
        tracing::info!(addr = %addr, "Serving room");
        serve_connection(stream, room.room().clone()).await?;
        Ok::<(), error::AppError>(())
    })
}
