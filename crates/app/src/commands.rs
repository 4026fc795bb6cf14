//! Chat commands shipped with the binary

use std::sync::Arc;

use haxroom_core::utility::swap_teams;
use haxroom_core::{
    AppConfig, Command, DeclaredCommand, HostRoom, Player, PlayerId, Result, Role, RolePlayerService,
    RoomBuilder,
};

use crate::roles::{ADMIN, MODERATORS};

const LOGIN_NAMES: &[&str] = &["login"];
const HELP_NAMES: &[&str] = &["help", "commands"];

/// `!login <password>` grants the admin role
pub struct LoginCommand {
    password: Option<String>,
    players: Arc<RolePlayerService>,
}

impl Command for LoginCommand {
    fn execute(&self, host: &dyn HostRoom, sender: &Player, params: &[String]) -> Result<()> {
        let Some(expected) = &self.password else {
            host.send_chat("Login is disabled.", Some(sender.id));
            return Ok(());
        };

        match params.first() {
            Some(given) if given == expected => {
                let reply = if self.players.grant_role(sender.id, ADMIN) {
                    "You are now logged in."
                } else {
                    "You are already logged in."
                };
                host.send_chat(reply, Some(sender.id));
            }
            _ => {
                tracing::warn!(player_id = sender.id, name = %sender.name, "Failed login");
                host.send_chat("Wrong password.", Some(sender.id));
            }
        }
        Ok(())
    }
}

/// `!admin [#id]` gives host admin to the sender or the named player
pub struct GiveAdminCommand;

impl Command for GiveAdminCommand {
    fn required_roles(&self) -> &[Role] {
        MODERATORS
    }

    fn execute(&self, host: &dyn HostRoom, sender: &Player, params: &[String]) -> Result<()> {
        let target = params
            .first()
            .and_then(|p| parse_player_ref(p))
            .unwrap_or(sender.id);
        host.set_player_admin(target, true);
        Ok(())
    }
}

impl DeclaredCommand for GiveAdminCommand {
    const NAMES: &'static [&'static str] = &["admin"];

    fn create() -> Self {
        GiveAdminCommand
    }
}

/// `!swap` moves red to blue and blue to red
pub struct SwapCommand;

impl Command for SwapCommand {
    fn required_roles(&self) -> &[Role] {
        MODERATORS
    }

    fn execute(&self, host: &dyn HostRoom, sender: &Player, _params: &[String]) -> Result<()> {
        swap_teams(host);
        host.send_chat(&format!("Teams swapped by {}.", sender.name), None);
        Ok(())
    }
}

impl DeclaredCommand for SwapCommand {
    const NAMES: &'static [&'static str] = &["swap"];

    fn create() -> Self {
        SwapCommand
    }
}

/// Lists the available commands to whoever asked
pub struct HelpCommand {
    listing: String,
}

impl Command for HelpCommand {
    fn execute(&self, host: &dyn HostRoom, sender: &Player, _params: &[String]) -> Result<()> {
        host.send_chat(&self.listing, Some(sender.id));
        Ok(())
    }
}

/// `#12` refers to player 12
fn parse_player_ref(word: &str) -> Option<PlayerId> {
    word.strip_prefix('#')?.parse().ok()
}

/// Register the bundled commands on a room builder
pub fn register(builder: RoomBuilder, config: &AppConfig, players: Arc<RolePlayerService>) -> RoomBuilder {
    let prefix = config.commands.prefix.clone();
    let listing = [HELP_NAMES, LOGIN_NAMES, GiveAdminCommand::NAMES, SwapCommand::NAMES]
        .iter()
        .filter_map(|names| names.first())
        .map(|name| format!("{prefix}{name}"))
        .collect::<Vec<_>>()
        .join(", ");
    let listing = format!("Commands: {listing}");
    let password = config.admin_password.clone();

    builder
        .command_with(HELP_NAMES, move || HelpCommand {
            listing: listing.clone(),
        })
        .command_with(LOGIN_NAMES, move || LoginCommand {
            password: password.clone(),
            players: players.clone(),
        })
        .command::<GiveAdminCommand>()
        .command::<SwapCommand>()
}
