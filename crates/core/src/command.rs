//! Commands and command resolution
//!
//! A command is a named, role-gated action triggered by a chat word such as
//! `!admin`. Commands are declared through [`DeclaredCommand`] or registered
//! with an explicit factory, and resolved per message by a [`CommandResolver`].

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::host::HostRoom;
use crate::models::{Player, Role};
use crate::permissions;
use crate::registry::CommandCatalog;

/// Trait for command implementations
pub trait Command: Send + Sync {
    /// Roles allowed to run this command. Empty means everyone.
    fn required_roles(&self) -> &[Role] {
        &[]
    }

    /// Check whether `player` may run this command
    fn can_execute(&self, player: &Player) -> bool {
        permissions::holds_any_role(player, self.required_roles())
    }

    /// Run the command on behalf of `sender`
    fn execute(&self, host: &dyn HostRoom, sender: &Player, params: &[String]) -> Result<()>;
}

/// A command type carrying its own names.
///
/// Implementing this trait is the declarative way to register a command:
/// `builder.command::<HelpCommand>()`.
pub trait DeclaredCommand: Command + Sized + 'static {
    /// Names the command answers to, without prefix
    const NAMES: &'static [&'static str];

    /// Build a fresh instance for one resolution
    fn create() -> Self;
}

/// Builds a command instance each time its name is resolved
pub type CommandFactory = Arc<dyn Fn() -> Arc<dyn Command> + Send + Sync>;

/// Identity of a registered command type
#[derive(Debug, Clone, Copy)]
pub struct CommandId {
    type_id: TypeId,
    type_name: &'static str,
}

impl CommandId {
    pub fn of<C: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
        }
    }

    /// Short type name for logs and errors
    pub fn name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }
}

impl PartialEq for CommandId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CommandId {}

impl Hash for CommandId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps chat words to command instances
pub trait CommandResolver: Send + Sync {
    /// True if `word` carries the command prefix
    fn is_command(&self, word: &str) -> bool;

    /// Resolve a name, with or without prefix, to a fresh command instance
    fn command_by_name(&self, name: &str) -> Option<Arc<dyn Command>>;
}

/// Default resolver: exact prefix match, optional case folding, table lookup
pub struct PrefixCommandResolver {
    catalog: CommandCatalog,
}

impl PrefixCommandResolver {
    pub fn new(catalog: CommandCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }
}

impl CommandResolver for PrefixCommandResolver {
    fn is_command(&self, word: &str) -> bool {
        word.starts_with(self.catalog.options().prefix())
    }

    fn command_by_name(&self, name: &str) -> Option<Arc<dyn Command>> {
        let options = self.catalog.options();
        let bare = name.strip_prefix(options.prefix()).unwrap_or(name);
        if bare.is_empty() {
            return None;
        }

        let Some(id) = options.lookup(bare) else {
            tracing::debug!(name = %bare, "No command registered under name");
            return None;
        };

        let command = self.catalog.instantiate(id);
        if command.is_some() {
            tracing::debug!(name = %bare, command = %id, "Resolved command");
        }
        command
    }
}
