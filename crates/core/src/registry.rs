//! Command registry - collects command declarations and validates them
//!
//! Registration only records `(names, command type)` pairs. All checks run
//! once in [`CommandRegistry::build`], before the room serves any message.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::{Command, CommandFactory, CommandId, DeclaredCommand};
use crate::error::{Error, Result};

/// Names declared by one command type
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub names: Vec<String>,
    pub target: CommandId,
}

/// Registry of declared commands, consumed when the room is built
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<(CommandMetadata, CommandFactory)>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a self-describing command type
    pub fn register<C: DeclaredCommand>(&mut self) -> &mut Self {
        self.register_with(C::NAMES, C::create)
    }

    /// Register a command type under explicit names with its factory
    pub fn register_with<C, F>(&mut self, names: &[&str], factory: F) -> &mut Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let metadata = CommandMetadata {
            names: names.iter().map(|n| n.to_string()).collect(),
            target: CommandId::of::<C>(),
        };
        let factory: CommandFactory = Arc::new(move || Arc::new(factory()) as Arc<dyn Command>);
        self.entries.push((metadata, factory));
        self
    }

    /// Declarations in registration order
    pub fn metadata(&self) -> impl Iterator<Item = &CommandMetadata> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// Get number of registered commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate every declaration and freeze the name table.
    ///
    /// Fails on a command type registered twice, a command without names,
    /// a blank name or one containing whitespace, or a name (after case
    /// folding) claimed twice.
    pub fn build(self, prefix: &str, case_sensitive: bool) -> Result<CommandCatalog> {
        if prefix.chars().any(char::is_whitespace) {
            return Err(Error::InvalidPrefix(prefix.to_string()));
        }

        let mut names_to_commands: HashMap<String, CommandId> = HashMap::new();
        let mut factories: HashMap<CommandId, CommandFactory> = HashMap::new();

        for (metadata, factory) in self.entries {
            let target = metadata.target;
            if factories.contains_key(&target) {
                return Err(Error::DuplicateCommand {
                    command: target.to_string(),
                });
            }
            if metadata.names.is_empty() {
                return Err(Error::CommandWithoutNames {
                    command: target.to_string(),
                });
            }

            for name in &metadata.names {
                if name.trim().is_empty() {
                    return Err(Error::BlankCommandName {
                        command: target.to_string(),
                    });
                }
                // Chat is split into words on whitespace
                if name.chars().any(char::is_whitespace) {
                    return Err(Error::InvalidCommandName {
                        name: name.clone(),
                        command: target.to_string(),
                    });
                }
                let key = fold_name(name, case_sensitive);
                if let Some(first) = names_to_commands.get(&key) {
                    return Err(Error::DuplicateCommandName {
                        name: name.clone(),
                        first: first.to_string(),
                        second: target.to_string(),
                    });
                }
                names_to_commands.insert(key, target);
            }

            tracing::debug!(command = %target, names = ?metadata.names, "Registered command");
            factories.insert(target, factory);
        }

        Ok(CommandCatalog {
            options: CommandOptions {
                prefix: prefix.to_string(),
                names_to_commands,
                case_sensitive,
            },
            factories,
        })
    }
}

fn fold_name(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}

/// Frozen prefix and name table
#[derive(Debug, Clone)]
pub struct CommandOptions {
    prefix: String,
    names_to_commands: HashMap<String, CommandId>,
    case_sensitive: bool,
}

impl CommandOptions {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn names_to_commands(&self) -> &HashMap<String, CommandId> {
        &self.names_to_commands
    }

    /// Look up a bare name, folding case unless the table is case sensitive
    pub fn lookup(&self, name: &str) -> Option<CommandId> {
        if self.case_sensitive {
            self.names_to_commands.get(name).copied()
        } else {
            self.names_to_commands.get(&name.to_lowercase()).copied()
        }
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names_to_commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Validated command options plus the factories that instantiate commands
#[derive(Clone)]
pub struct CommandCatalog {
    options: CommandOptions,
    factories: HashMap<CommandId, CommandFactory>,
}

impl CommandCatalog {
    pub fn options(&self) -> &CommandOptions {
        &self.options
    }

    /// Build a fresh instance of a registered command
    pub fn instantiate(&self, id: CommandId) -> Option<Arc<dyn Command>> {
        self.factories.get(&id).map(|factory| factory())
    }
}

impl fmt::Debug for CommandCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCatalog")
            .field("options", &self.options)
            .field("commands", &self.factories.len())
            .finish()
    }
}
