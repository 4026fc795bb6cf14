//! Role model

use std::fmt;
use std::hash::{Hash, Hasher};

/// Capability tag attached to a player.
///
/// Consumers declare their roles once as constants; equality is by id.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Role {
    pub id: u32,
    pub name: &'static str,
}

impl Role {
    pub const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
