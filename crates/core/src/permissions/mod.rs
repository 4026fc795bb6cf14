//! Role checks for commands

use crate::models::{Player, Role};

/// Check if a player holds at least one of `required`. An empty set admits anyone.
pub fn holds_any_role(player: &Player, required: &[Role]) -> bool {
    required.is_empty() || required.iter().any(|role| player.has_role(*role))
}

/// Check if a player holds every role in `required`
pub fn holds_all_roles(player: &Player, required: &[Role]) -> bool {
    required.iter().all(|role| player.has_role(*role))
}
