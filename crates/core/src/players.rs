//! Player service - casts host records and keeps per-player roles
//!
//! Roles live in a side table keyed by player id and are attached each time
//! a raw player is cast. The entry is dropped when the player leaves.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::{Player, PlayerId, RawPlayer, Role};

/// Turns host player records into framework players
pub trait PlayerService: Send + Sync {
    fn cast(&self, raw: &RawPlayer) -> Player;

    /// Drop any state kept for a player that left
    fn forget(&self, _player_id: PlayerId) {}
}

/// Default service: attaches roles from an in-memory side table
#[derive(Debug, Default)]
pub struct RolePlayerService {
    roles: Mutex<HashMap<PlayerId, Vec<Role>>>,
}

impl RolePlayerService {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<PlayerId, Vec<Role>>> {
        match self.roles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Role table mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Give a role to a player. Returns false if they already had it.
    pub fn grant_role(&self, player_id: PlayerId, role: Role) -> bool {
        let mut table = self.table();
        let roles = table.entry(player_id).or_default();
        if roles.contains(&role) {
            return false;
        }
        roles.push(role);
        tracing::info!(player_id, role = %role, "Granted role");
        true
    }

    /// Take a role away. Returns whether the player had it.
    pub fn revoke_role(&self, player_id: PlayerId, role: Role) -> bool {
        let mut table = self.table();
        let Some(roles) = table.get_mut(&player_id) else {
            return false;
        };
        let before = roles.len();
        roles.retain(|r| *r != role);
        let removed = roles.len() != before;
        if removed {
            tracing::info!(player_id, role = %role, "Revoked role");
        }
        removed
    }

    pub fn roles_of(&self, player_id: PlayerId) -> Vec<Role> {
        self.table().get(&player_id).cloned().unwrap_or_default()
    }
}

impl PlayerService for RolePlayerService {
    fn cast(&self, raw: &RawPlayer) -> Player {
        Player::from_raw(raw, self.roles_of(raw.id))
    }

    fn forget(&self, player_id: PlayerId) {
        self.table().remove(&player_id);
    }
}
