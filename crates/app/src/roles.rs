//! Roles used by the bundled commands

use haxroom_core::Role;

pub const ADMIN: Role = Role::new(1, "admin");
pub const SUPER_ADMIN: Role = Role::new(2, "super-admin");

/// Either role may run moderation commands
pub const MODERATORS: &[Role] = &[ADMIN, SUPER_ADMIN];
