//! Board membership entries.

use super::{Role, UserId};
use serde::{Deserialize, Serialize};

/// A user's role on a board they do not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    user_id: UserId,
    role: Role,
}

impl Membership {
    /// Creates a membership entry.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    pub(super) const fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Effect of granting a membership on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// A new membership entry was appended.
    Added,
    /// The user was already a member; their role was replaced.
    RoleReplaced {
        /// Role held before the grant.
        previous: Role,
    },
}
