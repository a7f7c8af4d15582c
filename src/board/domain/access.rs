//! Membership roles, capabilities, and the board authorization policy.
//!
//! Authorization is a pure decision over a board, a caller, and the access
//! the caller is asking for. The owner check always runs first so that an
//! owner's authority can never be narrowed by a membership entry.

use super::{Board, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability levels, ordered from least to most privileged.
///
/// The derived ordering is the capability ladder:
/// `View < Modify < ManageMembers`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read the board and everything nested in it.
    View,
    /// Create, change, delete, and move columns and tasks.
    Modify,
    /// Invite users and manage memberships.
    ManageMembers,
}

impl Capability {
    /// Returns `true` when a holder of `self` may exercise `required`.
    ///
    /// This is the single comparison used for every capability check.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Modify => "modify",
            Self::ManageMembers => "manage_members",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role granted to a board member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May read the board.
    #[default]
    Viewer,
    /// May read and modify columns and tasks.
    Editor,
    /// May additionally invite users and manage memberships.
    Admin,
}

impl Role {
    /// Returns the most privileged capability this role grants.
    #[must_use]
    pub const fn capability_ceiling(self) -> Capability {
        match self {
            Self::Viewer => Capability::View,
            Self::Editor => Capability::Modify,
            Self::Admin => Capability::ManageMembers,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Access an operation demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRequirement {
    /// The caller must reach the given rung of the capability ladder.
    Capability(Capability),
    /// The caller must be the board owner; membership roles never qualify.
    Ownership,
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capability(capability) => write!(f, "{capability}"),
            Self::Ownership => f.write_str("ownership"),
        }
    }
}

impl From<Capability> for AccessRequirement {
    fn from(capability: Capability) -> Self {
        Self::Capability(capability)
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    /// The caller may proceed.
    Allow,
    /// The caller lacks the required access.
    Deny,
}

impl AccessDecision {
    /// Returns `true` for [`AccessDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Decides whether `caller` holds `required` capability on `board`.
///
/// The owner is allowed everything. Any other caller is allowed only when
/// their membership role's ceiling reaches `required`; non-members are
/// denied everything.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use taskboard::board::domain::{AccessDecision, Board, Capability, UserId, authorize};
///
/// let owner = UserId::new();
/// let board = Board::new(owner, "Sprint", &DefaultClock).expect("valid title");
/// assert_eq!(authorize(&board, owner, Capability::ManageMembers), AccessDecision::Allow);
/// assert_eq!(authorize(&board, UserId::new(), Capability::View), AccessDecision::Deny);
/// ```
#[must_use]
pub fn authorize(board: &Board, caller: UserId, required: Capability) -> AccessDecision {
    if board.owner_id() == caller {
        return AccessDecision::Allow;
    }
    let allowed = board
        .membership_of(caller)
        .is_some_and(|membership| membership.role().capability_ceiling().satisfies(required));
    AccessDecision::from_bool(allowed)
}

/// Decides whether `caller` meets an [`AccessRequirement`] on `board`.
#[must_use]
pub fn check_access(
    board: &Board,
    caller: UserId,
    requirement: AccessRequirement,
) -> AccessDecision {
    match requirement {
        AccessRequirement::Capability(capability) => authorize(board, caller, capability),
        AccessRequirement::Ownership => AccessDecision::from_bool(board.owner_id() == caller),
    }
}
