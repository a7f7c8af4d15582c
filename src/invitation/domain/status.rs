//! Invitation lifecycle status.

use super::ParseInvitationStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an invitation.
///
/// `Pending` is the only state with outgoing transitions; `Accepted` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a decision from the invitee.
    Pending,
    /// The invitee joined the board.
    Accepted,
    /// The invitee declined.
    Rejected,
}

impl InvitationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` when no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Returns `true` when moving from `self` to `target` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Rejected)
        )
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = ParseInvitationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseInvitationStatusError(value.to_owned())),
        }
    }
}
