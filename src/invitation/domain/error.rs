//! Error types for the invitation state machine.

use super::{InvitationId, InvitationStatus};
use crate::board::domain::UserId;
use thiserror::Error;

/// Errors returned by invitation construction and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvitationDomainError {
    /// Only the invitee may accept or reject an invitation.
    #[error("user {caller} is not the addressee of invitation {invitation_id}")]
    NotAddressee {
        /// Invitation acted upon.
        invitation_id: InvitationId,
        /// User who attempted the transition.
        caller: UserId,
    },

    /// The requested transition is not permitted from the current status.
    #[error("invitation {invitation_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Invitation acted upon.
        invitation_id: InvitationId,
        /// Current status.
        from: InvitationStatus,
        /// Requested status.
        to: InvitationStatus,
    },

    /// The board owner cannot be invited to their own board.
    #[error("user {0} owns the board and cannot be invited to it")]
    InviteeIsOwner(UserId),
}

/// Error returned while parsing invitation status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invitation status: {0}")]
pub struct ParseInvitationStatusError(pub String);
