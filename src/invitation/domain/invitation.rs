//! Invitation aggregate root.

use super::{InvitationDomainError, InvitationId, InvitationStatus};
use crate::board::domain::{BoardId, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// An offer of membership on a board, addressed to a single user.
///
/// The board reference is not kept in sync with the board's lifetime: an
/// invitation outlives a deleted board as an orphaned reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invitation {
    id: InvitationId,
    board_id: BoardId,
    from_user_id: UserId,
    to_user_id: UserId,
    role: Role,
    status: InvitationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameters for creating a new invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvitationParams {
    /// Board the invitee would join.
    pub board_id: BoardId,
    /// User sending the invitation.
    pub from_user_id: UserId,
    /// User being invited.
    pub to_user_id: UserId,
    /// Role granted on acceptance.
    pub role: Role,
}

/// Parameter object for reconstructing a persisted invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInvitationData {
    /// Persisted invitation identifier.
    pub id: InvitationId,
    /// Persisted board reference.
    pub board_id: BoardId,
    /// Persisted inviter.
    pub from_user_id: UserId,
    /// Persisted invitee.
    pub to_user_id: UserId,
    /// Persisted role.
    pub role: Role,
    /// Persisted lifecycle status.
    pub status: InvitationStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a pending invitation.
    #[must_use]
    pub fn new(params: InvitationParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: InvitationId::new(),
            board_id: params.board_id,
            from_user_id: params.from_user_id,
            to_user_id: params.to_user_id,
            role: params.role,
            status: InvitationStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an invitation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInvitationData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            from_user_id: data.from_user_id,
            to_user_id: data.to_user_id,
            role: data.role,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the referenced board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the inviting user.
    #[must_use]
    pub const fn from_user_id(&self) -> UserId {
        self.from_user_id
    }

    /// Returns the invited user.
    #[must_use]
    pub const fn to_user_id(&self) -> UserId {
        self.to_user_id
    }

    /// Returns the role granted on acceptance.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns `true` while the invitation awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the invitation accepted on behalf of `caller`.
    ///
    /// Granting the membership is the caller's responsibility and must be
    /// persisted together with this transition.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::NotAddressee`] when `caller` is not
    /// the invitee, or [`InvitationDomainError::InvalidStateTransition`] when
    /// the invitation is no longer pending.
    pub fn accept(
        &mut self,
        caller: UserId,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        self.transition(caller, InvitationStatus::Accepted, clock)
    }

    /// Marks the invitation rejected on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::NotAddressee`] when `caller` is not
    /// the invitee, or [`InvitationDomainError::InvalidStateTransition`] when
    /// the invitation is no longer pending.
    pub fn reject(
        &mut self,
        caller: UserId,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        self.transition(caller, InvitationStatus::Rejected, clock)
    }

    fn transition(
        &mut self,
        caller: UserId,
        target: InvitationStatus,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        if caller != self.to_user_id {
            return Err(InvitationDomainError::NotAddressee {
                invitation_id: self.id,
                caller,
            });
        }
        if !self.status.can_transition_to(target) {
            return Err(InvitationDomainError::InvalidStateTransition {
                invitation_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }
}
