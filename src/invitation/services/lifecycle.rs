//! Service layer for creating and deciding invitations.

use crate::board::{
    domain::{
        AccessDecision, AccessRequirement, Board, BoardDomainError, BoardId, Capability, Role,
        UserId, check_access,
    },
    ports::{BoardRepository, BoardRepositoryError},
    services::{domain_error_kind, repository_error_kind},
};
use crate::error::ErrorKind;
use crate::invitation::{
    domain::{Invitation, InvitationDomainError, InvitationId, InvitationParams},
    ports::{InvitationRepository, InvitationRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for inviting a user onto a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateInvitationRequest {
    board_id: BoardId,
    invitee: UserId,
    role: Role,
}

impl CreateInvitationRequest {
    /// Creates an invitation request.
    #[must_use]
    pub const fn new(board_id: BoardId, invitee: UserId, role: Role) -> Self {
        Self {
            board_id,
            invitee,
            role,
        }
    }
}

/// Service-level errors for invitation operations.
#[derive(Debug, Error)]
pub enum InvitationServiceError {
    /// Invitation state machine or validation failure.
    #[error(transparent)]
    Domain(#[from] InvitationDomainError),

    /// Granting the membership on the board failed validation.
    #[error(transparent)]
    BoardDomain(#[from] BoardDomainError),

    /// Invitation repository operation failed.
    #[error(transparent)]
    Repository(#[from] InvitationRepositoryError),

    /// Board repository operation failed.
    #[error(transparent)]
    BoardRepository(#[from] BoardRepositoryError),

    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// The referenced board does not exist.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The caller may not invite users onto the board.
    #[error("user {caller} lacks {required} access to board {board_id}")]
    Forbidden {
        /// Board the caller tried to invite onto.
        board_id: BoardId,
        /// The denied caller.
        caller: UserId,
        /// Access the operation required.
        required: AccessRequirement,
    },

    /// A pending invitation already exists for the board and invitee.
    #[error("user {invitee} already has a pending invitation to board {board_id}")]
    DuplicateInvitation {
        /// Target board.
        board_id: BoardId,
        /// Invited user.
        invitee: UserId,
    },
}

impl InvitationServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => match err {
                InvitationDomainError::NotAddressee { .. } => ErrorKind::Forbidden,
                InvitationDomainError::InvalidStateTransition { .. } => {
                    ErrorKind::InvalidStateTransition
                }
                InvitationDomainError::InviteeIsOwner(_) => ErrorKind::Validation,
            },
            Self::BoardDomain(err) => domain_error_kind(err),
            Self::Repository(err) => match err {
                InvitationRepositoryError::NotFound(_)
                | InvitationRepositoryError::BoardNotFound(_) => ErrorKind::NotFound,
                InvitationRepositoryError::NoLongerPending(_) => ErrorKind::InvalidStateTransition,
                InvitationRepositoryError::PendingInvitationExists { .. } => {
                    ErrorKind::DuplicateInvitation
                }
                InvitationRepositoryError::DuplicateInvitation(_)
                | InvitationRepositoryError::InvalidPersistedData(_)
                | InvitationRepositoryError::Persistence(_) => ErrorKind::Storage,
            },
            Self::BoardRepository(err) => repository_error_kind(err),
            Self::InvitationNotFound(_) | Self::BoardNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::DuplicateInvitation { .. } => ErrorKind::DuplicateInvitation,
        }
    }
}

/// Result type for invitation service operations.
pub type InvitationServiceResult<T> = Result<T, InvitationServiceError>;

/// Invitation orchestration service.
///
/// Reads boards through `B` to authorize inviters and to build the granted
/// membership; all invitation writes, including the acceptance that also
/// rewrites the board, go through `I`.
#[derive(Clone)]
pub struct InvitationService<B, I, C>
where
    B: BoardRepository,
    I: InvitationRepository,
    C: Clock + Send + Sync,
{
    boards: Arc<B>,
    invitations: Arc<I>,
    clock: Arc<C>,
}

impl<B, I, C> InvitationService<B, I, C>
where
    B: BoardRepository,
    I: InvitationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new invitation service.
    #[must_use]
    pub const fn new(boards: Arc<B>, invitations: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            boards,
            invitations,
            clock,
        }
    }

    /// Returns the caller's pending invitations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_pending(&self, caller: UserId) -> InvitationServiceResult<Vec<Invitation>> {
        Ok(self.invitations.list_pending_for_invitee(caller).await?)
    }

    /// Invites a user onto a board. Requires [`Capability::ManageMembers`].
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::BoardNotFound`],
    /// [`InvitationServiceError::Forbidden`],
    /// [`InvitationDomainError::InviteeIsOwner`] when the owner is invited, or
    /// [`InvitationServiceError::DuplicateInvitation`] while an earlier
    /// invitation for the same pair is pending.
    pub async fn create(
        &self,
        caller: UserId,
        request: CreateInvitationRequest,
    ) -> InvitationServiceResult<Invitation> {
        let CreateInvitationRequest {
            board_id,
            invitee,
            role,
        } = request;
        let board = self.load_board(board_id).await?;

        let required = AccessRequirement::from(Capability::ManageMembers);
        if check_access(&board, caller, required) == AccessDecision::Deny {
            tracing::warn!(
                board_id = %board_id,
                caller = %caller,
                required = %required,
                "invitation denied"
            );
            return Err(InvitationServiceError::Forbidden {
                board_id,
                caller,
                required,
            });
        }
        if board.is_owner(invitee) {
            return Err(InvitationDomainError::InviteeIsOwner(invitee).into());
        }
        if self
            .invitations
            .find_pending(board_id, invitee)
            .await?
            .is_some()
        {
            return Err(InvitationServiceError::DuplicateInvitation { board_id, invitee });
        }

        let invitation = Invitation::new(
            InvitationParams {
                board_id,
                from_user_id: caller,
                to_user_id: invitee,
                role,
            },
            &*self.clock,
        );
        self.invitations.store(&invitation).await?;
        tracing::info!(
            invitation_id = %invitation.id(),
            board_id = %board_id,
            invitee = %invitee,
            role = %role,
            "invitation created"
        );
        Ok(invitation)
    }

    /// Accepts an invitation and grants its role on the board.
    ///
    /// The status change and the membership grant are committed together.
    /// A user who already holds a membership has their role replaced.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::InvitationNotFound`],
    /// [`InvitationDomainError::NotAddressee`] for anyone but the invitee,
    /// [`InvitationDomainError::InvalidStateTransition`] once decided, or
    /// [`InvitationServiceError::BoardNotFound`] when the board was deleted.
    pub async fn accept(
        &self,
        invitation_id: InvitationId,
        caller: UserId,
    ) -> InvitationServiceResult<Invitation> {
        let mut invitation = self.load_invitation(invitation_id).await?;
        invitation
            .accept(caller, &*self.clock)
            .inspect_err(warn_on_denial)?;

        let mut board = self.load_board(invitation.board_id()).await?;
        let change = board.grant_membership(
            invitation.to_user_id(),
            invitation.role(),
            &*self.clock,
        )?;
        self.invitations
            .commit_acceptance(&invitation, &board)
            .await?;

        tracing::info!(
            invitation_id = %invitation_id,
            board_id = %board.id(),
            member = %caller,
            change = ?change,
            "invitation accepted"
        );
        Ok(invitation)
    }

    /// Rejects an invitation. The board is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::InvitationNotFound`],
    /// [`InvitationDomainError::NotAddressee`] for anyone but the invitee, or
    /// [`InvitationDomainError::InvalidStateTransition`] once decided.
    pub async fn reject(
        &self,
        invitation_id: InvitationId,
        caller: UserId,
    ) -> InvitationServiceResult<Invitation> {
        let mut invitation = self.load_invitation(invitation_id).await?;
        invitation
            .reject(caller, &*self.clock)
            .inspect_err(warn_on_denial)?;
        self.invitations.commit_rejection(&invitation).await?;
        tracing::info!(invitation_id = %invitation_id, "invitation rejected");
        Ok(invitation)
    }

    async fn load_invitation(&self, id: InvitationId) -> InvitationServiceResult<Invitation> {
        let invitation = self.invitations.find_by_id(id).await?;
        invitation.ok_or(InvitationServiceError::InvitationNotFound(id))
    }

    async fn load_board(&self, id: BoardId) -> InvitationServiceResult<Board> {
        let board = self.boards.find_by_id(id).await?;
        board.ok_or(InvitationServiceError::BoardNotFound(id))
    }
}

fn warn_on_denial(err: &InvitationDomainError) {
    if let InvitationDomainError::NotAddressee {
        invitation_id,
        caller,
    } = err
    {
        tracing::warn!(
            invitation_id = %invitation_id,
            caller = %caller,
            "invitation decision denied"
        );
    }
}
