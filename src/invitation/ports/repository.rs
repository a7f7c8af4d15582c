//! Repository port for invitation persistence and the atomic acceptance
//! write.

use crate::board::domain::{Board, BoardId, UserId};
use crate::invitation::domain::{Invitation, InvitationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invitation repository operations.
pub type InvitationRepositoryResult<T> = Result<T, InvitationRepositoryError>;

/// Invitation persistence contract.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Stores a new pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::DuplicateInvitation`] when the
    /// invitation ID already exists or
    /// [`InvitationRepositoryError::PendingInvitationExists`] when the
    /// invitee already has a pending invitation to the same board.
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;

    /// Persists a rejected invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::NotFound`] when the invitation
    /// does not exist or [`InvitationRepositoryError::NoLongerPending`] when
    /// the stored invitation was already decided.
    async fn commit_rejection(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;

    /// Persists an accepted invitation together with the board carrying the
    /// newly granted membership. Either both writes happen or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::NotFound`],
    /// [`InvitationRepositoryError::NoLongerPending`], or
    /// [`InvitationRepositoryError::BoardNotFound`].
    async fn commit_acceptance(
        &self,
        invitation: &Invitation,
        board: &Board,
    ) -> InvitationRepositoryResult<()>;

    /// Finds an invitation by identifier.
    ///
    /// Returns `None` when the invitation does not exist.
    async fn find_by_id(&self, id: InvitationId) -> InvitationRepositoryResult<Option<Invitation>>;

    /// Returns the pending invitation for a board and invitee, if any.
    async fn find_pending(
        &self,
        board_id: BoardId,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Option<Invitation>>;

    /// Returns every pending invitation addressed to the user, oldest first.
    async fn list_pending_for_invitee(
        &self,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Vec<Invitation>>;
}

/// Errors returned by invitation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvitationRepositoryError {
    /// An invitation with the same identifier already exists.
    #[error("duplicate invitation identifier: {0}")]
    DuplicateInvitation(InvitationId),

    /// A pending invitation for the board and invitee already exists.
    #[error("user {invitee} already has a pending invitation to board {board_id}")]
    PendingInvitationExists {
        /// Target board.
        board_id: BoardId,
        /// Invited user.
        invitee: UserId,
    },

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    NotFound(InvitationId),

    /// The stored invitation was decided by a concurrent request.
    #[error("invitation {0} is no longer pending")]
    NoLongerPending(InvitationId),

    /// The board referenced by an acceptance no longer exists.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvitationRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
