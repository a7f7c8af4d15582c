//! In-memory repository for invitations.
//!
//! The repository shares its board map with an [`InMemoryBoardRepository`]
//! so an acceptance can write the invitation and the board under both locks
//! at once. Locks are always taken boards first, then invitations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    adapters::memory::{InMemoryBoardRepository, SharedBoards},
    domain::{Board, BoardId, UserId},
};
use crate::invitation::{
    domain::{Invitation, InvitationId},
    ports::{InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult},
};

/// Thread-safe in-memory invitation repository.
#[derive(Debug, Clone)]
pub struct InMemoryInvitationRepository {
    invitations: Arc<RwLock<HashMap<InvitationId, Invitation>>>,
    boards: SharedBoards,
}

impl InMemoryInvitationRepository {
    /// Creates an empty repository whose acceptances write into `boards`.
    #[must_use]
    pub fn new(boards: &InMemoryBoardRepository) -> Self {
        Self {
            invitations: Arc::default(),
            boards: boards.shared(),
        }
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> InvitationRepositoryError {
    InvitationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn ensure_still_pending(
    invitations: &HashMap<InvitationId, Invitation>,
    id: InvitationId,
) -> InvitationRepositoryResult<()> {
    let stored = invitations
        .get(&id)
        .ok_or(InvitationRepositoryError::NotFound(id))?;
    if !stored.is_pending() {
        return Err(InvitationRepositoryError::NoLongerPending(id));
    }
    Ok(())
}

fn oldest_first(invitations: &mut [Invitation]) {
    invitations.sort_by_key(|invitation| (invitation.created_at(), invitation.id().into_inner()));
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let mut invitations = self.invitations.write().map_err(lock_poisoned)?;
        if invitations.contains_key(&invitation.id()) {
            return Err(InvitationRepositoryError::DuplicateInvitation(
                invitation.id(),
            ));
        }

        let board_id = invitation.board_id();
        let invitee = invitation.to_user_id();
        let has_pending = invitations.values().any(|existing| {
            existing.is_pending()
                && existing.board_id() == board_id
                && existing.to_user_id() == invitee
        });
        if invitation.is_pending() && has_pending {
            return Err(InvitationRepositoryError::PendingInvitationExists {
                board_id,
                invitee,
            });
        }

        invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn commit_rejection(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let mut invitations = self.invitations.write().map_err(lock_poisoned)?;
        ensure_still_pending(&invitations, invitation.id())?;
        invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn commit_acceptance(
        &self,
        invitation: &Invitation,
        board: &Board,
    ) -> InvitationRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(lock_poisoned)?;
        let mut invitations = self.invitations.write().map_err(lock_poisoned)?;

        ensure_still_pending(&invitations, invitation.id())?;
        let stored_board = boards
            .get_mut(&board.id())
            .ok_or(InvitationRepositoryError::BoardNotFound(board.id()))?;

        *stored_board = board.clone();
        invitations.insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: InvitationId) -> InvitationRepositoryResult<Option<Invitation>> {
        let invitations = self.invitations.read().map_err(lock_poisoned)?;
        Ok(invitations.get(&id).cloned())
    }

    async fn find_pending(
        &self,
        board_id: BoardId,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Option<Invitation>> {
        let invitations = self.invitations.read().map_err(lock_poisoned)?;
        Ok(invitations
            .values()
            .find(|invitation| {
                invitation.is_pending()
                    && invitation.board_id() == board_id
                    && invitation.to_user_id() == invitee
            })
            .cloned())
    }

    async fn list_pending_for_invitee(
        &self,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Vec<Invitation>> {
        let invitations = self.invitations.read().map_err(lock_poisoned)?;
        let mut pending: Vec<Invitation> = invitations
            .values()
            .filter(|invitation| invitation.is_pending() && invitation.to_user_id() == invitee)
            .cloned()
            .collect();
        oldest_first(&mut pending);
        Ok(pending)
    }
}
