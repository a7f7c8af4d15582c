//! Service layer for authorization-gated board operations.
//!
//! Every operation resolves the board, checks the caller's access, applies
//! the change to the in-memory aggregate, and writes the whole board back.
//! A failed check or validation leaves storage untouched.

use crate::board::{
    domain::{
        AccessDecision, AccessRequirement, Board, BoardDomainError, BoardId, Capability, ColumnId,
        TaskDraft, TaskId, TaskPatch, UserId, check_access,
    },
    ports::{BoardRepository, BoardRepositoryError},
};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for relocating a task between columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTaskRequest {
    task_id: TaskId,
    from_column: ColumnId,
    to_column: ColumnId,
}

impl MoveTaskRequest {
    /// Creates a move request.
    #[must_use]
    pub const fn new(task_id: TaskId, from_column: ColumnId, to_column: ColumnId) -> Self {
        Self {
            task_id,
            from_column,
            to_column,
        }
    }
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation or lookup failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),

    /// The board does not exist.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The caller lacks the access the operation requires.
    #[error("user {caller} lacks {required} access to board {board_id}")]
    Forbidden {
        /// Board the caller tried to act on.
        board_id: BoardId,
        /// The denied caller.
        caller: UserId,
        /// Access the operation required.
        required: AccessRequirement,
    },
}

impl BoardServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => domain_error_kind(err),
            Self::Repository(err) => repository_error_kind(err),
            Self::BoardNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
        }
    }
}

/// Classifies a board domain error.
pub(crate) const fn domain_error_kind(err: &BoardDomainError) -> ErrorKind {
    match err {
        BoardDomainError::ColumnNotFound(_)
        | BoardDomainError::TaskNotFound { .. }
        | BoardDomainError::MembershipNotFound(_) => ErrorKind::NotFound,
        BoardDomainError::EmptyTitle(_)
        | BoardDomainError::TitleTooLong { .. }
        | BoardDomainError::OwnerCannotBeMember(_)
        | BoardDomainError::DuplicateMembership(_)
        | BoardDomainError::DuplicateColumnId(_)
        | BoardDomainError::DuplicateTaskId(_) => ErrorKind::Validation,
    }
}

/// Classifies a board repository error.
pub(crate) const fn repository_error_kind(err: &BoardRepositoryError) -> ErrorKind {
    match err {
        BoardRepositoryError::NotFound(_) => ErrorKind::NotFound,
        BoardRepositoryError::DuplicateBoard(_)
        | BoardRepositoryError::InvalidPersistedData(_)
        | BoardRepositoryError::Persistence(_) => ErrorKind::Storage,
    }
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns every board the caller owns or is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_boards(&self, caller: UserId) -> BoardServiceResult<Vec<Board>> {
        Ok(self.repository.list_for_participant(caller).await?)
    }

    /// Reads a board. Requires [`Capability::View`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::BoardNotFound`],
    /// [`BoardServiceError::Forbidden`], or a repository error.
    pub async fn get_board(&self, board_id: BoardId, caller: UserId) -> BoardServiceResult<Board> {
        self.load_authorized(board_id, caller, Capability::View.into())
            .await
    }

    /// Creates an empty board owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for a blank title or a
    /// repository error when the board cannot be stored.
    pub async fn create_board(
        &self,
        caller: UserId,
        title: impl Into<String> + Send,
    ) -> BoardServiceResult<Board> {
        let board = Board::new(caller, title, &*self.clock)?;
        self.repository.store(&board).await?;
        tracing::info!(board_id = %board.id(), owner = %caller, "board created");
        Ok(board)
    }

    /// Replaces the board title. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for any caller other than the
    /// owner, including admin members.
    pub async fn update_board(
        &self,
        board_id: BoardId,
        caller: UserId,
        title: impl Into<String> + Send,
    ) -> BoardServiceResult<Board> {
        let new_title: String = title.into();
        self.mutate(board_id, caller, AccessRequirement::Ownership, |board, clock| {
            board.rename(new_title, clock)
        })
        .await
    }

    /// Deletes a board with all its columns and tasks. Owner only.
    ///
    /// Invitations that reference the board are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::BoardNotFound`] or
    /// [`BoardServiceError::Forbidden`].
    pub async fn delete_board(&self, board_id: BoardId, caller: UserId) -> BoardServiceResult<()> {
        self.load_authorized(board_id, caller, AccessRequirement::Ownership)
            .await?;
        self.repository.delete(board_id).await?;
        tracing::info!(board_id = %board_id, owner = %caller, "board deleted");
        Ok(())
    }

    /// Appends an empty column. Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for a blank title, plus the
    /// shared lookup and access errors.
    pub async fn add_column(
        &self,
        board_id: BoardId,
        caller: UserId,
        title: impl Into<String> + Send,
    ) -> BoardServiceResult<Board> {
        let new_title: String = title.into();
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.add_column(new_title, clock).map(|_| ())
        })
        .await
    }

    /// Renames a column. Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the column is missing or the
    /// title is blank, plus the shared lookup and access errors.
    pub async fn rename_column(
        &self,
        board_id: BoardId,
        caller: UserId,
        column_id: ColumnId,
        title: impl Into<String> + Send,
    ) -> BoardServiceResult<Board> {
        let new_title: String = title.into();
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.rename_column(column_id, new_title, clock)
        })
        .await
    }

    /// Deletes a column and its tasks. Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] wrapping
    /// [`BoardDomainError::ColumnNotFound`], plus the shared lookup and access
    /// errors.
    pub async fn delete_column(
        &self,
        board_id: BoardId,
        caller: UserId,
        column_id: ColumnId,
    ) -> BoardServiceResult<Board> {
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.remove_column(column_id, clock).map(|_| ())
        })
        .await
    }

    /// Adds a task at the end of a column. Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the column is missing or the
    /// title is blank, plus the shared lookup and access errors.
    pub async fn add_task(
        &self,
        board_id: BoardId,
        caller: UserId,
        column_id: ColumnId,
        draft: TaskDraft,
    ) -> BoardServiceResult<Board> {
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.add_task(column_id, draft, clock).map(|_| ())
        })
        .await
    }

    /// Applies a field-level patch to a task. Requires
    /// [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the column or task is
    /// missing or the patch is invalid, plus the shared lookup and access
    /// errors.
    pub async fn update_task(
        &self,
        board_id: BoardId,
        caller: UserId,
        column_id: ColumnId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> BoardServiceResult<Board> {
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.update_task(column_id, task_id, patch, clock)
        })
        .await
    }

    /// Deletes a task from a column. Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the column or task is
    /// missing, plus the shared lookup and access errors.
    pub async fn delete_task(
        &self,
        board_id: BoardId,
        caller: UserId,
        column_id: ColumnId,
        task_id: TaskId,
    ) -> BoardServiceResult<Board> {
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.remove_task(column_id, task_id, clock).map(|_| ())
        })
        .await
    }

    /// Moves a task to the end of another column in a single write.
    /// Requires [`Capability::Modify`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when either column is missing or
    /// the task is not in the source column, plus the shared lookup and
    /// access errors.
    pub async fn move_task(
        &self,
        board_id: BoardId,
        caller: UserId,
        request: MoveTaskRequest,
    ) -> BoardServiceResult<Board> {
        let MoveTaskRequest {
            task_id,
            from_column,
            to_column,
        } = request;
        self.mutate(board_id, caller, Capability::Modify.into(), |board, clock| {
            board.move_task(task_id, from_column, to_column, clock)
        })
        .await
    }

    /// Revokes a user's membership. Requires [`Capability::ManageMembers`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] wrapping
    /// [`BoardDomainError::MembershipNotFound`] when the user is not a
    /// member, plus the shared lookup and access errors.
    pub async fn remove_member(
        &self,
        board_id: BoardId,
        caller: UserId,
        member: UserId,
    ) -> BoardServiceResult<Board> {
        self.mutate(
            board_id,
            caller,
            Capability::ManageMembers.into(),
            |board, clock| board.revoke_membership(member, clock).map(|_| ()),
        )
        .await
    }

    async fn load_authorized(
        &self,
        board_id: BoardId,
        caller: UserId,
        required: AccessRequirement,
    ) -> BoardServiceResult<Board> {
        let board = self
            .repository
            .find_by_id(board_id)
            .await?
            .ok_or(BoardServiceError::BoardNotFound(board_id))?;

        if check_access(&board, caller, required) == AccessDecision::Deny {
            tracing::warn!(
                board_id = %board_id,
                caller = %caller,
                required = %required,
                "board access denied"
            );
            return Err(BoardServiceError::Forbidden {
                board_id,
                caller,
                required,
            });
        }
        Ok(board)
    }

    async fn mutate<F>(
        &self,
        board_id: BoardId,
        caller: UserId,
        required: AccessRequirement,
        change: F,
    ) -> BoardServiceResult<Board>
    where
        F: FnOnce(&mut Board, &C) -> Result<(), BoardDomainError> + Send,
    {
        let mut board = self.load_authorized(board_id, caller, required).await?;
        change(&mut board, &*self.clock)?;
        self.repository.update(&board).await?;
        tracing::debug!(board_id = %board_id, caller = %caller, "board updated");
        Ok(board)
    }
}
