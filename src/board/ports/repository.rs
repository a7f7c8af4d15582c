//! Repository port for whole-document board persistence.
//!
//! Boards are written back in full after every mutation. The storage layer
//! is expected to apply each write to a single board atomically, with
//! last-write-wins semantics between concurrent writers.

use crate::board::domain::{Board, BoardId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Stores a new board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateBoard`] when the board ID
    /// already exists.
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()>;

    /// Replaces the stored document of an existing board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the board does not
    /// exist.
    async fn update(&self, board: &Board) -> BoardRepositoryResult<()>;

    /// Deletes a board together with its columns and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the board does not
    /// exist.
    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()>;

    /// Finds a board by identifier.
    ///
    /// Returns `None` when the board does not exist.
    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>>;

    /// Returns every board the user owns or holds a membership on.
    async fn list_for_participant(&self, user_id: UserId) -> BoardRepositoryResult<Vec<Board>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A board with the same identifier already exists.
    #[error("duplicate board identifier: {0}")]
    DuplicateBoard(BoardId),

    /// The board was not found.
    #[error("board not found: {0}")]
    NotFound(BoardId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
