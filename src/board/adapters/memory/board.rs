//! In-memory repository for board documents.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Board, BoardId, UserId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Board documents keyed by identifier, shared with adapters that must
/// write boards atomically alongside their own state.
pub(crate) type SharedBoards = Arc<RwLock<HashMap<BoardId, Board>>>;

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    boards: SharedBoards,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the underlying board map.
    pub(crate) fn shared(&self) -> SharedBoards {
        Arc::clone(&self.boards)
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(lock_poisoned)?;
        if boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::DuplicateBoard(board.id()));
        }
        boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(lock_poisoned)?;
        let stored = boards
            .get_mut(&board.id())
            .ok_or(BoardRepositoryError::NotFound(board.id()))?;
        *stored = board.clone();
        Ok(())
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(lock_poisoned)?;
        boards
            .remove(&id)
            .map(|_| ())
            .ok_or(BoardRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        let boards = self.boards.read().map_err(lock_poisoned)?;
        Ok(boards.get(&id).cloned())
    }

    async fn list_for_participant(&self, user_id: UserId) -> BoardRepositoryResult<Vec<Board>> {
        let boards = self.boards.read().map_err(lock_poisoned)?;
        let mut visible: Vec<Board> = boards
            .values()
            .filter(|board| board.is_participant(user_id))
            .cloned()
            .collect();
        visible.sort_by_key(|board| (board.created_at(), board.id().into_inner()));
        Ok(visible)
    }
}
