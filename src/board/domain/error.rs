//! Error types for board domain validation and parsing.

use super::{ColumnId, TaskId, UserId};
use std::fmt;
use thiserror::Error;

/// Kind of titled entity, used to attribute title validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitledEntity {
    /// A board title.
    Board,
    /// A column title.
    Column,
    /// A task title.
    Task,
}

impl fmt::Display for TitledEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Board => "board",
            Self::Column => "column",
            Self::Task => "task",
        })
    }
}

/// Errors returned while constructing or mutating a board aggregate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A required title is empty after trimming.
    #[error("{0} title must not be empty")]
    EmptyTitle(TitledEntity),

    /// A title exceeds the maximum length.
    #[error("{entity} title exceeds {max} characters")]
    TitleTooLong {
        /// Entity whose title was rejected.
        entity: TitledEntity,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The column does not exist on the board.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The task does not exist in the column it was looked up in.
    #[error("task {task_id} not found in column {column_id}")]
    TaskNotFound {
        /// Column that was searched.
        column_id: ColumnId,
        /// Task that was requested.
        task_id: TaskId,
    },

    /// The user holds no membership on the board.
    #[error("user {0} is not a member of this board")]
    MembershipNotFound(UserId),

    /// A user holds more than one membership in a persisted board.
    #[error("duplicate membership for user {0}")]
    DuplicateMembership(UserId),

    /// A column identifier appears more than once in a persisted board.
    #[error("duplicate column identifier: {0}")]
    DuplicateColumnId(ColumnId),

    /// A task identifier appears more than once in a persisted board.
    #[error("duplicate task identifier: {0}")]
    DuplicateTaskId(TaskId),

    /// The board owner cannot be recorded as a member.
    #[error("board owner {0} cannot hold a membership")]
    OwnerCannotBeMember(UserId),
}

/// Error returned while parsing a membership role from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership role: {0}")]
pub struct ParseRoleError(pub String);
