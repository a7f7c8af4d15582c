//! Domain model for boards, their nested columns and tasks, and access
//! control.
//!
//! The board is a single aggregate root: columns and tasks are only ever
//! reached and changed through it. Authorization is a pure function over the
//! aggregate and lives alongside it.

mod access;
mod board;
mod column;
mod error;
mod ids;
mod membership;
mod task;
mod text;

pub use access::{
    AccessDecision, AccessRequirement, Capability, Role, authorize, check_access,
};
pub use board::{Board, PersistedBoardData};
pub use column::Column;
pub use error::{BoardDomainError, ParseRoleError, TitledEntity};
pub use ids::{BoardId, ColumnId, TaskId, UserId};
pub use membership::{Membership, MembershipChange};
pub use task::{Task, TaskDraft, TaskPatch};
pub use text::MAX_TITLE_LENGTH;
