//! Board aggregate root.
//!
//! A board exclusively owns its columns, which exclusively own their tasks.
//! Every mutation goes through the aggregate so nested invariants hold
//! before the whole document is persisted.

use super::{
    BoardDomainError, BoardId, Column, ColumnId, Membership, MembershipChange, Role, Task,
    TaskDraft, TaskId, TaskPatch, TitledEntity, UserId,
    text::{check_title, normalize_title},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::collections::HashSet;

/// Board aggregate root.
///
/// The owner never appears in `members`; their authority is implicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    id: BoardId,
    title: String,
    owner_id: UserId,
    members: Vec<Membership>,
    columns: Vec<Column>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted board aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Persisted title.
    pub title: String,
    /// Persisted owner.
    pub owner_id: UserId,
    /// Persisted memberships.
    pub members: Vec<Membership>,
    /// Persisted columns with their tasks.
    pub columns: Vec<Column>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates an empty board owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank and
    /// [`BoardDomainError::TitleTooLong`] when it exceeds
    /// [`MAX_TITLE_LENGTH`](super::MAX_TITLE_LENGTH) characters.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: BoardId::new(),
            title: normalize_title(title, TitledEntity::Board)?,
            owner_id,
            members: Vec::new(),
            columns: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a board from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardDomainError`] when the stored document violates an
    /// aggregate invariant: blank titles, the owner listed as a member,
    /// repeated memberships, or repeated column or task identifiers.
    pub fn from_persisted(data: PersistedBoardData) -> Result<Self, BoardDomainError> {
        let board = Self {
            id: data.id,
            title: data.title,
            owner_id: data.owner_id,
            members: data.members,
            columns: data.columns,
            created_at: data.created_at,
            updated_at: data.updated_at,
        };
        board.validate_persisted()?;
        Ok(board)
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the owner's user identifier.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the memberships in the order they were granted.
    #[must_use]
    pub fn members(&self) -> &[Membership] {
        &self.members
    }

    /// Returns the columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `user_id` owns this board.
    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Returns `true` when `user_id` is the owner or holds any membership.
    #[must_use]
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.is_owner(user_id) || self.membership_of(user_id).is_some()
    }

    /// Looks up the membership held by `user_id`.
    #[must_use]
    pub fn membership_of(&self, user_id: UserId) -> Option<&Membership> {
        self.members
            .iter()
            .find(|membership| membership.user_id() == user_id)
    }

    /// Finds a column by identifier.
    #[must_use]
    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks().len()).sum()
    }

    /// Replaces the board title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn rename(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.title = normalize_title(title, TitledEntity::Board)?;
        self.touch(clock);
        Ok(())
    }

    /// Appends an empty column and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn add_column(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<ColumnId, BoardDomainError> {
        let column = Column::new(title, clock)?;
        let column_id = column.id();
        self.columns.push(column);
        self.touch(clock);
        Ok(column_id)
    }

    /// Replaces a column's title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::EmptyTitle`].
    pub fn rename_column(
        &mut self,
        column_id: ColumnId,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.column_mut(column_id)?.rename(title, clock)?;
        self.touch(clock);
        Ok(())
    }

    /// Removes a column together with all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] when no such column exists.
    pub fn remove_column(
        &mut self,
        column_id: ColumnId,
        clock: &impl Clock,
    ) -> Result<Column, BoardDomainError> {
        let position = self.column_position(column_id)?;
        let removed = self.columns.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Creates a task at the end of a column and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::EmptyTitle`].
    pub fn add_task(
        &mut self,
        column_id: ColumnId,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<TaskId, BoardDomainError> {
        let column = self.column_mut(column_id)?;
        let task = Task::new(draft, clock)?;
        let task_id = task.id();
        column.push_task(task, clock);
        self.touch(clock);
        Ok(task_id)
    }

    /// Applies a field-level patch to a task in the given column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`],
    /// [`BoardDomainError::TaskNotFound`], or a validation error from the
    /// patch. Nothing changes on error.
    pub fn update_task(
        &mut self,
        column_id: ColumnId,
        task_id: TaskId,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let column = self.column_mut(column_id)?;
        column.task_mut(task_id)?.apply(patch, clock)?;
        column.touch(clock);
        self.touch(clock);
        Ok(())
    }

    /// Removes a task from the given column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::TaskNotFound`].
    pub fn remove_task(
        &mut self,
        column_id: ColumnId,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<Task, BoardDomainError> {
        let removed = self.column_mut(column_id)?.take_task(task_id, clock)?;
        self.touch(clock);
        Ok(removed)
    }

    /// Relocates a task from one column to the end of another.
    ///
    /// Both columns are resolved before anything changes, and the task must
    /// live in `from` specifically. The task keeps its identity and every
    /// field. Moving within the same column sends the task to the end.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for either column, or
    /// [`BoardDomainError::TaskNotFound`] when the task is not in `from`.
    pub fn move_task(
        &mut self,
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let from_position = self.column_position(from)?;
        let to_position = self.column_position(to)?;

        let task = self
            .columns
            .get_mut(from_position)
            .ok_or(BoardDomainError::ColumnNotFound(from))?
            .take_task(task_id, clock)?;
        self.columns
            .get_mut(to_position)
            .ok_or(BoardDomainError::ColumnNotFound(to))?
            .push_task(task, clock);
        self.touch(clock);
        Ok(())
    }

    /// Grants `role` to `user_id`.
    ///
    /// An existing membership has its role replaced rather than being
    /// duplicated, so repeated grants are idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::OwnerCannotBeMember`] when `user_id` owns
    /// the board.
    pub fn grant_membership(
        &mut self,
        user_id: UserId,
        role: Role,
        clock: &impl Clock,
    ) -> Result<MembershipChange, BoardDomainError> {
        if self.is_owner(user_id) {
            return Err(BoardDomainError::OwnerCannotBeMember(user_id));
        }

        let change = if let Some(existing) = self
            .members
            .iter_mut()
            .find(|membership| membership.user_id() == user_id)
        {
            let previous = existing.role();
            existing.set_role(role);
            MembershipChange::RoleReplaced { previous }
        } else {
            self.members.push(Membership::new(user_id, role));
            MembershipChange::Added
        };
        self.touch(clock);
        Ok(change)
    }

    /// Removes the membership held by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::MembershipNotFound`] when the user holds
    /// no membership. The owner never does.
    pub fn revoke_membership(
        &mut self,
        user_id: UserId,
        clock: &impl Clock,
    ) -> Result<Membership, BoardDomainError> {
        let position = self
            .members
            .iter()
            .position(|membership| membership.user_id() == user_id)
            .ok_or(BoardDomainError::MembershipNotFound(user_id))?;
        let removed = self.members.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    fn column_position(&self, column_id: ColumnId) -> Result<usize, BoardDomainError> {
        self.columns
            .iter()
            .position(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))
    }

    fn column_mut(&mut self, column_id: ColumnId) -> Result<&mut Column, BoardDomainError> {
        self.columns
            .iter_mut()
            .find(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    fn validate_persisted(&self) -> Result<(), BoardDomainError> {
        check_title(&self.title, TitledEntity::Board)?;

        let mut seen_members = HashSet::new();
        for membership in &self.members {
            let user_id = membership.user_id();
            if user_id == self.owner_id {
                return Err(BoardDomainError::OwnerCannotBeMember(user_id));
            }
            if !seen_members.insert(user_id) {
                return Err(BoardDomainError::DuplicateMembership(user_id));
            }
        }

        let mut seen_columns = HashSet::new();
        let mut seen_tasks = HashSet::new();
        for column in &self.columns {
            if !seen_columns.insert(column.id()) {
                return Err(BoardDomainError::DuplicateColumnId(column.id()));
            }
            column.validate_persisted()?;
            for task in column.tasks() {
                if !seen_tasks.insert(task.id()) {
                    return Err(BoardDomainError::DuplicateTaskId(task.id()));
                }
            }
        }
        Ok(())
    }
}
