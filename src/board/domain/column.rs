//! Columns partitioning a board.

use super::{
    BoardDomainError, ColumnId, Task, TaskId, TitledEntity,
    text::{check_title, normalize_title},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An ordered list of tasks under a title.
///
/// Tasks keep insertion order; moved tasks are appended at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    title: String,
    #[serde(default)]
    tasks: Vec<Task>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Column {
    /// Creates an empty column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, clock: &impl Clock) -> Result<Self, BoardDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: ColumnId::new(),
            title: normalize_title(title, TitledEntity::Column)?,
            tasks: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Finds a task in this column.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
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

    pub(super) fn rename(
        &mut self,
        title: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.title = normalize_title(title, TitledEntity::Column)?;
        self.touch(clock);
        Ok(())
    }

    pub(super) fn push_task(&mut self, task: Task, clock: &impl Clock) {
        self.tasks.push(task);
        self.touch(clock);
    }

    pub(super) fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, BoardDomainError> {
        let column_id = self.id;
        self.tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(BoardDomainError::TaskNotFound { column_id, task_id })
    }

    /// Detaches a task from this column, preserving the order of the rest.
    pub(super) fn take_task(
        &mut self,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<Task, BoardDomainError> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id() == task_id)
            .ok_or(BoardDomainError::TaskNotFound {
                column_id: self.id,
                task_id,
            })?;
        let task = self.tasks.remove(position);
        self.touch(clock);
        Ok(task)
    }

    pub(super) fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    pub(super) fn validate_persisted(&self) -> Result<(), BoardDomainError> {
        check_title(&self.title, TitledEntity::Column)?;
        self.tasks.iter().try_for_each(Task::validate_persisted)
    }
}
