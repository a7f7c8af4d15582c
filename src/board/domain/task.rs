//! Tasks nested inside board columns.

use super::{
    BoardDomainError, TaskId, TitledEntity, UserId,
    text::{check_title, normalize_tags, normalize_title},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of work living in exactly one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field values for a task about to be created.
///
/// Only the title is required; everything else defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
    tags: Vec<String>,
    assigned_to: Option<UserId>,
}

impl TaskDraft {
    /// Creates a draft with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            deadline: None,
            tags: Vec::new(),
            assigned_to: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the task deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the task tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Assigns the task to a user.
    #[must_use]
    pub const fn with_assignee(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }
}

/// Field-level changes to an existing task.
///
/// Unset fields are left untouched. `deadline` and `assigned_to` use a
/// nested option so they can be cleared explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    deadline: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
    assigned_to: Option<Option<UserId>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(Some(deadline));
        self
    }

    /// Removes the deadline.
    #[must_use]
    pub const fn clear_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Assigns the task to a user.
    #[must_use]
    pub const fn with_assignee(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(Some(user_id));
        self
    }

    /// Removes the assignee.
    #[must_use]
    pub const fn clear_assignee(mut self) -> Self {
        self.assigned_to = Some(None);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.deadline.is_none()
            && self.tags.is_none()
            && self.assigned_to.is_none()
    }
}

impl Task {
    /// Creates a task from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the draft title is blank.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, BoardDomainError> {
        let TaskDraft {
            title,
            description,
            deadline,
            tags,
            assigned_to,
        } = draft;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: normalize_title(title, TitledEntity::Task)?,
            description,
            deadline,
            tags: normalize_tags(tags),
            assigned_to,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the task tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
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

    /// Applies a patch after validating it in full.
    ///
    /// Nothing is changed when validation fails.
    pub(super) fn apply(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let TaskPatch {
            title,
            description,
            deadline,
            tags,
            assigned_to,
        } = patch;
        let normalized_title = title
            .map(|raw| normalize_title(raw, TitledEntity::Task))
            .transpose()?;

        if let Some(new_title) = normalized_title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_deadline) = deadline {
            self.deadline = new_deadline;
        }
        if let Some(new_tags) = tags {
            self.tags = normalize_tags(new_tags);
        }
        if let Some(new_assignee) = assigned_to {
            self.assigned_to = new_assignee;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Checks invariants of a task read back from storage.
    pub(super) fn validate_persisted(&self) -> Result<(), BoardDomainError> {
        check_title(&self.title, TitledEntity::Task)?;
        Ok(())
    }
}
