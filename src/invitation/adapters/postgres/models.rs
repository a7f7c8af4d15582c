//! Diesel row models for invitation persistence.

use super::schema::invitations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for invitation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvitationRow {
    /// Invitation identifier.
    pub id: uuid::Uuid,
    /// Referenced board.
    pub board_id: uuid::Uuid,
    /// Inviting user.
    pub from_user_id: uuid::Uuid,
    /// Invited user.
    pub to_user_id: uuid::Uuid,
    /// Role granted on acceptance.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for invitation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub struct NewInvitationRow {
    /// Invitation identifier.
    pub id: uuid::Uuid,
    /// Referenced board.
    pub board_id: uuid::Uuid,
    /// Inviting user.
    pub from_user_id: uuid::Uuid,
    /// Invited user.
    pub to_user_id: uuid::Uuid,
    /// Role granted on acceptance.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}
