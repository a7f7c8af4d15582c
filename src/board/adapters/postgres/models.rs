//! Diesel row models for board persistence.

use super::schema::boards;
use crate::board::domain::{Column, Membership};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query result row for board records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Board title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Owning user identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub owner_id: uuid::Uuid,
    /// Nested document payload.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub document: Value,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for board records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub struct NewBoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Board title.
    pub title: String,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Nested document payload.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// JSONB payload holding everything nested under a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDocument {
    /// Memberships in grant order.
    #[serde(default)]
    pub members: Vec<Membership>,
    /// Columns in insertion order, each with its tasks.
    #[serde(default)]
    pub columns: Vec<Column>,
}
