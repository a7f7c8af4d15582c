//! Diesel schema for board persistence.

diesel::table! {
    /// Board documents with their nested columns, tasks, and memberships.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Board title.
        #[max_length = 255]
        title -> Varchar,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Nested members and columns payload.
        document -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
