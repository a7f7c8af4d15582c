//! Diesel schema for invitation persistence.

diesel::table! {
    /// Invitations with their lifecycle status.
    invitations (id) {
        /// Invitation identifier.
        id -> Uuid,
        /// Referenced board; not a foreign key so invitations outlive boards.
        board_id -> Uuid,
        /// Inviting user.
        from_user_id -> Uuid,
        /// Invited user.
        to_user_id -> Uuid,
        /// Role granted on acceptance.
        #[max_length = 32]
        role -> Varchar,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}
