//! `PostgreSQL` repository implementation for invitations.

use super::{
    models::{InvitationRow, NewInvitationRow},
    schema::invitations,
};
use crate::board::{
    adapters::postgres::replace_board_document,
    domain::{Board, BoardId, Role, UserId},
    ports::BoardRepositoryError,
};
use crate::invitation::{
    domain::{Invitation, InvitationId, InvitationStatus, PersistedInvitationData},
    ports::{InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by invitation adapters.
pub type InvitationPgPool = Pool<ConnectionManager<PgConnection>>;

const PENDING_PAIR_INDEX: &str = "idx_invitations_pending_pair";

/// `PostgreSQL`-backed invitation repository.
///
/// Acceptances write the invitation and the board document in a single
/// transaction, so the pool must reach the same database as the board
/// repository.
#[derive(Debug, Clone)]
pub struct PostgresInvitationRepository {
    pool: InvitationPgPool,
}

impl PostgresInvitationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: InvitationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> InvitationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> InvitationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(InvitationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(InvitationRepositoryError::persistence)?
    }
}

impl From<DieselError> for InvitationRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let invitation_id = invitation.id();
        let board_id = invitation.board_id();
        let invitee = invitation.to_user_id();
        let new_row = to_new_row(invitation);

        self.run_blocking(move |connection| {
            diesel::insert_into(invitations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(PENDING_PAIR_INDEX) =>
                    {
                        InvitationRepositoryError::PendingInvitationExists { board_id, invitee }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        InvitationRepositoryError::DuplicateInvitation(invitation_id)
                    }
                    _ => InvitationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn commit_rejection(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let decided = invitation.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, InvitationRepositoryError, _>(|tx| {
                write_decision(tx, &decided)
            })
        })
        .await
    }

    async fn commit_acceptance(
        &self,
        invitation: &Invitation,
        board: &Board,
    ) -> InvitationRepositoryResult<()> {
        let accepted = invitation.clone();
        let granted_board = board.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, InvitationRepositoryError, _>(|tx| {
                write_decision(tx, &accepted)?;
                replace_board_document(tx, &granted_board).map_err(board_write_error)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: InvitationId) -> InvitationRepositoryResult<Option<Invitation>> {
        self.run_blocking(move |connection| {
            let row = invitations::table
                .filter(invitations::id.eq(id.into_inner()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()?;
            row.map(row_to_invitation).transpose()
        })
        .await
    }

    async fn find_pending(
        &self,
        board_id: BoardId,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Option<Invitation>> {
        self.run_blocking(move |connection| {
            let row = invitations::table
                .filter(invitations::board_id.eq(board_id.into_inner()))
                .filter(invitations::to_user_id.eq(invitee.into_inner()))
                .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()?;
            row.map(row_to_invitation).transpose()
        })
        .await
    }

    async fn list_pending_for_invitee(
        &self,
        invitee: UserId,
    ) -> InvitationRepositoryResult<Vec<Invitation>> {
        self.run_blocking(move |connection| {
            let rows = invitations::table
                .filter(invitations::to_user_id.eq(invitee.into_inner()))
                .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
                .order((invitations::created_at.asc(), invitations::id.asc()))
                .select(InvitationRow::as_select())
                .load::<InvitationRow>(connection)?;
            rows.into_iter().map(row_to_invitation).collect()
        })
        .await
    }
}

/// Writes a decided status only while the stored row is still pending.
fn write_decision(
    connection: &mut PgConnection,
    invitation: &Invitation,
) -> InvitationRepositoryResult<()> {
    let id = invitation.id();
    let updated = diesel::update(
        invitations::table
            .filter(invitations::id.eq(id.into_inner()))
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str())),
    )
    .set((
        invitations::status.eq(invitation.status().as_str()),
        invitations::updated_at.eq(invitation.updated_at()),
    ))
    .execute(connection)?;

    if updated > 0 {
        return Ok(());
    }

    let exists = diesel::select(diesel::dsl::exists(
        invitations::table.filter(invitations::id.eq(id.into_inner())),
    ))
    .get_result::<bool>(connection)?;
    if exists {
        Err(InvitationRepositoryError::NoLongerPending(id))
    } else {
        Err(InvitationRepositoryError::NotFound(id))
    }
}

fn board_write_error(err: BoardRepositoryError) -> InvitationRepositoryError {
    match err {
        BoardRepositoryError::NotFound(board_id) => {
            InvitationRepositoryError::BoardNotFound(board_id)
        }
        BoardRepositoryError::InvalidPersistedData(source) => {
            InvitationRepositoryError::InvalidPersistedData(source)
        }
        other => InvitationRepositoryError::persistence(other),
    }
}

fn to_new_row(invitation: &Invitation) -> NewInvitationRow {
    NewInvitationRow {
        id: invitation.id().into_inner(),
        board_id: invitation.board_id().into_inner(),
        from_user_id: invitation.from_user_id().into_inner(),
        to_user_id: invitation.to_user_id().into_inner(),
        role: invitation.role().as_str().to_owned(),
        status: invitation.status().as_str().to_owned(),
        created_at: invitation.created_at(),
        updated_at: invitation.updated_at(),
    }
}

fn row_to_invitation(row: InvitationRow) -> InvitationRepositoryResult<Invitation> {
    let InvitationRow {
        id,
        board_id,
        from_user_id,
        to_user_id,
        role: persisted_role,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let role = Role::try_from(persisted_role.as_str())
        .map_err(InvitationRepositoryError::invalid_persisted_data)?;
    let status = InvitationStatus::try_from(persisted_status.as_str())
        .map_err(InvitationRepositoryError::invalid_persisted_data)?;

    Ok(Invitation::from_persisted(PersistedInvitationData {
        id: InvitationId::from_uuid(id),
        board_id: BoardId::from_uuid(board_id),
        from_user_id: UserId::from_uuid(from_user_id),
        to_user_id: UserId::from_uuid(to_user_id),
        role,
        status,
        created_at,
        updated_at,
    }))
}
