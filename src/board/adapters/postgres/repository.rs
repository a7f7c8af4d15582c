//! `PostgreSQL` repository implementation for board documents.

use super::{
    models::{BoardDocument, BoardRow, NewBoardRow},
    schema::boards,
};
use crate::board::{
    domain::{Board, BoardId, PersistedBoardData, UserId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let new_row = to_new_row(board)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(boards::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::DuplicateBoard(board_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let updated_board = board.clone();
        self.run_blocking(move |connection| replace_board_document(connection, &updated_board))
            .await
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(boards::table.filter(boards::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(BoardRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(BoardRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::id.eq(id.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(BoardRepositoryError::persistence)?;
            row.map(row_to_board).transpose()
        })
        .await
    }

    async fn list_for_participant(&self, user_id: UserId) -> BoardRepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let query = diesel::sql_query(concat!(
                "SELECT id, title, owner_id, document, created_at, updated_at FROM boards ",
                "WHERE owner_id = $1 ",
                "OR document->'members' @> jsonb_build_array(",
                "jsonb_build_object('user_id', $2::text)) ",
                "ORDER BY created_at, id",
            ))
            .bind::<diesel::sql_types::Uuid, _>(user_id.into_inner())
            .bind::<diesel::sql_types::Text, _>(user_id.to_string());

            let rows = query
                .load::<BoardRow>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            rows.into_iter().map(row_to_board).collect()
        })
        .await
    }
}

/// Overwrites the stored title and document of an existing board.
///
/// Shared with adapters that write a board inside their own transaction.
pub(crate) fn replace_board_document(
    connection: &mut PgConnection,
    board: &Board,
) -> BoardRepositoryResult<()> {
    let board_id = board.id();
    let document = to_document(board)?;
    let updated = diesel::update(boards::table.filter(boards::id.eq(board_id.into_inner())))
        .set((
            boards::title.eq(board.title()),
            boards::document.eq(&document),
            boards::updated_at.eq(board.updated_at()),
        ))
        .execute(connection)
        .map_err(BoardRepositoryError::persistence)?;

    if updated == 0 {
        return Err(BoardRepositoryError::NotFound(board_id));
    }
    Ok(())
}

fn to_document(board: &Board) -> BoardRepositoryResult<serde_json::Value> {
    let document = BoardDocument {
        members: board.members().to_vec(),
        columns: board.columns().to_vec(),
    };
    serde_json::to_value(document).map_err(BoardRepositoryError::persistence)
}

fn to_new_row(board: &Board) -> BoardRepositoryResult<NewBoardRow> {
    Ok(NewBoardRow {
        id: board.id().into_inner(),
        title: board.title().to_owned(),
        owner_id: board.owner_id().into_inner(),
        document: to_document(board)?,
        created_at: board.created_at(),
        updated_at: board.updated_at(),
    })
}

fn row_to_board(row: BoardRow) -> BoardRepositoryResult<Board> {
    let BoardRow {
        id,
        title,
        owner_id,
        document,
        created_at,
        updated_at,
    } = row;

    let BoardDocument { members, columns } =
        serde_json::from_value(document).map_err(BoardRepositoryError::invalid_persisted_data)?;

    let data = PersistedBoardData {
        id: BoardId::from_uuid(id),
        title,
        owner_id: UserId::from_uuid(owner_id),
        members,
        columns,
        created_at,
        updated_at,
    };
    Board::from_persisted(data).map_err(BoardRepositoryError::invalid_persisted_data)
}
