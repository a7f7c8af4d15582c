//! Operator CLI for a `PostgreSQL`-backed taskboard deployment.
//!
//! Usage:
//!
//! ```text
//! taskboard-admin [--config PATH] [--database-url URL] migrate
//! taskboard-admin boards --user <UUID>
//! taskboard-admin invitations --user <UUID>
//! ```
//!
//! `migrate` applies the bundled schema; every statement is idempotent so it
//! is safe to re-run. The listing commands print JSON documents on stdout.

use clap::{Parser, Subcommand};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use taskboard::board::{
    adapters::postgres::{BoardPgPool, PostgresBoardRepository},
    domain::UserId,
    services::BoardService,
};
use taskboard::config::{TaskboardCliArgs, TaskboardConfig};
use taskboard::invitation::{
    adapters::postgres::PostgresInvitationRepository, services::InvitationService,
};
use taskboard::telemetry::init_tracing;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CREATE_BOARDS_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_create_boards/up.sql");
const CREATE_INVITATIONS_SQL: &str =
    include_str!("../../migrations/2026-10-16-000001_create_invitations/up.sql");

/// Command-line interface for `taskboard-admin`.
#[derive(Debug, Parser)]
#[command(version, about = "Taskboard administration")]
struct AdminCli {
    #[command(flatten)]
    settings: TaskboardCliArgs,

    #[command(subcommand)]
    command: AdminCommand,
}

/// Administrative operations.
#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Apply the bundled database schema.
    Migrate,
    /// List the boards a user owns or is a member of.
    Boards {
        /// User whose boards to list.
        #[arg(long)]
        user: uuid::Uuid,
    },
    /// List the pending invitations addressed to a user.
    Invitations {
        /// User whose invitations to list.
        #[arg(long)]
        user: uuid::Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = AdminCli::parse();
    let config = TaskboardConfig::load(&cli.settings)?;
    init_tracing(config.log_level())?;

    let pool = build_pool(&config)?;
    match cli.command {
        AdminCommand::Migrate => migrate(pool).await,
        AdminCommand::Boards { user } => list_boards(pool, UserId::from_uuid(user)).await,
        AdminCommand::Invitations { user } => {
            list_invitations(pool, UserId::from_uuid(user)).await
        }
    }
}

fn build_pool(config: &TaskboardConfig) -> Result<BoardPgPool, BoxError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url()?);
    let pool = Pool::builder()
        .max_size(config.pool_size())
        .build(manager)?;
    Ok(pool)
}

async fn migrate(pool: BoardPgPool) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let mut connection = pool.get()?;
        connection.batch_execute(CREATE_BOARDS_SQL)?;
        connection.batch_execute(CREATE_INVITATIONS_SQL)?;
        Ok(())
    })
    .await??;
    tracing::info!("schema applied");
    Ok(())
}

async fn list_boards(pool: BoardPgPool, user: UserId) -> Result<(), BoxError> {
    let service = BoardService::new(
        Arc::new(PostgresBoardRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    let boards = service.list_boards(user).await?;
    write_json(&boards)
}

async fn list_invitations(pool: BoardPgPool, user: UserId) -> Result<(), BoxError> {
    let service = InvitationService::new(
        Arc::new(PostgresBoardRepository::new(pool.clone())),
        Arc::new(PostgresInvitationRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    let invitations = service.list_pending(user).await?;
    write_json(&invitations)
}

fn write_json(value: &impl Serialize) -> Result<(), BoxError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
