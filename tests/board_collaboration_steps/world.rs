//! Shared world state for board collaboration BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{Board, BoardId, UserId},
    services::BoardService,
};
use taskboard::error::ErrorKind;
use taskboard::invitation::{
    adapters::memory::InMemoryInvitationRepository, domain::Invitation,
    services::InvitationService,
};

/// Board service type used by the BDD world.
pub type TestBoardService = BoardService<InMemoryBoardRepository, DefaultClock>;

/// Invitation service type used by the BDD world.
pub type TestInvitationService =
    InvitationService<InMemoryBoardRepository, InMemoryInvitationRepository, DefaultClock>;

/// Scenario world for board collaboration behaviour tests.
pub struct CollaborationWorld {
    pub boards: TestBoardService,
    pub invitations: TestInvitationService,
    pub users: HashMap<String, UserId>,
    pub board_id: Option<BoardId>,
    pub owner: Option<UserId>,
    pub last_invitation: Option<Invitation>,
    pub last_error: Option<ErrorKind>,
}

impl CollaborationWorld {
    /// Creates a world with fresh in-memory services.
    #[must_use]
    pub fn new() -> Self {
        let board_repository = Arc::new(InMemoryBoardRepository::new());
        let invitation_repository =
            Arc::new(InMemoryInvitationRepository::new(&board_repository));
        let clock = Arc::new(DefaultClock);

        Self {
            boards: BoardService::new(Arc::clone(&board_repository), Arc::clone(&clock)),
            invitations: InvitationService::new(board_repository, invitation_repository, clock),
            users: HashMap::new(),
            board_id: None,
            owner: None,
            last_invitation: None,
            last_error: None,
        }
    }

    /// Returns the identifier for a named user, creating one on first use.
    pub fn user(&mut self, name: &str) -> UserId {
        *self.users.entry(name.to_owned()).or_default()
    }

    /// Returns the scenario board identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when no board has been created yet.
    pub fn board_id(&self) -> Result<BoardId, eyre::Report> {
        self.board_id
            .ok_or_else(|| eyre::eyre!("missing board in scenario world"))
    }

    /// Reads the board as its owner.
    ///
    /// # Errors
    ///
    /// Returns an error when the board cannot be read.
    pub fn board_as_owner(&self) -> Result<Board, eyre::Report> {
        let owner = self
            .owner
            .ok_or_else(|| eyre::eyre!("missing owner in scenario world"))?;
        let board_id = self.board_id()?;
        Ok(run_async(self.boards.get_board(board_id, owner))?)
    }

    /// Records a failed outcome, keeping successful values for later steps.
    pub fn record<T, E>(
        &mut self,
        result: Result<T, E>,
        kind: impl FnOnce(&E) -> ErrorKind,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                self.last_error = Some(kind(&err));
                None
            }
        }
    }
}

impl Default for CollaborationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CollaborationWorld {
    CollaborationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
