//! In-memory adapters for board persistence.

mod board;

pub use board::InMemoryBoardRepository;
pub(crate) use board::SharedBoards;
