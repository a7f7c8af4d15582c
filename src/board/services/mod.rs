//! Application services for board orchestration.

mod operations;

pub use operations::{BoardService, BoardServiceError, BoardServiceResult, MoveTaskRequest};
pub(crate) use operations::{domain_error_kind, repository_error_kind};
