//! Port contracts for invitation persistence.

pub mod repository;

pub use repository::{
    InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult,
};
