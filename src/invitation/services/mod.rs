//! Application services for invitation orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateInvitationRequest, InvitationService, InvitationServiceError, InvitationServiceResult,
};
