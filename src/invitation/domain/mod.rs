//! Domain model for board invitations.
//!
//! An invitation moves from `pending` to exactly one of the terminal states
//! `accepted` or `rejected`, and only its addressee may move it.

mod error;
mod ids;
mod invitation;
mod status;

pub use error::{InvitationDomainError, ParseInvitationStatusError};
pub use ids::InvitationId;
pub use invitation::{Invitation, InvitationParams, PersistedInvitationData};
pub use status::InvitationStatus;
