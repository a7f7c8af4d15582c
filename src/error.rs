//! Caller-facing error taxonomy shared by all services.
//!
//! Each service keeps its own error enum; [`ErrorKind`] is the coarse
//! classification a boundary layer maps onto status codes.

use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A board, column, task, membership, or invitation does not exist.
    NotFound,
    /// The caller lacks the required access, or is not the invitation's
    /// addressee.
    Forbidden,
    /// A required field is missing or invalid.
    Validation,
    /// A pending invitation already exists for the board and invitee.
    DuplicateInvitation,
    /// The invitation is no longer pending.
    InvalidStateTransition,
    /// The storage collaborator failed; not a domain outcome.
    Storage,
}

impl ErrorKind {
    /// Returns a stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation_error",
            Self::DuplicateInvitation => "duplicate_invitation",
            Self::InvalidStateTransition => "invalid_state_transition",
            Self::Storage => "storage_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
