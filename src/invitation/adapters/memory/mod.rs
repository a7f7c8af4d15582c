//! In-memory adapters for invitation persistence.

mod invitation;

pub use invitation::InMemoryInvitationRepository;
