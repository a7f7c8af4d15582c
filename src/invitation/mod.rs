//! Invitation-mediated board membership.
//!
//! Owners and admin members invite users to a board; the invitee alone
//! decides whether to accept, which grants the membership, or to reject.
//! The module follows hexagonal architecture:
//!
//! - Domain types and the state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
