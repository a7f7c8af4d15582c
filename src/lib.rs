//! Taskboard: collaborative kanban boards with role-based sharing.
//!
//! Boards are partitioned into columns of tasks. Owners share a board by
//! inviting other users with a role; an accepted invitation grants a
//! membership on the board.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Authorization-gated orchestration over ports
//!
//! # Modules
//!
//! - [`board`]: Board aggregate, authorization policy, and board operations
//! - [`invitation`]: Invitation state machine and membership granting
//! - [`error`]: Caller-facing error classification
//! - [`config`]: Layered runtime configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod config;
pub mod error;
pub mod invitation;
pub mod telemetry;
