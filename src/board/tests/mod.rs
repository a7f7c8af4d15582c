//! Unit tests for the board module.
//!
//! Tests are organised by concern: the authorization policy, aggregate
//! invariants, and service orchestration over the in-memory adapter.
