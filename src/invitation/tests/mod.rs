//! Unit tests for the invitation module.
