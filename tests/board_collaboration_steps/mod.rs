//! Step definitions for board collaboration behaviour tests.

pub mod given;
pub mod world;
