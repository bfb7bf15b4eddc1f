//! Test utilities
//!
//! Fixtures and hand-written port implementations for unit and handler tests.
//! The in-memory adapters cover the happy paths; the mocks here exist for
//! failure injection.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
