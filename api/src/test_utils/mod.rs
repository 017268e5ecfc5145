//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The upstream mock answers per WFS layer name and records the URLs it was
//! asked for.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
