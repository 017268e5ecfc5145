//! Domain layer
//!
//! Contains pure feed logic with no I/O.
//! - `entities`: feed items, extents and feed definitions
//! - `ports`: Trait definitions for upstream services

pub mod entities;
pub mod ports;
