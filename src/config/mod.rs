//! Configuration module for Vellum
//!
//! This module handles user-tunable editor settings, including
//! serialization/deserialization to/from JSON and persistent storage
//! to platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
