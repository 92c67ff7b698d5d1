//! Test utilities and helpers for Huddle
//!
//! Builders for users, conversations and messages with deterministic ids
//! and timestamps, plus assertions over model state.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
