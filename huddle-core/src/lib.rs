//! Huddle core: an in-memory messaging model
//!
//! Users, conversations and messages live in multi-key ordered indices.
//! Conversations carry a per-participant permission bitset, and each user
//! can follow conversations and other users to get unread summaries.

pub mod config;
pub mod core_space;
pub mod core_store;
pub mod logging;
pub mod metrics;
pub mod test_utils;
pub mod tracing;

pub use config::Config;
pub use core_space::{Model, ModelError, ModelResult, SharedModel, StatusReport};
pub use core_store::{EntityId, LinearIdGenerator, Permission, Timestamp};
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let model = Model::default();
        assert_eq!(model.version(), Config::default().model.version);
    }
}
