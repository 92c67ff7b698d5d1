/*
    core_store - Authoritative in-memory state layer

    Handles:
    - Data models (users, conversations, messages, permissions)
    - Multi-key ordered indices
    - The entity registry tying the indices together
*/

pub mod model;
pub mod store;

// Re-export commonly used types
pub use model::{
    BotUser, ConversationHeader, ConversationPayload, EntityId, EntityKind, LinearIdGenerator,
    Message, Permission, Timestamp, User,
};
pub use store::{EntityRegistry, StoreError, StoreResult};
