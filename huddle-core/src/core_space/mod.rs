//! Conversation permissions, activity tracking and the model facade
//!
//! ## Architecture
//!
//! - **PermissionEngine**: XOR toggles of MEMBER/ADMIN/OWNER bits, gated by
//!   the actor's own bits
//! - **ActivityTracker**: per-user follow lists with unread baselines
//! - **Model**: owns the registry and tracker; the only mutation entry point
//! - **SharedModel**: `Arc<RwLock<Model>>` handle for async callers

pub mod activity;
pub mod async_model;
pub mod model;
pub mod permission;

pub use activity::{ActivityTracker, ConversationActivity, StatusReport, UserActivity};
pub use async_model::SharedModel;
pub use model::{ErrorKind, Model, ModelError, ModelResult};
pub use permission::{PermissionEngine, PermissionError};
