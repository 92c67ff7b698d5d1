/*
    Model subsystem - Data structures for entities
*/

pub mod conversation;
pub mod message;
pub mod permission;
pub mod types;
pub mod user;

pub use conversation::*;
pub use message::*;
pub use permission::*;
pub use types::*;
pub use user::*;
