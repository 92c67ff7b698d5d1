/*
    message.rs - Message model

    A message is immutable once created. Its position in a conversation is
    recorded by the conversation payload, not by the message itself.
*/

use super::types::{EntityId, Timestamp};
use crate::core_store::store::Indexed;
use serde::{Deserialize, Serialize};

/// Message posted by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: EntityId,
    pub author: EntityId,
    pub content: String,
    pub creation: Timestamp,
}

impl Message {
    pub fn new(
        id: EntityId,
        author: EntityId,
        content: impl Into<String>,
        creation: Timestamp,
    ) -> Self {
        Message {
            id,
            author,
            content: content.into(),
            creation,
        }
    }
}

impl Indexed for Message {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn creation(&self) -> Timestamp {
        self.creation
    }

    fn text(&self) -> &str {
        &self.content
    }
}
