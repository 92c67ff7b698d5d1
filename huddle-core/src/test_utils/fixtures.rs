//! Test fixtures for creating common test objects
//!
//! Provides builder patterns and factory functions for creating test data.

use crate::core_store::model::{
    ConversationHeader, EntityId, LinearIdGenerator, Message, Timestamp, User,
};

/// Sequential ids and timestamps for one test
///
/// Every id handed out is also used as the creation timestamp in
/// milliseconds, so creation order matches id order.
pub struct TestIds {
    generator: LinearIdGenerator,
}

impl TestIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: u32) -> Self {
        Self {
            generator: LinearIdGenerator::new(None, start),
        }
    }

    /// Ids nested under `root`, e.g. messages of one conversation
    pub fn under(root: EntityId) -> Self {
        Self {
            generator: LinearIdGenerator::new(Some(root), 1),
        }
    }

    pub fn next(&mut self) -> EntityId {
        self.generator.make().expect("test id space exhausted")
    }
}

impl Default for TestIds {
    fn default() -> Self {
        Self::new()
    }
}

fn stamp(id: &EntityId) -> Timestamp {
    Timestamp::from_millis(id.id() as u64)
}

/// Builder for creating test users
pub struct TestUserBuilder {
    id: EntityId,
    name: String,
    creation: Option<Timestamp>,
}

impl TestUserBuilder {
    pub fn new(id: EntityId) -> Self {
        Self {
            name: format!("user{}", id.id()),
            id,
            creation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn created_at(mut self, millis: u64) -> Self {
        self.creation = Some(Timestamp::from_millis(millis));
        self
    }

    pub fn build(self) -> User {
        let creation = self.creation.unwrap_or_else(|| stamp(&self.id));
        User::new(self.id, self.name, creation)
    }
}

/// Builder for creating test conversations
pub struct TestConversationBuilder {
    id: EntityId,
    owner: EntityId,
    title: String,
    creation: Option<Timestamp>,
}

impl TestConversationBuilder {
    pub fn new(id: EntityId, owner: EntityId) -> Self {
        Self {
            title: format!("conversation {}", id.id()),
            id,
            owner,
            creation: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn created_at(mut self, millis: u64) -> Self {
        self.creation = Some(Timestamp::from_millis(millis));
        self
    }

    pub fn build(self) -> ConversationHeader {
        let creation = self.creation.unwrap_or_else(|| stamp(&self.id));
        ConversationHeader::new(self.id, self.owner, creation, self.title)
    }
}

/// Builder for creating test messages
pub struct TestMessageBuilder {
    id: EntityId,
    author: EntityId,
    content: String,
    creation: Option<Timestamp>,
}

impl TestMessageBuilder {
    pub fn new(id: EntityId, author: EntityId) -> Self {
        Self {
            content: format!("message {}", id),
            id,
            author,
            creation: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn created_at(mut self, millis: u64) -> Self {
        self.creation = Some(Timestamp::from_millis(millis));
        self
    }

    pub fn build(self) -> Message {
        let creation = self.creation.unwrap_or_else(|| stamp(&self.id));
        Message::new(self.id, self.author, self.content, creation)
    }
}

/// Quick fixture functions for common test objects

pub fn test_user(ids: &mut TestIds, name: &str) -> User {
    TestUserBuilder::new(ids.next()).with_name(name).build()
}

pub fn test_conversation(ids: &mut TestIds, owner: &EntityId, title: &str) -> ConversationHeader {
    TestConversationBuilder::new(ids.next(), owner.clone())
        .with_title(title)
        .build()
}

pub fn test_message(ids: &mut TestIds, author: &EntityId) -> Message {
    TestMessageBuilder::new(ids.next(), author.clone()).build()
}
