/*
    user.rs - Registered users and automated participants

    A user is created on registration and never deleted. Afterwards only
    its follow edges and the set of conversations it created change.
*/

use super::types::{EntityId, Timestamp};
use crate::core_store::store::Indexed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub creation: Timestamp,

    /// Users this user follows (directed)
    pub(crate) follows: BTreeSet<EntityId>,

    /// Conversations this user started
    pub(crate) created_conversations: BTreeSet<EntityId>,
}

impl User {
    pub fn new(id: EntityId, name: impl Into<String>, creation: Timestamp) -> Self {
        User {
            id,
            name: name.into(),
            creation,
            follows: BTreeSet::new(),
            created_conversations: BTreeSet::new(),
        }
    }

    pub fn follows(&self) -> &BTreeSet<EntityId> {
        &self.follows
    }

    pub fn created_conversations(&self) -> &BTreeSet<EntityId> {
        &self.created_conversations
    }

    /// Add a follow edge; returns false if it already existed
    pub(crate) fn follow(&mut self, other: &EntityId) -> bool {
        self.follows.insert(other.clone())
    }

    /// Remove a follow edge; returns false if there was none
    pub(crate) fn unfollow(&mut self, other: &EntityId) -> bool {
        self.follows.remove(other)
    }

    pub fn is_following(&self, other: &EntityId) -> bool {
        self.follows.contains(other)
    }

    pub(crate) fn add_created_conversation(&mut self, conversation: EntityId) {
        self.created_conversations.insert(conversation);
    }

    /// Forget follow edges and created conversations
    pub(crate) fn reset(&mut self) {
        self.follows.clear();
        self.created_conversations.clear();
    }
}

impl Indexed for User {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn creation(&self) -> Timestamp {
        self.creation
    }

    fn text(&self) -> &str {
        &self.name
    }
}

/// Automated participant attached to a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub id: EntityId,
    pub name: String,
    pub creation: Timestamp,
}

impl BotUser {
    pub fn new(id: EntityId, name: impl Into<String>, creation: Timestamp) -> Self {
        BotUser {
            id,
            name: name.into(),
            creation,
        }
    }
}
