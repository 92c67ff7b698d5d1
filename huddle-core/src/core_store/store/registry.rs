/*
    registry.rs - Authoritative catalog of users, conversations and messages

    Composes:
    - users:          IndexedCollection<User>
    - conversations:  IndexedCollection<ConversationHeader>
    - payloads:       conversation id -> ConversationPayload
    - messages:       IndexedCollection<Message>

    Only insert and lookup live here. Every insert validates before it
    mutates, so a failed call leaves all indices as they were.
*/

use super::collection::IndexedCollection;
use super::errors::{StoreError, StoreResult};
use super::index::MultiIndexStore;
use crate::core_store::model::{
    BotUser, ConversationHeader, ConversationPayload, EntityId, EntityKind, Message, User,
};
use std::collections::HashMap;

/// Catalog of every registered entity
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    users: IndexedCollection<User>,
    conversations: IndexedCollection<ConversationHeader>,
    payloads: MultiIndexStore<EntityId, ConversationPayload>,
    messages: IndexedCollection<Message>,

    /// message id -> conversation whose chain holds it
    linked: HashMap<EntityId, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry {
            users: IndexedCollection::new(EntityKind::User),
            conversations: IndexedCollection::new(EntityKind::Conversation),
            payloads: MultiIndexStore::new(),
            messages: IndexedCollection::new(EntityKind::Message),
            linked: HashMap::new(),
        }
    }

    /// Register a user in all user indices
    ///
    /// A new user follows nobody and has created nothing, whatever the
    /// incoming value carries.
    pub fn add_user(&mut self, mut user: User) -> StoreResult<&User> {
        user.reset();
        self.users.insert(user)
    }

    /// Register a conversation started by `header.owner`
    ///
    /// Inserts the header into its indices, creates the empty payload under
    /// the same id and records the conversation on its creator. The stored
    /// header starts empty with only the owner holding OWNER.
    pub fn add_conversation(&mut self, mut header: ConversationHeader) -> StoreResult<&ConversationHeader> {
        let id = header.id.clone();
        let creator = header.owner.clone();

        self.users.require(&creator)?;
        if self.conversations.contains(&id) {
            return Err(StoreError::Duplicate {
                kind: EntityKind::Conversation,
                id,
            });
        }

        header.reset();
        self.conversations.insert(header)?;
        self.payloads.insert(id.clone(), ConversationPayload::new(id.clone()));
        self.users.get_mut(&creator)?.add_created_conversation(id.clone());

        self.conversations.require(&id)
    }

    /// Register a message in all message indices without linking it
    pub fn add_message(&mut self, message: Message) -> StoreResult<&Message> {
        self.messages.insert(message)
    }

    /// Link a registered message at the tail of a conversation chain
    ///
    /// The header's size grows in the same call so it always equals the
    /// chain length. Returns the new size.
    pub fn append_message(&mut self, conversation: &EntityId, message: &EntityId) -> StoreResult<usize> {
        self.conversations.require(conversation)?;
        self.messages.require(message)?;
        if let Some(owner) = self.linked.get(message) {
            return Err(StoreError::AlreadyLinked {
                message: message.clone(),
                conversation: owner.clone(),
            });
        }

        let payload = self
            .payloads
            .first_mut(conversation)
            .ok_or_else(|| StoreError::not_found(EntityKind::Payload, conversation))?;
        payload.append(message.clone());
        let chain_len = payload.len();

        let header = self.conversations.get_mut(conversation)?;
        header.size += 1;
        debug_assert_eq!(header.size, chain_len);

        self.linked.insert(message.clone(), conversation.clone());
        Ok(chain_len)
    }

    /// Attach a bot to a conversation payload
    pub fn add_bot(&mut self, conversation: &EntityId, bot: BotUser) -> StoreResult<&BotUser> {
        let payload = self
            .payloads
            .first_mut(conversation)
            .ok_or_else(|| StoreError::not_found(EntityKind::Payload, conversation))?;
        Ok(payload.add_bot(bot))
    }

    pub fn users(&self) -> &IndexedCollection<User> {
        &self.users
    }

    pub fn conversations(&self) -> &IndexedCollection<ConversationHeader> {
        &self.conversations
    }

    pub fn messages(&self) -> &IndexedCollection<Message> {
        &self.messages
    }

    pub fn user(&self, id: &EntityId) -> StoreResult<&User> {
        self.users.require(id)
    }

    pub fn conversation(&self, id: &EntityId) -> StoreResult<&ConversationHeader> {
        self.conversations.require(id)
    }

    pub fn message(&self, id: &EntityId) -> StoreResult<&Message> {
        self.messages.require(id)
    }

    pub fn payload(&self, id: &EntityId) -> StoreResult<&ConversationPayload> {
        self.payloads
            .first(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Payload, id))
    }

    /// Conversation holding `message`, if it has been linked
    pub fn conversation_of(&self, message: &EntityId) -> Option<&EntityId> {
        self.linked.get(message)
    }

    /// Messages of a conversation from head to tail
    pub fn conversation_messages(&self, id: &EntityId) -> StoreResult<Vec<&Message>> {
        self.payload(id)?
            .message_ids()
            .iter()
            .map(|message| self.message(message))
            .collect()
    }

    pub(crate) fn user_mut(&mut self, id: &EntityId) -> StoreResult<&mut User> {
        self.users.get_mut(id)
    }

    pub(crate) fn conversation_mut(&mut self, id: &EntityId) -> StoreResult<&mut ConversationHeader> {
        self.conversations.get_mut(id)
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
