/*
    conversation.rs - Conversation header and payload

    The header carries the indexed metadata (title, owner, permissions) and
    the running message count. The payload shares the header's id and holds
    the ordered message chain plus attached bots.

    The chain is an append-only list of message ids rather than forward
    links between messages; position i + 1 is the successor of position i.
*/

use super::permission::Permission;
use super::types::{EntityId, Timestamp};
use super::user::BotUser;
use crate::core_store::store::Indexed;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Indexed conversation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHeader {
    pub id: EntityId,
    pub owner: EntityId,
    pub creation: Timestamp,
    pub title: String,

    /// Participant permissions; a missing entry means no permissions
    #[serde(with = "participant_list")]
    pub(crate) permissions: HashMap<EntityId, Permission>,

    /// Number of messages appended to the payload chain
    pub(crate) size: usize,
}

impl ConversationHeader {
    /// New conversation; the creator holds OWNER
    pub fn new(
        id: EntityId,
        owner: EntityId,
        creation: Timestamp,
        title: impl Into<String>,
    ) -> Self {
        let mut permissions = HashMap::new();
        permissions.insert(owner.clone(), Permission::OWNER);

        ConversationHeader {
            id,
            owner,
            creation,
            title: title.into(),
            permissions,
            size: 0,
        }
    }

    /// Permission held by `user`, `NONE` for non-participants
    pub fn permission(&self, user: &EntityId) -> Permission {
        self.permissions.get(user).copied().unwrap_or(Permission::NONE)
    }

    /// Flip the bits of `toggle` in the user's stored value
    pub(crate) fn toggle_permission(&mut self, user: &EntityId, toggle: Permission) -> Permission {
        let entry = self.permissions.entry(user.clone()).or_default();
        *entry = *entry ^ toggle;
        *entry
    }

    pub fn participants(&self) -> impl Iterator<Item = (&EntityId, Permission)> {
        self.permissions.iter().map(|(id, perm)| (id, *perm))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Drop any carried-over state: only the owner holds a permission and
    /// no messages are counted
    pub(crate) fn reset(&mut self) {
        self.permissions.clear();
        self.permissions.insert(self.owner.clone(), Permission::OWNER);
        self.size = 0;
    }
}

/// Permissions as a list of `(participant, bits)` pairs in id order, since
/// struct keys cannot be map keys in most formats
mod participant_list {
    use super::{EntityId, Permission};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        permissions: &HashMap<EntityId, Permission>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut pairs: Vec<_> = permissions.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<EntityId, Permission>, D::Error> {
        let pairs = Vec::<(EntityId, Permission)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl Indexed for ConversationHeader {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn creation(&self) -> Timestamp {
        self.creation
    }

    fn text(&self) -> &str {
        &self.title
    }
}

/// Message chain and bots of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationPayload {
    pub id: EntityId,
    messages: Vec<EntityId>,
    bots: BTreeMap<EntityId, BotUser>,
}

impl ConversationPayload {
    pub fn new(id: EntityId) -> Self {
        ConversationPayload {
            id,
            messages: Vec::new(),
            bots: BTreeMap::new(),
        }
    }

    /// Head of the chain
    pub fn first_message(&self) -> Option<&EntityId> {
        self.messages.first()
    }

    /// Tail of the chain
    pub fn last_message(&self) -> Option<&EntityId> {
        self.messages.last()
    }

    /// Successor of `message` in the chain
    pub fn next_after(&self, message: &EntityId) -> Option<&EntityId> {
        let pos = self.messages.iter().position(|id| id == message)?;
        self.messages.get(pos + 1)
    }

    /// Message ids from head to tail
    pub fn message_ids(&self) -> &[EntityId] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn append(&mut self, message: EntityId) {
        self.messages.push(message);
    }

    /// Attach a bot; a bot already attached under the same id is kept
    pub(crate) fn add_bot(&mut self, bot: BotUser) -> &BotUser {
        self.bots.entry(bot.id.clone()).or_insert(bot)
    }

    pub fn bots(&self) -> impl Iterator<Item = &BotUser> {
        self.bots.values()
    }

    pub fn has_bot(&self, bot: &EntityId) -> bool {
        self.bots.contains_key(bot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ConversationHeader {
        ConversationHeader::new(
            EntityId::new(10),
            EntityId::new(1),
            Timestamp::from_millis(5),
            "general",
        )
    }

    #[test]
    fn test_creator_is_owner() {
        let convo = header();
        assert_eq!(convo.permission(&EntityId::new(1)), Permission::OWNER);
        assert_eq!(convo.size(), 0);
    }

    #[test]
    fn test_header_json_round_trip() {
        let mut convo = header();
        convo.toggle_permission(&EntityId::new(2), Permission::MEMBER);

        let json = serde_json::to_string(&convo).unwrap();
        let back: ConversationHeader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, convo);
        assert_eq!(back.permission(&EntityId::new(2)), Permission::MEMBER);
    }

    #[test]
    fn test_reset_keeps_only_owner() {
        let mut convo = header();
        convo.toggle_permission(&EntityId::new(2), Permission::ADMIN);
        convo.size = 3;

        convo.reset();
        assert_eq!(convo.size(), 0);
        assert_eq!(convo.participants().count(), 1);
        assert_eq!(convo.permission(&EntityId::new(1)), Permission::OWNER);
    }

    #[test]
    fn test_non_participant_has_no_permission() {
        let convo = header();
        assert_eq!(convo.permission(&EntityId::new(99)), Permission::NONE);
    }

    #[test]
    fn test_toggle_starts_from_zero() {
        let mut convo = header();
        let bob = EntityId::new(2);
        let result = convo.toggle_permission(&bob, Permission::MEMBER | Permission::ADMIN);
        assert_eq!(result.bits(), 0b011);
        assert_eq!(convo.toggle_permission(&bob, Permission::ADMIN), Permission::MEMBER);
    }

    #[test]
    fn test_payload_chain_order() {
        let mut payload = ConversationPayload::new(EntityId::new(10));
        assert!(payload.first_message().is_none());

        payload.append(EntityId::new(100));
        payload.append(EntityId::new(101));

        assert_eq!(payload.first_message(), Some(&EntityId::new(100)));
        assert_eq!(payload.last_message(), Some(&EntityId::new(101)));
        assert_eq!(payload.next_after(&EntityId::new(100)), Some(&EntityId::new(101)));
        assert_eq!(payload.next_after(&EntityId::new(101)), None);
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_bots_have_set_semantics() {
        let mut payload = ConversationPayload::new(EntityId::new(10));
        let bot = BotUser::new(EntityId::new(50), "helper", Timestamp::from_millis(1));
        payload.add_bot(bot.clone());
        payload.add_bot(bot);
        assert_eq!(payload.bots().count(), 1);
        assert!(payload.has_bot(&EntityId::new(50)));
    }
}
