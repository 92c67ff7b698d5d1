//! Per-user activity tracking
//!
//! Each registered user has two baseline maps: followed conversations with
//! the message count seen at follow time (or at the last status read), and
//! followed users with the number of conversations they had created. A
//! status update reports the deltas and then moves every baseline up to the
//! current value, so reading status consumes it.

use crate::core_store::model::{EntityId, EntityKind};
use crate::core_store::store::{EntityRegistry, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Default)]
struct Watchlist {
    conversations: BTreeMap<EntityId, usize>,
    users: BTreeMap<EntityId, usize>,
}

/// Follow graph and unread baselines for every registered user
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    users: HashMap<EntityId, Watchlist>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a user with nothing followed
    pub fn register(&mut self, user: EntityId) {
        self.users.entry(user).or_default();
    }

    pub fn is_registered(&self, user: &EntityId) -> bool {
        self.users.contains_key(user)
    }

    fn watchlist_mut(&mut self, user: &EntityId) -> StoreResult<&mut Watchlist> {
        self.users
            .get_mut(user)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, user))
    }

    fn watchlist(&self, user: &EntityId) -> StoreResult<&Watchlist> {
        self.users
            .get(user)
            .ok_or_else(|| StoreError::not_found(EntityKind::User, user))
    }

    /// Watch a conversation from its current size; re-following resets it
    pub fn follow_conversation(
        &mut self,
        user: &EntityId,
        conversation: &EntityId,
        size: usize,
    ) -> StoreResult<()> {
        self.watchlist_mut(user)?
            .conversations
            .insert(conversation.clone(), size);
        Ok(())
    }

    /// Stop watching a conversation; returns false if it was not watched
    pub fn unfollow_conversation(&mut self, user: &EntityId, conversation: &EntityId) -> StoreResult<bool> {
        Ok(self
            .watchlist_mut(user)?
            .conversations
            .remove(conversation)
            .is_some())
    }

    /// Add the directed edge `follower -> followee`
    ///
    /// `created` is the followee's current created-conversation count.
    /// Returns false if the edge already existed; its baseline is kept.
    pub fn follow_user(&mut self, follower: &EntityId, followee: &EntityId, created: usize) -> StoreResult<bool> {
        let users = &mut self.watchlist_mut(follower)?.users;
        if users.contains_key(followee) {
            return Ok(false);
        }
        users.insert(followee.clone(), created);
        Ok(true)
    }

    /// Remove the directed edge `follower -> followee`
    pub fn unfollow_user(&mut self, follower: &EntityId, followee: &EntityId) -> StoreResult<bool> {
        Ok(self.watchlist_mut(follower)?.users.remove(followee).is_some())
    }

    /// Watched conversations with their baselines, in id order
    pub fn tracked_conversations(&self, user: &EntityId) -> StoreResult<Vec<(EntityId, usize)>> {
        Ok(self
            .watchlist(user)?
            .conversations
            .iter()
            .map(|(id, baseline)| (id.clone(), *baseline))
            .collect())
    }

    /// Followed users, in id order
    pub fn followed_users(&self, user: &EntityId) -> StoreResult<Vec<EntityId>> {
        Ok(self.watchlist(user)?.users.keys().cloned().collect())
    }

    /// Report unread activity for `user` and reset every baseline
    ///
    /// A watched conversation that no longer resolves in the registry is
    /// dropped from tracking rather than failing the whole report.
    pub fn status_update(&mut self, user: &EntityId, registry: &EntityRegistry) -> StoreResult<StatusReport> {
        let watchlist = self.watchlist_mut(user)?;
        let mut report = StatusReport::default();

        watchlist.conversations.retain(|id, baseline| match registry.conversation(id) {
            Ok(header) => {
                report.conversations.push(ConversationActivity {
                    conversation: id.clone(),
                    title: header.title.clone(),
                    new_messages: header.size().saturating_sub(*baseline),
                });
                *baseline = header.size();
                true
            }
            Err(_) => {
                warn!(user = %user, conversation = %id, "Dropping stale conversation tracking");
                false
            }
        });

        watchlist.users.retain(|id, baseline| match registry.user(id) {
            Ok(followee) => {
                let created = followee.created_conversations.len();
                report.users.push(UserActivity {
                    user: id.clone(),
                    name: followee.name.clone(),
                    new_conversations: created.saturating_sub(*baseline),
                });
                *baseline = created;
                true
            }
            Err(_) => {
                warn!(user = %user, followee = %id, "Dropping stale user tracking");
                false
            }
        });

        Ok(report)
    }
}

/// Unread messages in one watched conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationActivity {
    pub conversation: EntityId,
    pub title: String,
    pub new_messages: usize,
}

/// New conversations started by one followed user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user: EntityId,
    pub name: String,
    pub new_conversations: usize,
}

/// Result of a status update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub conversations: Vec<ConversationActivity>,
    pub users: Vec<UserActivity>,
}

impl StatusReport {
    pub fn conversation(&self, id: &EntityId) -> Option<&ConversationActivity> {
        self.conversations.iter().find(|c| &c.conversation == id)
    }

    pub fn user(&self, id: &EntityId) -> Option<&UserActivity> {
        self.users.iter().find(|u| &u.user == id)
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty() && self.users.is_empty()
    }

    /// Drop conversations without unread messages
    pub fn without_idle_conversations(mut self) -> Self {
        self.conversations.retain(|c| c.new_messages > 0);
        self
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.conversations {
            writeln!(f, "CONVERSATION {}: You have {} new messages!", c.title, c.new_messages)?;
        }
        for u in &self.users {
            writeln!(f, "USER {}: {} new conversations created!", u.name, u.new_conversations)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::{ConversationHeader, Message, Timestamp, User};

    struct Fixture {
        registry: EntityRegistry,
        tracker: ActivityTracker,
        next_message: u32,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = EntityRegistry::new();
            let mut tracker = ActivityTracker::new();
            for (id, name) in [(1, "alice"), (2, "bob")] {
                registry
                    .add_user(User::new(EntityId::new(id), name, Timestamp::from_millis(id as u64)))
                    .unwrap();
                tracker.register(EntityId::new(id));
            }
            registry
                .add_conversation(ConversationHeader::new(
                    EntityId::new(10),
                    EntityId::new(2),
                    Timestamp::from_millis(10),
                    "general",
                ))
                .unwrap();

            Fixture {
                registry,
                tracker,
                next_message: 100,
            }
        }

        fn post(&mut self, count: usize) {
            for _ in 0..count {
                let id = EntityId::new(self.next_message);
                self.next_message += 1;
                self.registry
                    .add_message(Message::new(id.clone(), EntityId::new(2), "hi", Timestamp::from_millis(50)))
                    .unwrap();
                self.registry.append_message(&EntityId::new(10), &id).unwrap();
            }
        }

        fn size(&self) -> usize {
            self.registry.conversation(&EntityId::new(10)).unwrap().size()
        }
    }

    #[test]
    fn test_unread_count_then_reset() {
        let mut fx = Fixture::new();
        let alice = EntityId::new(1);
        let convo = EntityId::new(10);

        fx.post(5);
        let size = fx.size();
        assert_eq!(size, 5);
        fx.tracker.follow_conversation(&alice, &convo, size).unwrap();
        fx.post(3);

        let report = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert_eq!(report.conversation(&convo).unwrap().new_messages, 3);
        assert!(report.to_string().contains("CONVERSATION general: You have 3 new messages!"));

        let again = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert_eq!(again.conversation(&convo).unwrap().new_messages, 0);
    }

    #[test]
    fn test_unfollow_drops_conversation() {
        let mut fx = Fixture::new();
        let alice = EntityId::new(1);
        let convo = EntityId::new(10);

        fx.tracker.follow_conversation(&alice, &convo, 0).unwrap();
        assert!(fx.tracker.unfollow_conversation(&alice, &convo).unwrap());
        assert!(!fx.tracker.unfollow_conversation(&alice, &convo).unwrap());

        let report = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert!(report.conversation(&convo).is_none());
        assert!(!report.to_string().contains("general"));
    }

    #[test]
    fn test_followed_user_reports_new_conversations() {
        let mut fx = Fixture::new();
        let alice = EntityId::new(1);
        let bob = EntityId::new(2);

        let created = fx.registry.user(&bob).unwrap().created_conversations.len();
        assert!(fx.tracker.follow_user(&alice, &bob, created).unwrap());
        assert!(!fx.tracker.follow_user(&alice, &bob, created).unwrap());

        fx.registry
            .add_conversation(ConversationHeader::new(
                EntityId::new(11),
                bob.clone(),
                Timestamp::from_millis(11),
                "random",
            ))
            .unwrap();

        let report = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert_eq!(report.user(&bob).unwrap().new_conversations, 1);
        assert!(report.to_string().contains("USER bob: 1 new conversations created!"));

        let again = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert_eq!(again.user(&bob).unwrap().new_conversations, 0);

        assert!(fx.tracker.unfollow_user(&alice, &bob).unwrap());
        assert!(fx.tracker.followed_users(&alice).unwrap().is_empty());
    }

    #[test]
    fn test_unregistered_user_is_not_found() {
        let mut fx = Fixture::new();
        let ghost = EntityId::new(404);

        assert!(fx.tracker.follow_conversation(&ghost, &EntityId::new(10), 0).is_err());
        let err = fx.tracker.status_update(&ghost, &fx.registry).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_stale_conversation_is_dropped() {
        let mut fx = Fixture::new();
        let alice = EntityId::new(1);

        fx.tracker.follow_conversation(&alice, &EntityId::new(77), 0).unwrap();
        let report = fx.tracker.status_update(&alice, &fx.registry).unwrap();

        assert!(report.is_empty());
        assert!(fx.tracker.tracked_conversations(&alice).unwrap().is_empty());
    }

    #[test]
    fn test_idle_filter() {
        let mut fx = Fixture::new();
        let alice = EntityId::new(1);
        fx.tracker.follow_conversation(&alice, &EntityId::new(10), 0).unwrap();

        let report = fx.tracker.status_update(&alice, &fx.registry).unwrap();
        assert_eq!(report.conversations.len(), 1);
        assert!(report.without_idle_conversations().conversations.is_empty());
    }
}
