//! Model facade
//!
//! `Model` is the composition root of the messaging core: it owns the entity
//! registry and the activity tracker, validates input, and routes every
//! mutation through the permission engine where one applies. There is no
//! global instance; callers construct a `Model` and pass it around (or wrap
//! it in a [`SharedModel`](super::async_model::SharedModel)).

use super::activity::{ActivityTracker, StatusReport};
use super::permission::{PermissionEngine, PermissionError};
use crate::config::ModelConfig;
use crate::core_store::model::{
    BotUser, ConversationHeader, ConversationPayload, EntityId, EntityKind, Message, Permission,
    User,
};
use crate::core_store::store::{EntityRegistry, IndexedCollection, StoreError};
use crate::metrics::{self, names, Timer};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Model operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`ModelError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidArgument,
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            ModelError::Store(_) => ErrorKind::InvalidArgument,
            ModelError::Permission(_) => ErrorKind::Unauthorized,
            ModelError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

fn require_text(field: &str, value: &str) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ModelError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Users, conversations, messages, permissions and follow state
pub struct Model {
    registry: EntityRegistry,
    activity: ActivityTracker,
    config: ModelConfig,
    started_at: Instant,
}

impl Model {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            registry: EntityRegistry::new(),
            activity: ActivityTracker::new(),
            config,
            started_at: Instant::now(),
        }
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // --- Users ---

    /// Add a user and start tracking their activity
    pub fn add_user(&mut self, user: User) -> ModelResult<&User> {
        require_text("user name", &user.name)?;
        let id = user.id.clone();
        let op = crate::tracing::registry::trace_insert(EntityKind::User, &id);

        self.registry.add_user(user)?;
        self.activity.register(id.clone());
        op.complete();

        metrics::record_counter(names::USERS_ADDED, 1);
        metrics::record_gauge(names::USERS_TOTAL, self.registry.users().len() as f64);

        let user = self.registry.user(&id)?;
        info!(user = %id, name = %user.name, "User added");
        Ok(user)
    }

    pub fn users(&self) -> &IndexedCollection<User> {
        self.registry.users()
    }

    // --- Conversations ---

    /// Add a conversation; its owner must already exist and becomes OWNER
    pub fn add_conversation(&mut self, header: ConversationHeader) -> ModelResult<&ConversationHeader> {
        require_text("conversation title", &header.title)?;
        let id = header.id.clone();
        let op = crate::tracing::registry::trace_insert(EntityKind::Conversation, &id);

        let header = self.registry.add_conversation(header)?;
        op.complete();
        info!(conversation = %id, owner = %header.owner, title = %header.title, "Conversation added");

        metrics::record_counter(names::CONVERSATIONS_ADDED, 1);
        metrics::record_gauge(
            names::CONVERSATIONS_TOTAL,
            self.registry.conversations().len() as f64,
        );
        Ok(self.registry.conversation(&id)?)
    }

    pub fn conversations(&self) -> &IndexedCollection<ConversationHeader> {
        self.registry.conversations()
    }

    pub fn payload(&self, conversation: &EntityId) -> ModelResult<&ConversationPayload> {
        Ok(self.registry.payload(conversation)?)
    }

    /// Messages of a conversation in append order
    pub fn conversation_messages(&self, conversation: &EntityId) -> ModelResult<Vec<&Message>> {
        Ok(self.registry.conversation_messages(conversation)?)
    }

    // --- Messages ---

    /// Index a message without attaching it to a conversation
    pub fn add_message(&mut self, message: Message) -> ModelResult<&Message> {
        require_text("message content", &message.content)?;
        let id = message.id.clone();
        let op = crate::tracing::registry::trace_insert(EntityKind::Message, &id);

        self.registry.add_message(message)?;
        op.complete();
        metrics::record_counter(names::MESSAGES_ADDED, 1);
        debug!(message = %id, "Message added");

        Ok(self.registry.message(&id)?)
    }

    /// Attach an indexed message to the end of a conversation
    ///
    /// Returns the conversation's new size.
    pub fn append_message(&mut self, conversation: &EntityId, message: &EntityId) -> ModelResult<usize> {
        let op = crate::tracing::registry::trace_append(conversation, message);
        match self.registry.append_message(conversation, message) {
            Ok(size) => {
                op.complete();
                metrics::record_counter(names::MESSAGES_APPENDED, 1);
                debug!(conversation = %conversation, message = %message, size, "Message appended");
                Ok(size)
            }
            Err(e) => {
                op.record_error(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Add a message and append it, if the author participates in the conversation
    pub fn post_message(&mut self, conversation: &EntityId, message: Message) -> ModelResult<usize> {
        require_text("message content", &message.content)?;
        let header = self.registry.conversation(conversation)?;
        if !PermissionEngine::can_post(header, &message.author) {
            metrics::record_counter(names::PERMISSION_DENIED, 1);
            return Err(PermissionError::NotParticipant {
                user: message.author.clone(),
                conversation: conversation.clone(),
            }
            .into());
        }

        let id = message.id.clone();
        self.add_message(message)?;
        self.append_message(conversation, &id)
    }

    pub fn messages(&self) -> &IndexedCollection<Message> {
        self.registry.messages()
    }

    // --- Permissions ---

    /// XOR-toggle `requested` on `target`'s permission, if `actor` may
    ///
    /// Returns the target's new permission.
    pub fn toggle_permission(
        &mut self,
        actor: &EntityId,
        target: &EntityId,
        requested: Permission,
        conversation: &EntityId,
    ) -> ModelResult<Permission> {
        self.registry.conversation(conversation)?;
        self.registry.user(actor)?;
        self.registry.user(target)?;

        let op = crate::tracing::permission::trace_toggle(conversation, actor, target, requested);
        let header = self.registry.conversation_mut(conversation)?;
        match PermissionEngine::toggle(header, actor, target, requested) {
            Ok(updated) => {
                op.complete();
                metrics::record_counter(names::PERMISSION_TOGGLED, 1);
                Ok(updated)
            }
            Err(e) => {
                op.record_error(&e.to_string());
                metrics::record_counter(names::PERMISSION_DENIED, 1);
                Err(e.into())
            }
        }
    }

    /// Current permission of `user`; zero if never granted
    pub fn permission(&self, user: &EntityId, conversation: &EntityId) -> ModelResult<Permission> {
        Ok(self.registry.conversation(conversation)?.permission(user))
    }

    // --- Bots ---

    pub fn add_bot(&mut self, bot: BotUser, conversation: &EntityId) -> ModelResult<&BotUser> {
        require_text("bot name", &bot.name)?;
        let id = bot.id.clone();
        let bot = self.registry.add_bot(conversation, bot)?;
        metrics::record_counter(names::BOTS_ADDED, 1);
        debug!(bot = %id, conversation = %conversation, "Bot added");
        Ok(bot)
    }

    // --- Following ---

    /// Follow another user's conversation creations; false if already following
    pub fn follow_user(&mut self, follower: &EntityId, followee: &EntityId) -> ModelResult<bool> {
        let created = self.registry.user(followee)?.created_conversations.len();
        self.registry.user(follower)?;

        let added = self.activity.follow_user(follower, followee, created)?;
        self.registry.user_mut(follower)?.follow(followee);
        debug!(follower = %follower, followee = %followee, added, "Follow user");
        Ok(added)
    }

    pub fn unfollow_user(&mut self, follower: &EntityId, followee: &EntityId) -> ModelResult<bool> {
        self.registry.user_mut(follower)?.unfollow(followee);
        let removed = self.activity.unfollow_user(follower, followee)?;
        debug!(follower = %follower, followee = %followee, removed, "Unfollow user");
        Ok(removed)
    }

    /// Watch a conversation; unread counts start from its current size
    pub fn follow_conversation(&mut self, user: &EntityId, conversation: &EntityId) -> ModelResult<()> {
        let size = self.registry.conversation(conversation)?.size();
        self.registry.user(user)?;

        self.activity.follow_conversation(user, conversation, size)?;
        debug!(user = %user, conversation = %conversation, baseline = size, "Follow conversation");
        Ok(())
    }

    pub fn unfollow_conversation(&mut self, user: &EntityId, conversation: &EntityId) -> ModelResult<bool> {
        self.registry.user(user)?;
        let removed = self.activity.unfollow_conversation(user, conversation)?;
        debug!(user = %user, conversation = %conversation, removed, "Unfollow conversation");
        Ok(removed)
    }

    /// Report and consume unread activity for `user`
    pub fn status_update(&mut self, user: &EntityId) -> ModelResult<StatusReport> {
        self.registry.user(user)?;
        let op = crate::tracing::activity::trace_status_update(user);
        let timer = Timer::new(names::STATUS_DURATION);

        let report = self.activity.status_update(user, &self.registry)?;
        let report = if self.config.report_idle_conversations {
            report
        } else {
            report.without_idle_conversations()
        };

        timer.stop();
        op.complete();
        metrics::record_counter(names::STATUS_UPDATES, 1);
        Ok(report)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
