//! Shared async handle to the model
//!
//! Wraps [`Model`] in an `Arc<RwLock<_>>` so many tasks can read while one
//! writes. Every mutating call holds the write lock for the whole operation,
//! so readers never see a half-indexed entity, and toggles or status resets
//! for the same user run one after another.

use super::activity::StatusReport;
use super::model::{Model, ModelResult};
use crate::config::ModelConfig;
use crate::core_store::model::{
    BotUser, ConversationHeader, EntityId, Message, Permission, User,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cloneable handle to a [`Model`] behind an async read-write lock
#[derive(Clone)]
pub struct SharedModel {
    inner: Arc<RwLock<Model>>,
}

impl SharedModel {
    pub fn new(config: ModelConfig) -> Self {
        Self::from_model(Model::new(config))
    }

    pub fn from_model(model: Model) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// Run `f` under the read lock
    pub async fn read<R>(&self, f: impl FnOnce(&Model) -> R) -> R {
        let model = self.inner.read().await;
        f(&model)
    }

    /// Run `f` under the write lock
    pub async fn write<R>(&self, f: impl FnOnce(&mut Model) -> R) -> R {
        let mut model = self.inner.write().await;
        f(&mut model)
    }

    pub async fn add_user(&self, user: User) -> ModelResult<User> {
        let mut model = self.inner.write().await;
        model.add_user(user).cloned()
    }

    pub async fn add_conversation(&self, header: ConversationHeader) -> ModelResult<ConversationHeader> {
        let mut model = self.inner.write().await;
        model.add_conversation(header).cloned()
    }

    pub async fn add_message(&self, message: Message) -> ModelResult<Message> {
        let mut model = self.inner.write().await;
        model.add_message(message).cloned()
    }

    pub async fn append_message(&self, conversation: &EntityId, message: &EntityId) -> ModelResult<usize> {
        let mut model = self.inner.write().await;
        model.append_message(conversation, message)
    }

    pub async fn post_message(&self, conversation: &EntityId, message: Message) -> ModelResult<usize> {
        let mut model = self.inner.write().await;
        model.post_message(conversation, message)
    }

    pub async fn toggle_permission(
        &self,
        actor: &EntityId,
        target: &EntityId,
        requested: Permission,
        conversation: &EntityId,
    ) -> ModelResult<Permission> {
        let mut model = self.inner.write().await;
        model.toggle_permission(actor, target, requested, conversation)
    }

    pub async fn permission(&self, user: &EntityId, conversation: &EntityId) -> ModelResult<Permission> {
        let model = self.inner.read().await;
        model.permission(user, conversation)
    }

    pub async fn add_bot(&self, bot: BotUser, conversation: &EntityId) -> ModelResult<BotUser> {
        let mut model = self.inner.write().await;
        model.add_bot(bot, conversation).cloned()
    }

    pub async fn follow_user(&self, follower: &EntityId, followee: &EntityId) -> ModelResult<bool> {
        let mut model = self.inner.write().await;
        model.follow_user(follower, followee)
    }

    pub async fn unfollow_user(&self, follower: &EntityId, followee: &EntityId) -> ModelResult<bool> {
        let mut model = self.inner.write().await;
        model.unfollow_user(follower, followee)
    }

    pub async fn follow_conversation(&self, user: &EntityId, conversation: &EntityId) -> ModelResult<()> {
        let mut model = self.inner.write().await;
        model.follow_conversation(user, conversation)
    }

    pub async fn unfollow_conversation(&self, user: &EntityId, conversation: &EntityId) -> ModelResult<bool> {
        let mut model = self.inner.write().await;
        model.unfollow_conversation(user, conversation)
    }

    pub async fn status_update(&self, user: &EntityId) -> ModelResult<StatusReport> {
        let mut model = self.inner.write().await;
        model.status_update(user)
    }

    pub async fn user(&self, id: &EntityId) -> Option<User> {
        self.read(|m| m.users().get(id).cloned()).await
    }

    pub async fn conversation(&self, id: &EntityId) -> Option<ConversationHeader> {
        self.read(|m| m.conversations().get(id).cloned()).await
    }

    pub async fn conversation_messages(&self, conversation: &EntityId) -> ModelResult<Vec<Message>> {
        self.read(|m| {
            m.conversation_messages(conversation)
                .map(|messages| messages.into_iter().cloned().collect())
        })
        .await
    }

    pub async fn version(&self) -> String {
        self.read(|m| m.version().to_string()).await
    }

    pub async fn uptime(&self) -> Duration {
        self.read(|m| m.uptime()).await
    }
}

impl Default for SharedModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
