//! Scripted walkthrough of the model
//!
//! Seeds a small world through a `SharedModel`, then reads back the status
//! report of one follower.

use anyhow::{Context, Result};
use huddle_core::core_space::{SharedModel, StatusReport};
use huddle_core::core_store::model::{
    ConversationHeader, EntityId, LinearIdGenerator, Message, Permission, Timestamp, User,
};
use huddle_core::tracing::{TraceContext, TracedOperation};
use tracing::info;

struct Ids(LinearIdGenerator);

impl Ids {
    fn next(&mut self) -> Result<EntityId> {
        self.0.make().context("id space exhausted")
    }
}

/// Run the walkthrough and return the follower's report
///
/// `backlog` messages are posted before the follower starts watching and
/// `unread` after, so the report shows `unread` new messages.
pub async fn run(model: &SharedModel, backlog: usize, unread: usize) -> Result<StatusReport> {
    let ctx = TraceContext::new();
    let op = TracedOperation::with_context("demo", &ctx);
    let mut ids = Ids(LinearIdGenerator::default());

    let owner = model
        .add_user(User::new(ids.next()?, "alice", Timestamp::now()))
        .await?
        .id;
    let follower = model
        .add_user(User::new(ids.next()?, "bob", Timestamp::now()))
        .await?
        .id;

    let room = model
        .add_conversation(ConversationHeader::new(ids.next()?, owner.clone(), Timestamp::now(), "general"))
        .await?
        .id;
    let granted = model
        .toggle_permission(&owner, &follower, Permission::MEMBER, &room)
        .await?;
    info!(user = %follower, permission = %granted, role = granted.role_label(), "Granted membership");

    model.follow_user(&follower, &owner).await?;
    let mut messages = LinearIdGenerator::new(Some(room.clone()), 1);
    for n in 0..backlog + unread {
        if n == backlog {
            model.follow_conversation(&follower, &room).await?;
        }
        let id = messages.make().context("message id space exhausted")?;
        let message = Message::new(id, owner.clone(), format!("update #{}", n + 1), Timestamp::now());
        model.post_message(&room, message).await?;
    }
    if unread == 0 {
        model.follow_conversation(&follower, &room).await?;
    }

    model
        .add_conversation(ConversationHeader::new(ids.next()?, owner, Timestamp::now(), "random"))
        .await?;

    let report = model.status_update(&follower).await?;
    op.record_event("status read");
    op.complete();
    Ok(report)
}
