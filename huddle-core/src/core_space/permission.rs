//! Conversation permission engine
//!
//! Permissions are three independent bits (MEMBER, ADMIN, OWNER) that are
//! toggled with XOR, never assigned. Authorization is hierarchical:
//!
//! - changing the OWNER bit requires the actor to hold OWNER
//! - changing the MEMBER bit requires the actor to hold OWNER or ADMIN
//! - the ADMIN bit has no gate of its own
//!
//! "ADMIN implies MEMBER" is not enforced; a participant may hold any
//! subset of the bits.

use crate::core_store::model::{ConversationHeader, EntityId, Permission};
use tracing::{debug, warn};

/// Permission operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error(
        "Permission denied: {actor} ({actor_permission}) may not toggle {requested} for {target} ({target_permission})"
    )]
    Unauthorized {
        actor: EntityId,
        target: EntityId,
        requested: Permission,
        actor_permission: Permission,
        target_permission: Permission,
    },

    #[error("Permission denied: {user} holds no permission in conversation {conversation}")]
    NotParticipant {
        user: EntityId,
        conversation: EntityId,
    },
}

/// Toggle and authorization rules for conversation permissions
pub struct PermissionEngine;

impl PermissionEngine {
    /// Bits a request would differ on, relative to the target's value
    pub fn diff(requested: Permission, target: Permission) -> Permission {
        requested ^ target
    }

    /// Whether an actor holding `source` may apply `requested` to `target`
    pub fn authorize(source: Permission, target: Permission, requested: Permission) -> bool {
        let diff = Self::diff(requested, target);

        if diff.is_owner() && !source.is_owner() {
            return false;
        }
        if diff.is_member() && !(source.is_owner() || source.is_admin()) {
            return false;
        }
        true
    }

    /// Toggle `requested` on the target's stored permission
    ///
    /// On success the target's value is XORed with `requested` and the new
    /// value is returned. A rejected request leaves the header untouched.
    pub fn toggle(
        header: &mut ConversationHeader,
        actor: &EntityId,
        target: &EntityId,
        requested: Permission,
    ) -> Result<Permission, PermissionError> {
        let actor_permission = header.permission(actor);
        let target_permission = header.permission(target);

        if !Self::authorize(actor_permission, target_permission, requested) {
            warn!(
                conversation = %header.id,
                actor = %actor,
                target = %target,
                requested = %requested,
                "Permission toggle denied"
            );
            return Err(PermissionError::Unauthorized {
                actor: actor.clone(),
                target: target.clone(),
                requested,
                actor_permission,
                target_permission,
            });
        }

        let updated = header.toggle_permission(target, requested);
        debug!(
            conversation = %header.id,
            target = %target,
            permission = %updated,
            "Permission toggled"
        );
        Ok(updated)
    }

    /// Whether `user` may add messages to the conversation
    pub fn can_post(header: &ConversationHeader, user: &EntityId) -> bool {
        !header.permission(user).is_empty()
    }
}
