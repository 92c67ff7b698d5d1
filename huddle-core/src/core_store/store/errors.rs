/*
    errors.rs - Error types for the store subsystem

    Defines the failures of registry inserts and lookups:
    - Missing entities
    - Identifier reuse
    - Messages linked into more than one conversation
*/

use crate::core_store::model::{EntityId, EntityKind};
use thiserror::Error;

/// Errors that can occur in the store subsystem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Lookup key absent from an index
    #[error("Not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: EntityId },

    /// An entity with this identifier is already registered
    #[error("Duplicate {kind} id: {id}")]
    Duplicate { kind: EntityKind, id: EntityId },

    /// The message already sits in a conversation chain
    #[error("Message {message} is already linked into conversation {conversation}")]
    AlreadyLinked {
        message: EntityId,
        conversation: EntityId,
    },
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: &EntityId) -> Self {
        StoreError::NotFound {
            kind,
            id: id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::not_found(EntityKind::Conversation, &EntityId::new(4));
        assert_eq!(err.to_string(), "Not found: conversation 4");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_error_display() {
        let err = StoreError::Duplicate {
            kind: EntityKind::User,
            id: EntityId::with_root(EntityId::new(1), 2),
        };
        assert_eq!(err.to_string(), "Duplicate user id: 1.2");
        assert!(!err.is_not_found());
    }
}
