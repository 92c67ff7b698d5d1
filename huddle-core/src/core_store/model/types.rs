/*
    types.rs - Common types for core_store models

    Defines:
    - Structured entity identifiers and their generator
    - Timestamps
    - Entity kinds (for error reporting)
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier shared by every entity type.
///
/// Ordered by `id` first, then recursively by `root`; an absent root orders
/// before any present one. The derived `Ord` relies on that field order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    id: u32,
    root: Option<Box<EntityId>>,
}

impl EntityId {
    /// Identifier without a parent
    pub fn new(id: u32) -> Self {
        EntityId { id, root: None }
    }

    /// Identifier nested under `root`
    pub fn with_root(root: EntityId, id: u32) -> Self {
        EntityId {
            id,
            root: Some(Box::new(root)),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn root(&self) -> Option<&EntityId> {
        self.root.as_deref()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = &self.root {
            write!(f, "{}.", root)?;
        }
        write!(f, "{}", self.id)
    }
}

/// Issues monotonically increasing identifiers under an optional root.
///
/// Once the numeric space is exhausted the generator stops handing out ids
/// rather than wrapping, so an id is never issued twice.
#[derive(Debug, Clone)]
pub struct LinearIdGenerator {
    root: Option<EntityId>,
    next: Option<u32>,
}

impl LinearIdGenerator {
    pub fn new(root: Option<EntityId>, start: u32) -> Self {
        LinearIdGenerator {
            root,
            next: Some(start),
        }
    }

    /// Next identifier, or `None` when the generator is exhausted
    pub fn make(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = id.checked_add(1);

        Some(match &self.root {
            Some(root) => EntityId::with_root(root.clone(), id),
            None => EntityId::new(id),
        })
    }
}

impl Default for LinearIdGenerator {
    fn default() -> Self {
        LinearIdGenerator::new(None, 1)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp representing the current time
    pub fn now() -> Self {
        // A clock set before the epoch collapses to zero instead of panicking.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }

    /// Create a timestamp from milliseconds since epoch
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Get milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of entity held by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Conversation,
    Payload,
    Message,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Conversation => "conversation",
            EntityKind::Payload => "conversation payload",
            EntityKind::Message => "message",
        };
        f.write_str(name)
    }
}
