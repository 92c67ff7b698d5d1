/*
    collection.rs - One entity type exposed through three indices

    The primary index owns the entities keyed by identifier. The time and
    text indices hold identifiers only and resolve through the primary, so a
    single insert either lands in all three indices or in none.
*/

use super::errors::{StoreError, StoreResult};
use super::index::{CaseInsensitive, MultiIndexStore};
use crate::core_store::model::{EntityId, EntityKind, Timestamp};
use std::ops::RangeBounds;

/// Projections an entity is indexed by
pub trait Indexed {
    fn id(&self) -> &EntityId;
    fn creation(&self) -> Timestamp;
    fn text(&self) -> &str;
}

/// Entities of one kind, indexed by id, creation time and text
#[derive(Debug, Clone)]
pub struct IndexedCollection<V> {
    kind: EntityKind,
    by_id: MultiIndexStore<EntityId, V>,
    by_time: MultiIndexStore<Timestamp, EntityId>,
    by_text: MultiIndexStore<CaseInsensitive, EntityId>,
}

impl<V: Indexed> IndexedCollection<V> {
    pub fn new(kind: EntityKind) -> Self {
        IndexedCollection {
            kind,
            by_id: MultiIndexStore::new(),
            by_time: MultiIndexStore::new(),
            by_text: MultiIndexStore::new(),
        }
    }

    /// Insert into every index; identifiers must be fresh
    pub fn insert(&mut self, value: V) -> StoreResult<&V> {
        let id = value.id().clone();
        if self.by_id.contains_key(&id) {
            return Err(StoreError::Duplicate {
                kind: self.kind,
                id,
            });
        }

        self.by_time.insert(value.creation(), id.clone());
        self.by_text.insert(CaseInsensitive::new(value.text()), id.clone());
        self.by_id.insert(id.clone(), value);

        self.require(&id)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn get(&self, id: &EntityId) -> Option<&V> {
        self.by_id.first(id)
    }

    /// Lookup that reports a miss as `StoreError::NotFound`
    pub fn require(&self, id: &EntityId) -> StoreResult<&V> {
        self.get(id)
            .ok_or_else(|| StoreError::not_found(self.kind, id))
    }

    // Callers must not change the indexed projections through this.
    pub(crate) fn get_mut(&mut self, id: &EntityId) -> StoreResult<&mut V> {
        let kind = self.kind;
        self.by_id
            .first_mut(id)
            .ok_or_else(|| StoreError::not_found(kind, id))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    /// First entity created at exactly `creation`
    pub fn by_time(&self, creation: Timestamp) -> Option<&V> {
        self.by_time.first(&creation).and_then(|id| self.get(id))
    }

    /// First entity whose text matches, ignoring case
    pub fn by_text(&self, text: &str) -> Option<&V> {
        self.by_text
            .first(&CaseInsensitive::new(text))
            .and_then(|id| self.get(id))
    }

    /// Every entity whose text matches, ignoring case, in insertion order
    pub fn all_by_text(&self, text: &str) -> Vec<&V> {
        self.by_text
            .at(&CaseInsensitive::new(text))
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Entities whose text starts with `prefix`, in text order
    pub fn with_text_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a V> + 'a {
        self.by_text
            .with_prefix(prefix)
            .filter_map(move |id| self.get(id))
    }

    /// Entities created within `range`, oldest first
    pub fn created_between<'a, R>(&'a self, range: R) -> impl Iterator<Item = &'a V> + 'a
    where
        R: RangeBounds<Timestamp> + 'a,
    {
        self.by_time
            .range(range)
            .filter_map(move |id| self.get(id))
    }

    /// All entities, oldest first
    pub fn by_creation(&self) -> impl Iterator<Item = &V> + '_ {
        self.by_time.all().filter_map(move |id| self.get(id))
    }

    /// All entities in case-insensitive text order
    pub fn by_text_order(&self) -> impl Iterator<Item = &V> + '_ {
        self.by_text.all().filter_map(move |id| self.get(id))
    }

    /// All entities in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.by_id.all()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_store::model::User;

    fn user(id: u32, name: &str, at: u64) -> User {
        User::new(EntityId::new(id), name, Timestamp::from_millis(at))
    }

    fn collection() -> IndexedCollection<User> {
        let mut users = IndexedCollection::new(EntityKind::User);
        users.insert(user(2, "Bob", 200)).unwrap();
        users.insert(user(1, "alice", 300)).unwrap();
        users.insert(user(3, "Carol", 100)).unwrap();
        users
    }

    #[test]
    fn test_visible_in_every_index() {
        let users = collection();
        let carol = users.get(&EntityId::new(3)).unwrap();

        assert_eq!(users.by_time(Timestamp::from_millis(100)), Some(carol));
        assert_eq!(users.by_text("carol"), Some(carol));
        assert_eq!(users.len(), 3);
    }

    #[test]
    fn test_duplicate_id_touches_no_index() {
        let mut users = collection();
        let err = users.insert(user(2, "Mallory", 999)).unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { kind: EntityKind::User, .. }));
        assert!(users.by_text("mallory").is_none());
        assert!(users.by_time(Timestamp::from_millis(999)).is_none());
        assert_eq!(users.len(), 3);
    }

    #[test]
    fn test_orderings() {
        let users = collection();

        let by_id: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(by_id, vec!["alice", "Bob", "Carol"]);

        let by_time: Vec<_> = users.by_creation().map(|u| u.name.as_str()).collect();
        assert_eq!(by_time, vec!["Carol", "Bob", "alice"]);

        let by_text: Vec<_> = users.by_text_order().map(|u| u.name.as_str()).collect();
        assert_eq!(by_text, vec!["alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_shared_text_keys() {
        let mut users = collection();
        users.insert(user(4, "ALICE", 400)).unwrap();

        assert_eq!(users.by_text("Alice").map(|u| u.id.clone()), Some(EntityId::new(1)));
        assert_eq!(users.all_by_text("alice").len(), 2);
    }

    #[test]
    fn test_range_and_prefix_views() {
        let users = collection();

        let window: Vec<_> = users
            .created_between(Timestamp::from_millis(150)..=Timestamp::from_millis(300))
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(window, vec!["Bob", "alice"]);

        let prefixed: Vec<_> = users.with_text_prefix("c").map(|u| u.name.as_str()).collect();
        assert_eq!(prefixed, vec!["Carol"]);
    }

    #[test]
    fn test_require_reports_kind() {
        let users = collection();
        let err = users.require(&EntityId::new(42)).unwrap_err();
        assert_eq!(err, StoreError::not_found(EntityKind::User, &EntityId::new(42)));
    }
}
