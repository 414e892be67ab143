//! In-memory entity snapshot
//!
//! Holds the normalized working set of all domain entities loaded from the
//! workspace. Collections are keyed by id and preserve insertion order for
//! list views; freshly created ids go to the front. The store never fails -
//! it is a pure cache. It additionally carries an in-flight flag and the last
//! exchange error so callers can observe pending/fulfilled/rejected without
//! any request coordination living here.

use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::entities::area::Area;
use crate::entities::client::Client;
use crate::entities::cutlist::{CutlistItem, MaterialSummary};
use crate::entities::product::Product;
use crate::entities::project::Project;
use crate::entities::quote::{QuoteItem, Quotation};
use crate::entities::template::ProductTemplate;

/// An insertion-order-preserving collection of one entity type
#[derive(Debug, Clone)]
pub struct Collection<T: Entity> {
    items: Vec<T>,
}

// Derived Default would demand T: Default; an empty collection needs
// no such bound.
impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Replace-by-id, or prepend when the id is new ("create" semantics).
    /// Existing entries keep their position.
    pub fn upsert(&mut self, entity: T) {
        match self.items.iter().position(|e| e.id() == entity.id()) {
            Some(idx) => self.items[idx] = entity,
            None => self.items.insert(0, entity),
        }
    }

    pub fn upsert_many(&mut self, entities: impl IntoIterator<Item = T>) {
        for entity in entities {
            self.upsert(entity);
        }
    }

    /// Drop all current entries and take the given list as-is.
    pub fn replace_all(&mut self, entities: impl IntoIterator<Item = T>) {
        self.items = entities.into_iter().collect();
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        self.items
            .iter()
            .position(|e| e.id() == id)
            .map(|idx| self.items.remove(idx))
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The full in-memory snapshot for one workflow session
#[derive(Debug, Default)]
pub struct EntityStore {
    pub clients: Collection<Client>,
    pub projects: Collection<Project>,
    pub areas: Collection<Area>,
    pub products: Collection<Product>,
    pub templates: Collection<ProductTemplate>,
    pub quotes: Collection<Quotation>,
    pub quote_items: Collection<QuoteItem>,
    pub cutlist: Collection<CutlistItem>,
    pub material: Option<MaterialSummary>,

    in_flight: bool,
    last_error: Option<String>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an exchange with the system of record is in progress
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// The message from the last failed exchange, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Run one exchange with the system of record.
    ///
    /// Success clears the error indicator; failure records the message and
    /// leaves the cached entities at their last-known-good values. The
    /// closure must only mutate the store through the returned value so a
    /// failure cannot leave a half-applied snapshot.
    pub fn exchange<T, E: std::fmt::Display>(
        &mut self,
        op: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.in_flight = true;
        let result = op();
        self.in_flight = false;
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::Client;

    fn client(name: &str) -> Client {
        Client::new(name, "98765")
    }

    #[test]
    fn test_upsert_prepends_new_ids() {
        let mut col = Collection::new();
        let a = client("Asha");
        let b = client("Binod");
        let a_id = a.id.clone();
        let b_id = b.id.clone();

        col.upsert(a);
        col.upsert(b);

        let order: Vec<_> = col.iter().map(|c| c.id.clone()).collect();
        assert_eq!(order, vec![b_id, a_id]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut col = Collection::new();
        let a = client("Asha");
        let id = a.id.clone();
        col.upsert(a);
        col.upsert(client("Binod"));

        let mut edited = client("Asha Rao");
        edited.id = id.clone();
        col.upsert(edited);

        assert_eq!(col.len(), 2);
        assert_eq!(col.get(&id).unwrap().name, "Asha Rao");
        // Position preserved: the edited entry is still last
        assert_eq!(col.iter().last().unwrap().id, id);
    }

    #[test]
    fn test_remove_returns_entity() {
        let mut col = Collection::new();
        let a = client("Asha");
        let id = a.id.clone();
        col.upsert(a);

        let removed = col.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(col.is_empty());
        assert!(col.remove(&id).is_none());
    }

    #[test]
    fn test_new_store_starts_empty() {
        let store = EntityStore::new();
        assert!(store.clients.is_empty());
        assert!(store.projects.is_empty());
        assert!(store.areas.is_empty());
        assert!(store.products.is_empty());
        assert!(store.templates.is_empty());
        assert!(store.quotes.is_empty());
        assert!(store.quote_items.is_empty());
        assert!(store.cutlist.is_empty());
        assert!(store.material.is_none());
        assert!(!store.is_in_flight());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_exchange_tracks_error_indicator() {
        let mut store = EntityStore::new();

        let err: Result<(), &str> = store.exchange(|| Err("connection refused"));
        assert!(err.is_err());
        assert_eq!(store.last_error(), Some("connection refused"));
        assert!(!store.is_in_flight());

        // Dismissing without another exchange also clears it
        store.clear_error();
        assert_eq!(store.last_error(), None);

        let err: Result<(), &str> = store.exchange(|| Err("disk full"));
        assert!(err.is_err());

        // As does the next successful exchange
        let ok: Result<u32, &str> = store.exchange(|| Ok(7));
        assert_eq!(ok.unwrap(), 7);
        assert_eq!(store.last_error(), None);
    }
}
