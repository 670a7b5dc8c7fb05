//! Snapshot store with write-through persistence and cross-session sync
//!
//! Each collection is held in memory and mirrored to one key of a
//! [`DurableMedium`]. Mutations serialize the whole collection and write it
//! before the in-memory copy changes, so a failed write leaves the store
//! exactly as it was. Change notifications from other sessions are applied
//! only when the parsed value differs from what is already held.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::{PersistenceError, StoreError};
use super::medium::{DurableMedium, StorageEvent};
use super::types::{Collection, Snapshot};
use crate::error::{validate_title, ValidationError};

/// Callback invoked with a collection's new contents whenever it changes
pub type SnapshotObserver = Rc<dyn Fn(Collection, &[Snapshot])>;

/// Keeps an observer registered until dropped
pub struct Subscription {
    observer: SnapshotObserver,
    observers: Rc<RefCell<Vec<SnapshotObserver>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|item| !Rc::ptr_eq(item, &self.observer));
    }
}

#[derive(Debug, Clone, Default)]
struct CollectionState {
    items: Vec<Snapshot>,
    /// Value used when the medium has nothing usable for this key
    fallback: Vec<Snapshot>,
}

/// Two named snapshot collections persisted to a shared durable medium
pub struct SnapshotStore<M: DurableMedium> {
    medium: M,
    documents: CollectionState,
    configurations: CollectionState,
    observers: Rc<RefCell<Vec<SnapshotObserver>>>,
    last_id: i64,
}

impl<M: DurableMedium> SnapshotStore<M> {
    /// Open a store whose collections start empty when nothing is stored
    pub fn open(medium: M) -> Self {
        Self::open_with_fallback(medium, Vec::new(), Vec::new())
    }

    /// Open a store, using the given collections when the medium has no
    /// value or an unreadable one for a key
    pub fn open_with_fallback(
        mut medium: M,
        documents: Vec<Snapshot>,
        configurations: Vec<Snapshot>,
    ) -> Self {
        medium.listen();
        let documents = read_initial(&medium, Collection::Documents, documents);
        let configurations = read_initial(&medium, Collection::Configurations, configurations);
        Self {
            medium,
            documents,
            configurations,
            observers: Rc::new(RefCell::new(Vec::new())),
            last_id: 0,
        }
    }

    /// Snapshots of a collection in insertion order
    pub fn list(&self, collection: Collection) -> &[Snapshot] {
        &self.state(collection).items
    }

    /// Look up a snapshot by id
    pub fn load(&self, collection: Collection, id: &str) -> Result<Snapshot, StoreError> {
        self.list(collection)
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    /// Append a snapshot and persist the collection.
    ///
    /// The title is trimmed and must not be blank. A missing or already used
    /// id is replaced by a fresh one. Returns the id the snapshot was stored
    /// under.
    ///
    /// Configurations drop any image URLs. A document with no URL list gets
    /// one blank slot; an explicitly empty list is rejected.
    pub fn save(
        &mut self,
        collection: Collection,
        snapshot: Snapshot,
    ) -> Result<String, StoreError> {
        let title = validate_title(&snapshot.title)?.to_string();

        let mut snapshot = Snapshot { title, ..snapshot };
        match collection {
            Collection::Configurations => snapshot.image_urls = None,
            Collection::Documents => match &snapshot.image_urls {
                Some(urls) if urls.is_empty() => {
                    return Err(ValidationError::NoImageSlots.into());
                }
                Some(_) => {}
                None => snapshot.image_urls = Some(vec![String::new()]),
            },
        }
        if snapshot.id.is_empty() || self.contains(collection, &snapshot.id) {
            snapshot.id = self.next_id(collection);
        }

        let id = snapshot.id.clone();
        let mut next = self.list(collection).to_vec();
        next.push(snapshot);
        self.commit(collection, next)?;

        info!(%collection, %id, "saved snapshot");
        Ok(id)
    }

    /// Remove the snapshot with `id`. Absent ids are a no-op; returns whether
    /// anything was removed.
    pub fn delete(&mut self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        if !self.contains(collection, id) {
            debug!(%collection, id, "delete of unknown snapshot ignored");
            return Ok(false);
        }

        let next: Vec<Snapshot> = self
            .list(collection)
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        self.commit(collection, next)?;

        info!(%collection, id, "deleted snapshot");
        Ok(true)
    }

    /// Register an observer for collection changes
    pub fn subscribe(&self, observer: SnapshotObserver) -> Subscription {
        self.observers.borrow_mut().push(Rc::clone(&observer));
        Subscription {
            observer,
            observers: Rc::clone(&self.observers),
        }
    }

    /// Apply one change notification. Returns true if a collection changed.
    pub fn handle_event(&mut self, event: &StorageEvent) -> bool {
        let Some(collection) = Collection::from_storage_key(&event.key) else {
            return false;
        };

        let incoming = match &event.new_value {
            None => self.state(collection).fallback.clone(),
            Some(raw) => match parse_collection(collection, raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(%collection, error = %e, "ignoring unreadable change notification");
                    return false;
                }
            },
        };

        if incoming == self.state(collection).items {
            debug!(%collection, "change notification matches current state");
            return false;
        }

        debug!(%collection, count = incoming.len(), "applying external change");
        self.state_mut(collection).items = incoming;
        self.notify(collection);
        true
    }

    /// Apply every pending change notification from the medium. Returns the
    /// number of notifications that changed a collection.
    pub fn sync(&mut self) -> usize {
        let events = self.medium.take_events();
        events.iter().filter(|e| self.handle_event(e)).count()
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    fn commit(&mut self, collection: Collection, next: Vec<Snapshot>) -> Result<(), StoreError> {
        let key = collection.storage_key();
        let raw = serde_json::to_string(&next).map_err(|source| PersistenceError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.medium.set(key, &raw)?;

        self.state_mut(collection).items = next;
        self.notify(collection);
        Ok(())
    }

    fn notify(&self, collection: Collection) {
        let observers = self.observers.borrow().clone();
        let items = &self.state(collection).items;
        for observer in observers {
            (observer)(collection, items);
        }
    }

    fn contains(&self, collection: Collection, id: &str) -> bool {
        self.list(collection).iter().any(|s| s.id == id)
    }

    /// Millisecond timestamp, bumped past anything already issued or stored
    fn next_id(&mut self, collection: Collection) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last_id + 1);
        while self.contains(collection, &candidate.to_string()) {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }

    fn state(&self, collection: Collection) -> &CollectionState {
        match collection {
            Collection::Documents => &self.documents,
            Collection::Configurations => &self.configurations,
        }
    }

    fn state_mut(&mut self, collection: Collection) -> &mut CollectionState {
        match collection {
            Collection::Documents => &mut self.documents,
            Collection::Configurations => &mut self.configurations,
        }
    }
}

fn parse_collection(collection: Collection, raw: &str) -> Result<Vec<Snapshot>, PersistenceError> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::parse(collection.storage_key(), e))
}

fn read_initial<M: DurableMedium>(
    medium: &M,
    collection: Collection,
    fallback: Vec<Snapshot>,
) -> CollectionState {
    let loaded = medium
        .get(collection.storage_key())
        .and_then(|raw| raw.map(|r| parse_collection(collection, &r)).transpose());

    let items = match loaded {
        Ok(Some(items)) => items,
        Ok(None) => fallback.clone(),
        Err(e) => {
            warn!(%collection, error = %e, "falling back to default collection");
            fallback.clone()
        }
    };
    CollectionState { items, fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::medium::MemoryMedium;
    use crate::snapshot::types::CardStyle;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn preset(title: &str) -> Snapshot {
        Snapshot::configuration(title, CardStyle::default())
    }

    #[test]
    fn test_save_assigns_id_and_trims_title() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let id = store.save(Collection::Configurations, preset("  Warm  ")).unwrap();

        let saved = store.load(Collection::Configurations, &id).unwrap();
        assert_eq!(saved.title, "Warm");
        assert!(!saved.id.is_empty());
        assert_eq!(store.list(Collection::Configurations).len(), 1);
    }

    #[test]
    fn test_blank_title_is_rejected_without_change() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let err = store.save(Collection::Documents, preset("   ")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));
        assert!(store.list(Collection::Documents).is_empty());
        assert_eq!(store.medium().get("savedDocuments").unwrap(), None);
    }

    #[test]
    fn test_ids_are_unique_within_session() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let ids: Vec<String> = (0..20)
            .map(|i| store.save(Collection::Documents, preset(&format!("d{i}"))).unwrap())
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_duplicate_supplied_id_is_replaced() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let mut first = preset("a");
        first.id = "7".to_string();
        let mut second = preset("b");
        second.id = "7".to_string();

        assert_eq!(store.save(Collection::Configurations, first).unwrap(), "7");
        assert_ne!(store.save(Collection::Configurations, second).unwrap(), "7");
    }

    #[test]
    fn test_collection_shapes_are_normalized() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let doc_as_config = Snapshot::document("x", vec!["u".into()], CardStyle::default());
        let id = store.save(Collection::Configurations, doc_as_config).unwrap();
        assert_eq!(store.load(Collection::Configurations, &id).unwrap().image_urls, None);

        let id = store.save(Collection::Documents, preset("y")).unwrap();
        assert_eq!(
            store.load(Collection::Documents, &id).unwrap().image_urls,
            Some(vec![String::new()])
        );
    }

    #[test]
    fn test_empty_url_list_is_rejected() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let empty = Snapshot::document("T", vec![], CardStyle::default());
        let err = store.save(Collection::Documents, empty).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::NoImageSlots)));
        assert!(store.list(Collection::Documents).is_empty());

        let urls = vec!["a.png".to_string(), String::new()];
        let doc = Snapshot::document("T", urls.clone(), CardStyle::default());
        let id = store.save(Collection::Documents, doc).unwrap();
        assert_eq!(store.load(Collection::Documents, &id).unwrap().image_urls, Some(urls));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        store.save(Collection::Documents, preset("keep")).unwrap();
        let before = store.list(Collection::Documents).to_vec();

        assert!(!store.delete(Collection::Documents, "missing").unwrap());
        assert_eq!(store.list(Collection::Documents), &before[..]);
    }

    #[test]
    fn test_collections_are_independent() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let mut doc = preset("doc");
        doc.id = "1".to_string();
        let mut conf = preset("conf");
        conf.id = "1".to_string();
        store.save(Collection::Documents, doc).unwrap();
        store.save(Collection::Configurations, conf).unwrap();

        assert!(store.delete(Collection::Documents, "1").unwrap());
        assert!(store.list(Collection::Documents).is_empty());
        assert_eq!(store.list(Collection::Configurations).len(), 1);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let store = SnapshotStore::open(MemoryMedium::new());
        let err = store.load(Collection::Documents, "nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut store = SnapshotStore::open(MemoryMedium::with_quota(40));
        let err = store
            .save(Collection::Configurations, preset("this title is far too long to fit"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(PersistenceError::Write { .. })));
        assert!(store.list(Collection::Configurations).is_empty());
    }

    #[test]
    fn test_corrupt_initial_value_uses_fallback() {
        let mut medium = MemoryMedium::new();
        medium.set("savedDocuments", "{not json").unwrap();
        let fallback = vec![preset("fallback")];

        let store = SnapshotStore::open_with_fallback(medium, fallback.clone(), Vec::new());
        assert_eq!(store.list(Collection::Documents), &fallback[..]);
    }

    #[test]
    fn test_corrupt_notification_keeps_last_good_value() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        store.save(Collection::Documents, preset("good")).unwrap();

        let changed = store.handle_event(&StorageEvent {
            key: "savedDocuments".to_string(),
            new_value: Some("[{".to_string()),
        });
        assert!(!changed);
        assert_eq!(store.list(Collection::Documents)[0].title, "good");
    }

    #[test]
    fn test_removed_key_resets_to_fallback() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        store.save(Collection::Configurations, preset("c")).unwrap();
        let changed = store.handle_event(&StorageEvent {
            key: "savedConfigurations".to_string(),
            new_value: None,
        });
        assert!(changed);
        assert!(store.list(Collection::Configurations).is_empty());
    }

    #[test]
    fn test_echoed_write_does_not_notify() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        store.save(Collection::Documents, preset("d")).unwrap();

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = store.subscribe(Rc::new(move |_: Collection, _: &[Snapshot]| {
            counter.set(counter.get() + 1)
        }));

        let echo = store.medium().get("savedDocuments").unwrap();
        let changed = store.handle_event(&StorageEvent {
            key: "savedDocuments".to_string(),
            new_value: echo,
        });
        assert!(!changed);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unrelated_key_is_ignored() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        assert!(!store.handle_event(&StorageEvent {
            key: "theme".to_string(),
            new_value: Some("dark".to_string()),
        }));
    }

    #[test]
    fn test_subscription_ends_on_drop() {
        let mut store = SnapshotStore::open(MemoryMedium::new());
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = store.subscribe(Rc::new(move |collection: Collection, items: &[Snapshot]| {
            assert_eq!(collection, Collection::Configurations);
            counter.set(counter.get() + items.len());
        }));

        store.save(Collection::Configurations, preset("one")).unwrap();
        assert_eq!(calls.get(), 1);

        drop(sub);
        store.save(Collection::Configurations, preset("two")).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
