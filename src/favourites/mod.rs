use crate::error::Result;
use crate::models::{PropertyId, PropertyRecord};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Ordered shortlist of listings, unique by identifier.
///
/// Values are immutable snapshots: every transition returns a new collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavouritesCollection {
    records: Vec<PropertyRecord>,
}

impl FavouritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first occurrence of each identifier
    pub fn from_records(records: impl IntoIterator<Item = PropertyRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::new(), |collection, record| collection.with_added(record))
    }

    /// Append `record` unless its identifier is already present
    pub fn with_added(&self, record: PropertyRecord) -> Self {
        if self.contains(&record.id) {
            return self.clone();
        }
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    pub fn without(&self, id: &PropertyId) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|record| &record.id != id)
                .cloned()
                .collect(),
        }
    }

    pub fn contains(&self, id: &PropertyId) -> bool {
        self.records.iter().any(|record| &record.id == id)
    }

    pub fn get(&self, id: &PropertyId) -> Option<&PropertyRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owns the canonical favourites collection and mirrors it to storage.
///
/// Every mutation writes the complete next snapshot before it becomes the
/// in-memory state, so a failed write leaves both sides on the previous value.
pub struct FavouritesStore<S: KeyValueStore> {
    storage: S,
    key: String,
    current: FavouritesCollection,
}

impl<S: KeyValueStore> FavouritesStore<S> {
    /// Restore from storage. Missing or unreadable snapshots start empty.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match storage.read(&key) {
            Ok(Some(content)) => match serde_json::from_str::<FavouritesCollection>(&content) {
                // Re-run validation and dedup in case the snapshot was edited by hand.
                Ok(collection) => {
                    FavouritesCollection::from_records(collection.records.into_iter().filter(
                        |record| match record.validate() {
                            Ok(()) => true,
                            Err(e) => {
                                warn!("Dropping stored favourite: {}", e);
                                false
                            }
                        },
                    ))
                }
                Err(e) => {
                    warn!("Ignoring unreadable favourites snapshot '{}': {}", key, e);
                    FavouritesCollection::new()
                }
            },
            Ok(None) => {
                debug!("No favourites snapshot stored under '{}'", key);
                FavouritesCollection::new()
            }
            Err(e) => {
                warn!("Could not read favourites snapshot '{}': {}", key, e);
                FavouritesCollection::new()
            }
        };

        debug!("Restored {} favourites", current.len());
        Self {
            storage,
            key,
            current,
        }
    }

    pub fn collection(&self) -> &FavouritesCollection {
        &self.current
    }

    pub fn add(&mut self, record: PropertyRecord) -> Result<&FavouritesCollection> {
        let id = record.id.clone();
        let next = self.current.with_added(record);
        if next.len() > self.current.len() {
            info!("⭐ Added {} to favourites", id);
        } else {
            debug!("{} is already a favourite", id);
        }
        self.commit(next)
    }

    pub fn remove(&mut self, id: &PropertyId) -> Result<&FavouritesCollection> {
        let next = self.current.without(id);
        if next.len() < self.current.len() {
            info!("Removed {} from favourites", id);
        } else {
            debug!("{} was not a favourite", id);
        }
        self.commit(next)
    }

    pub fn clear(&mut self) -> Result<&FavouritesCollection> {
        info!("Cleared {} favourites", self.current.len());
        self.commit(FavouritesCollection::new())
    }

    fn commit(&mut self, next: FavouritesCollection) -> Result<&FavouritesCollection> {
        let snapshot = serde_json::to_string(&next)?;
        self.storage.write(&self.key, &snapshot)?;
        self.current = next;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShortlistError;
    use crate::models::{AddedDate, Category};
    use crate::storage::MemoryStore;

    const KEY: &str = "favourites";

    fn record(id: i64) -> PropertyRecord {
        PropertyRecord::new(
            id,
            Category::House,
            100_000.0 * id as f64,
            2,
            "BR1",
            AddedDate::new(1, "Jan", 2025),
        )
    }

    fn ids(collection: &FavouritesCollection) -> Vec<&str> {
        collection.iter().map(|r| r.id.as_str()).collect()
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ShortlistError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

    }

    #[test]
    fn test_add_then_remove() {
        let storage = MemoryStore::new();
        let mut store = FavouritesStore::load(&storage, KEY);

        assert_eq!(ids(store.add(record(1)).unwrap()), vec!["1"]);
        assert!(store.remove(&PropertyId::new("1")).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let storage = MemoryStore::new();
        let mut store = FavouritesStore::load(&storage, KEY);

        store.add(record(1)).unwrap();
        store.add(record(1)).unwrap();
        assert_eq!(store.collection().len(), 1);
        assert_eq!(store.collection().records()[0], record(1));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let storage = MemoryStore::new();
        let mut store = FavouritesStore::load(&storage, KEY);

        for id in [3, 1, 2] {
            store.add(record(id)).unwrap();
        }
        assert_eq!(ids(store.collection()), vec!["3", "1", "2"]);

        store.remove(&PropertyId::new("1")).unwrap();
        assert_eq!(ids(store.collection()), vec!["3", "2"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage = MemoryStore::new();
        let mut store = FavouritesStore::load(&storage, KEY);
        store.add(record(1)).unwrap();

        let before = store.collection().clone();
        store.remove(&PropertyId::new("missing")).unwrap();
        assert_eq!(store.collection(), &before);
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let storage = MemoryStore::new();
        let mut store = FavouritesStore::load(&storage, KEY);

        store.add(record(1)).unwrap();
        store.add(record(2)).unwrap();
        assert_eq!(
            FavouritesStore::load(&storage, KEY).collection(),
            store.collection()
        );

        store.remove(&PropertyId::new("1")).unwrap();
        assert_eq!(
            FavouritesStore::load(&storage, KEY).collection(),
            store.collection()
        );

        store.clear().unwrap();
        assert!(FavouritesStore::load(&storage, KEY).collection().is_empty());
        assert_eq!(storage.read(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let storage = MemoryStore::new();
        storage.write(KEY, "{not json").unwrap();
        assert!(FavouritesStore::load(&storage, KEY).collection().is_empty());

        storage.write(KEY, r#"[{"id": 1}]"#).unwrap();
        assert!(FavouritesStore::load(&storage, KEY).collection().is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_snapshot_are_collapsed() {
        let storage = MemoryStore::new();
        let snapshot = serde_json::to_string(&vec![record(1), record(1), record(2)]).unwrap();
        storage.write(KEY, &snapshot).unwrap();

        let store = FavouritesStore::load(&storage, KEY);
        assert_eq!(ids(store.collection()), vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_records_in_snapshot_are_dropped() {
        let storage = MemoryStore::new();
        let mut broken = record(2);
        broken.price = -5.0;
        let snapshot = serde_json::to_string(&vec![record(1), broken, record(3)]).unwrap();
        storage.write(KEY, &snapshot).unwrap();

        let store = FavouritesStore::load(&storage, KEY);
        assert_eq!(ids(store.collection()), vec!["1", "3"]);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut store = FavouritesStore::load(ReadOnlyStore, KEY);
        assert!(store.add(record(1)).is_err());
        assert!(store.collection().is_empty());
    }
}
