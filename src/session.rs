use crate::catalog::{Catalog, CatalogLoader};
use crate::error::{Result, ShortlistError};
use crate::favourites::{FavouritesCollection, FavouritesStore};
use crate::filter::{self, FilterCriteria};
use crate::models::{PropertyId, PropertyRecord};
use crate::storage::KeyValueStore;
use crate::transfer::{DropOutcome, DropTarget, Surface, TransferProtocol};
use tracing::{debug, error, info, warn};

pub const DEFAULT_FAVOURITES_KEY: &str = "favourites";
pub const DEFAULT_CRITERIA_KEY: &str = "filters";

/// State holder between a presentation shell and the core.
///
/// Owns the current catalog, criteria, results and favourites snapshots.
/// Each call runs to completion and returns the snapshot the shell should
/// re-render; persistence failures are logged, never fatal.
pub struct Session<S: KeyValueStore + Clone> {
    storage: S,
    criteria_key: String,
    catalog: Catalog,
    criteria: FilterCriteria,
    results: Vec<PropertyRecord>,
    favourites: FavouritesStore<S>,
    transfer: TransferProtocol,
}

impl<S: KeyValueStore + Clone> Session<S> {
    /// Open with the default storage keys
    pub fn open(storage: S) -> Self {
        Self::open_with_keys(storage, DEFAULT_FAVOURITES_KEY, DEFAULT_CRITERIA_KEY)
    }

    /// Restore favourites and the last submitted criteria. The catalog starts
    /// empty until [`Session::load_catalog`] resolves.
    pub fn open_with_keys(storage: S, favourites_key: &str, criteria_key: &str) -> Self {
        let favourites = FavouritesStore::load(storage.clone(), favourites_key);
        let criteria = restore_criteria(&storage, criteria_key);

        Self {
            storage,
            criteria_key: criteria_key.to_string(),
            catalog: Catalog::default(),
            criteria,
            results: Vec::new(),
            favourites,
            transfer: TransferProtocol::new(),
        }
    }

    /// Load the catalog and re-run the current criteria against it
    pub async fn load_catalog(&mut self, loader: &CatalogLoader) -> &[PropertyRecord] {
        let catalog = loader.load().await;
        self.set_catalog(catalog)
    }

    pub fn set_catalog(&mut self, catalog: Catalog) -> &[PropertyRecord] {
        self.catalog = catalog;
        self.results = filter::apply(self.catalog.records(), &self.criteria);
        &self.results
    }

    /// Submit a new criteria snapshot
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> &[PropertyRecord] {
        self.results = filter::apply(self.catalog.records(), &criteria);
        info!(
            "🔎 {} of {} properties match",
            self.results.len(),
            self.catalog.len()
        );

        match serde_json::to_string(&criteria) {
            Ok(snapshot) => {
                if let Err(e) = self.storage.write(&self.criteria_key, &snapshot) {
                    warn!("Could not persist search criteria: {}", e);
                }
            }
            Err(e) => warn!("Could not serialize search criteria: {}", e),
        }

        self.criteria = criteria;
        &self.results
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn results(&self) -> &[PropertyRecord] {
        &self.results
    }

    pub fn favourites(&self) -> &FavouritesCollection {
        self.favourites.collection()
    }

    pub fn transfer(&self) -> &TransferProtocol {
        &self.transfer
    }

    /// Look up a listing in the catalog, falling back to the favourites
    /// snapshot for records that are no longer listed.
    pub fn property(&self, id: &PropertyId) -> Option<&PropertyRecord> {
        self.catalog
            .find(id)
            .or_else(|| self.favourites.collection().get(id))
    }

    /// Add a catalog listing by identifier
    pub fn add_favourite(&mut self, id: &PropertyId) -> Result<&FavouritesCollection> {
        let record = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| ShortlistError::UnknownProperty(id.to_string()))?;
        Ok(self.add_favourite_record(record))
    }

    pub fn add_favourite_record(&mut self, record: PropertyRecord) -> &FavouritesCollection {
        if let Err(e) = self.favourites.add(record) {
            error!("❌ Could not save favourites: {}", e);
        }
        self.favourites.collection()
    }

    pub fn remove_favourite(&mut self, id: &PropertyId) -> &FavouritesCollection {
        if let Err(e) = self.favourites.remove(id) {
            error!("❌ Could not save favourites: {}", e);
        }
        self.favourites.collection()
    }

    pub fn clear_favourites(&mut self) -> &FavouritesCollection {
        if let Err(e) = self.favourites.clear() {
            error!("❌ Could not save favourites: {}", e);
        }
        self.favourites.collection()
    }

    /// Start dragging the record with `id` from `origin`
    pub fn on_pick_up(&mut self, id: &PropertyId, origin: Surface) -> Result<()> {
        let record = match origin {
            Surface::Results => self.catalog.find(id),
            Surface::Favourites => self.favourites.collection().get(id),
        }
        .cloned()
        .ok_or_else(|| ShortlistError::UnknownProperty(id.to_string()))?;

        self.transfer.pick_up(&record, origin)
    }

    pub fn on_hover(&mut self, target: DropTarget) {
        self.transfer.hover(target);
    }

    pub fn on_drop(&mut self, target: DropTarget) -> DropOutcome {
        let outcome = self.transfer.drop_on(target, &mut self.favourites);
        debug!("Drop finished: {:?}", outcome);
        outcome
    }

    /// Drop carrying its own raw drag data
    pub fn on_drop_raw(
        &mut self,
        raw: Option<&str>,
        origin: Surface,
        target: DropTarget,
    ) -> DropOutcome {
        TransferProtocol::drop_raw(raw, origin, target, &mut self.favourites)
    }

    pub fn on_cancel(&mut self) {
        self.transfer.cancel();
    }
}

fn restore_criteria<S: KeyValueStore>(storage: &S, key: &str) -> FilterCriteria {
    match storage.read(key) {
        Ok(Some(content)) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable search criteria '{}': {}", key, e);
            FilterCriteria::default()
        }),
        Ok(None) => FilterCriteria::default(),
        Err(e) => {
            warn!("Could not read search criteria '{}': {}", key, e);
            FilterCriteria::default()
        }
    }
}
