pub mod catalog;
pub mod config;
pub mod error;
pub mod favourites;
pub mod filter;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod transfer;

pub use catalog::{Catalog, CatalogLoader, CatalogSource};
pub use config::AppConfig;
pub use error::{Result, ShortlistError};
pub use favourites::{FavouritesCollection, FavouritesStore};
pub use filter::FilterCriteria;
pub use models::{AddedDate, Category, PropertyId, PropertyRecord};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transfer::{DropOutcome, DropTarget, Surface, TransferPayload, TransferProtocol};
