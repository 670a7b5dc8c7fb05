//! Named snapshots of editor state, persisted to a durable medium
//!
//! Documents carry image URLs; configurations are reusable style presets.
//! Both collections are stored as JSON arrays under their own key and kept
//! in step with other sessions through change notifications.

pub mod error;
pub mod medium;
pub mod store;
pub mod types;

pub use error::{PersistenceError, StoreError};
pub use medium::{DurableMedium, FileMedium, MemoryMedium, StorageEvent};
pub use store::{SnapshotObserver, SnapshotStore, Subscription};
pub use types::{CardStyle, Collection, Snapshot};
