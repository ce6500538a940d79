//! Repository layer for database operations.
//!
//! Repositories keep entities as pure data models while providing reusable
//! database access methods.

pub mod storage_item;

pub use storage_item::StorageItemRepository;
