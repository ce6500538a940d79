//! Local storage module for the client-side cache
//!
//! This module provides persistence using SeaORM over SQLite for:
//! - Raw key/value items (the `localStorage` equivalent)
//! - TTL-checked list caches
//! - The signed-in session

pub mod cache;
pub mod db;
pub mod session;

pub use cache::PersistentCache;
pub use db::LocalStorage;
pub use session::{Session, SessionUser};
