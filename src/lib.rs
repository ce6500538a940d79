//! Course4Me - client data layer for the Course4Me course review platform
//!
//! This library keeps a local view of courses, lecturers, departments,
//! reviews, followed items and contact requests consistent with the
//! Course4Me REST API, across every context that shares the same storage.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`api`] - REST client and wire models
//! * [`config`] - Application configuration management
//! * [`storage`] - Persistent key/value storage, TTL cache and session
//! * [`sync`] - Entity lists, invalidation bus and shared store
//! * [`stats`] - Rating aggregation
//! * [`utils`] - Clock and date helpers

/// REST API client and data models
pub mod api;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Rating averages over reviews
pub mod stats;

/// Local storage layer for caching API data
pub mod storage;

/// Keeping local lists consistent with the server and with other contexts
pub mod sync;

/// Utility functions for time handling and other helpers
pub mod utils;
