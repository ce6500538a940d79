use anyhow::{Context, Result};
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::entities::storage_item;
use crate::repositories::StorageItemRepository;
use crate::utils::clock::{system_clock, SharedClock};

const CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Local key/value storage shared by every context of one client
pub struct LocalStorage {
    pub conn: DatabaseConnection,
    clock: SharedClock,
}

impl LocalStorage {
    /// Open an in-memory database (lost when the storage is dropped)
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Open or create a database file
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
        }
        Self::connect(&format!("sqlite://{}?mode=rwc", path.display())).await
    }

    /// Open the storage described by the `[cache]` section
    pub async fn from_config(config: &Config) -> Result<Self> {
        if config.cache.in_memory {
            return Self::in_memory().await;
        }
        let path = match &config.cache.database_path {
            Some(path) => path.clone(),
            None => Config::get_default_database_path()?,
        };
        info!("💾 Opening cache database at {}", path.display());
        Self::open(path).await
    }

    async fn connect(url: &str) -> Result<Self> {
        // A single long-lived connection keeps an in-memory database alive and shared
        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(CONNECTION_LIFETIME)
            .max_lifetime(CONNECTION_LIFETIME)
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {}", url))?;

        let storage = Self {
            conn,
            clock: system_clock(),
        };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Replace the clock used for `updated_at` stamps and TTL checks
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> SharedClock {
        self.clock.clone()
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut create = schema.create_table_from_entity(storage_item::Entity);
        create.if_not_exists();
        self.conn.execute(backend.build(&create)).await?;

        Ok(())
    }

    /// Read a raw item
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(StorageItemRepository::get(&self.conn, key).await?.map(|item| item.value))
    }

    /// Write a raw item
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        StorageItemRepository::put(&self.conn, key, value, self.clock.now_millis()).await
    }

    /// Remove a raw item, returning whether it existed
    pub async fn remove_item(&self, key: &str) -> Result<bool> {
        StorageItemRepository::delete(&self.conn, key).await
    }

    /// Keys starting with `prefix`, in key order
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        StorageItemRepository::keys_with_prefix(&self.conn, prefix).await
    }

    /// Clear all data from the database
    pub async fn clear_all_data(&self) -> Result<()> {
        StorageItemRepository::clear(&self.conn).await?;
        Ok(())
    }
}
