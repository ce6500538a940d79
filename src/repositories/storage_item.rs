//! Storage item repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::storage_item;

/// Repository for key/value storage operations.
pub struct StorageItemRepository;

impl StorageItemRepository {
    /// Get a single item by key.
    pub async fn get<C>(conn: &C, key: &str) -> Result<Option<storage_item::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(storage_item::Entity::find_by_id(key.to_string()).one(conn).await?)
    }

    /// Insert or replace an item.
    pub async fn put<C>(conn: &C, key: &str, value: &str, updated_at: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let item = storage_item::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(updated_at),
        };

        storage_item::Entity::insert(item)
            .on_conflict(
                OnConflict::column(storage_item::Column::Key)
                    .update_columns([storage_item::Column::Value, storage_item::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    /// Delete an item by key. Returns whether a row was removed.
    pub async fn delete<C>(conn: &C, key: &str) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let result = storage_item::Entity::delete_by_id(key.to_string()).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// List keys starting with `prefix`, in key order.
    pub async fn keys_with_prefix<C>(conn: &C, prefix: &str) -> Result<Vec<String>>
    where
        C: ConnectionTrait,
    {
        let items = storage_item::Entity::find()
            .filter(storage_item::Column::Key.starts_with(prefix))
            .order_by_asc(storage_item::Column::Key)
            .all(conn)
            .await?;
        Ok(items.into_iter().map(|item| item.key).collect())
    }

    /// Delete every item.
    pub async fn clear<C>(conn: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = storage_item::Entity::delete_many().exec(conn).await?;
        Ok(result.rows_affected)
    }
}
