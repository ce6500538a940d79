pub mod storage_item;

pub use storage_item::Entity as StorageItem;
