//! Key-value persistence for per-user storefront state.
//!
//! Values are JSON text stored under `user:<email>:<name>` keys. A value that
//! no longer parses is logged and treated as missing, so a corrupt entry
//! resets that piece of state instead of failing every request.

use std::{
    collections::HashMap,
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    cart::Cart, favorites::Favorites, history::PurchaseHistory, models::Order,
    notifications::NotificationFeed,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(byte as char);
            } else {
                let _ = write!(name, "_{byte:02x}");
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Typed view of one user's keys.
///
/// Store calls run on the blocking pool, so a slow backend never stalls the
/// async workers.
#[derive(Clone)]
pub struct UserStorage {
    store: Arc<dyn KeyValueStore>,
    owner: String,
}

impl UserStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, owner: impl Into<String>) -> Self {
        Self {
            store,
            owner: owner.into(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("user:{}:{}", self.owner, name)
    }

    async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let key = self.key(name);
        let store = Arc::clone(&self.store);
        let lookup = key.clone();
        let Some(raw) = tokio::task::spawn_blocking(move || store.get(&lookup)).await?? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "discarding unreadable stored value");
                Ok(None)
            }
        }
    }

    async fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        let key = self.key(name);
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.set(&key, raw)).await?
    }

    pub async fn load_cart(&self) -> Result<Cart, StorageError> {
        Ok(self.load("cart").await?.unwrap_or_default())
    }

    pub async fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        self.save("cart", cart).await
    }

    pub async fn load_favorites(&self) -> Result<Favorites, StorageError> {
        Ok(self.load("favorites").await?.unwrap_or_default())
    }

    pub async fn save_favorites(&self, favorites: &Favorites) -> Result<(), StorageError> {
        self.save("favorites", favorites).await
    }

    /// Loads the feed, seeding and storing the sample feed when nothing is
    /// stored yet and `seed` is set.
    pub async fn load_notifications(
        &self,
        seed: bool,
        now: DateTime<Utc>,
    ) -> Result<NotificationFeed, StorageError> {
        match self.load("notifications").await? {
            Some(feed) => Ok(feed),
            None if seed => {
                let feed = NotificationFeed::sample(now);
                self.save_notifications(&feed).await?;
                Ok(feed)
            }
            None => Ok(NotificationFeed::default()),
        }
    }

    pub async fn save_notifications(&self, feed: &NotificationFeed) -> Result<(), StorageError> {
        self.save("notifications", feed).await
    }

    pub async fn load_history(&self, seed: bool) -> Result<PurchaseHistory, StorageError> {
        match self.load("orders").await? {
            Some(history) => Ok(history),
            None if seed => {
                let history = PurchaseHistory::sample();
                self.save_history(&history).await?;
                Ok(history)
            }
            None => Ok(PurchaseHistory::default()),
        }
    }

    pub async fn save_history(&self, history: &PurchaseHistory) -> Result<(), StorageError> {
        self.save("orders", history).await
    }

    pub async fn load_confirmation(&self) -> Result<Option<Order>, StorageError> {
        self.load("confirmation").await
    }

    pub async fn save_confirmation(&self, order: &Order) -> Result<(), StorageError> {
        self.save("confirmation", order).await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{catalog::Catalog, notifications::NotificationFeed};

    fn memory() -> (Arc<MemoryStore>, Arc<dyn KeyValueStore>) {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn KeyValueStore> = store.clone();
        (store, shared)
    }

    #[tokio::test]
    async fn cart_round_trips_through_memory_store() {
        let (store, shared) = memory();
        let storage = UserStorage::new(shared, "ana@example.com");
        assert!(storage.load_cart().await.unwrap().is_empty());

        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(catalog.get(3).unwrap(), 2);
        storage.save_cart(&cart).await.unwrap();

        assert_eq!(storage.load_cart().await.unwrap(), cart);
        let raw = store.get("user:ana@example.com:cart").unwrap().unwrap();
        assert_eq!(raw, r#"[{"productId":3,"quantity":2}]"#);
    }

    #[tokio::test]
    async fn users_do_not_share_state() {
        let (_, shared) = memory();
        let mut favs = Favorites::default();
        favs.add(1);
        UserStorage::new(shared.clone(), "a@x.io")
            .save_favorites(&favs)
            .await
            .unwrap();
        let other = UserStorage::new(shared, "b@x.io").load_favorites().await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_missing() {
        let (store, shared) = memory();
        store.set("user:a@x.io:favorites", "{not json".into()).unwrap();
        let favs = UserStorage::new(shared, "a@x.io").load_favorites().await.unwrap();
        assert!(favs.is_empty());
    }

    #[tokio::test]
    async fn seeded_feed_is_persisted_once() {
        let (_, shared) = memory();
        let storage = UserStorage::new(shared.clone(), "a@x.io");
        let first = storage.load_notifications(true, Utc::now()).await.unwrap();
        let second = storage.load_notifications(true, Utc::now()).await.unwrap();
        assert_eq!(first, second);

        let other = UserStorage::new(shared, "b@x.io");
        assert_eq!(
            other.load_notifications(false, Utc::now()).await.unwrap(),
            NotificationFeed::default()
        );
    }

    #[tokio::test]
    async fn file_backed_user_storage_reads_back_history() {
        let dir = std::env::temp_dir().join(format!("storefront-user-{}", Uuid::new_v4()));
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&dir).unwrap());
        let storage = UserStorage::new(store, "a@x.io");

        let seeded = storage.load_history(true).await.unwrap();
        assert_eq!(storage.load_history(false).await.unwrap(), seeded);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_store_persists_and_removes() {
        let dir = std::env::temp_dir().join(format!("storefront-store-{}", Uuid::new_v4()));
        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("user:a@x.io:cart").unwrap(), None);

        store.set("user:a@x.io:cart", "[]".into()).unwrap();
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("user:a@x.io:cart").unwrap().as_deref(), Some("[]"));

        reopened.remove("user:a@x.io:cart").unwrap();
        reopened.remove("user:a@x.io:cart").unwrap();
        assert_eq!(store.get("user:a@x.io:cart").unwrap(), None);

        fs::remove_dir_all(&dir).unwrap();
    }
}
