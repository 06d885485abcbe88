use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    config::AppConfig,
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError, UserStorage},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn KeyValueStore>,
    sessions: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
    writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Demo catalog over the store selected by `config.storage_dir`.
    pub fn from_config(config: AppConfig) -> Result<Self, StorageError> {
        let store: Arc<dyn KeyValueStore> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(config, Catalog::demo(), store))
    }

    pub fn user_storage(&self, owner: &str) -> UserStorage {
        UserStorage::new(Arc::clone(&self.store), owner)
    }

    /// Serializes load-mutate-save sequences so there is a single writer.
    pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    /// Registers a session until `expires_at`. Sessions that already expired
    /// are dropped on the way in.
    pub async fn open_session(&self, session_id: Uuid, expires_at: DateTime<Utc>) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, exp| *exp > now);
        if expires_at > now {
            sessions.insert(session_id, expires_at);
        }
    }

    pub async fn close_session(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    pub async fn is_session_active(&self, session_id: Uuid) -> bool {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&session_id) {
                None => return false,
                Some(exp) if *exp > now => return true,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(&session_id);
        false
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
