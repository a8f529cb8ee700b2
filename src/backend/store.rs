#[cfg(not(target_arch = "wasm32"))]
use rusqlite::{params, Connection};
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::backend::error::{Result, StorageError};
use crate::backend::types::{StorageFile, StorageStats, Transaction};

pub const FILES_KEY: &str = "storage-files";
pub const STATS_KEY: &str = "storage-stats";
pub const TRANSACTIONS_KEY: &str = "transactions";

/// String-keyed JSON store. SQLite on native targets; on wasm a map that the
/// UI layer mirrors into the browser's localStorage.
#[derive(Clone)]
pub struct Store {
    #[cfg(not(target_arch = "wasm32"))]
    conn: Arc<Mutex<Connection>>,
    #[cfg(target_arch = "wasm32")]
    entries: Arc<Mutex<HashMap<String, String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| StorageError::Store("store lock poisoned".into()))
}

impl Store {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new<P: AsRef<Path>>(_path: P) -> Result<Self> {
        Self::new_in_memory()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self { entries: Arc::new(Mutex::new(HashMap::new())) })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let conn = lock(&self.conn)?;
            let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
            let mut rows = stmt.query(params![key])?;
            if let Some(row) = rows.next()? {
                Ok(Some(row.get(0)?))
            } else {
                Ok(None)
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let entries = lock(&self.entries)?;
            Ok(entries.get(key).cloned())
        }
    }

    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.put_many(&[(key, value.to_string())])
    }

    /// Writes all pairs or none of them.
    pub fn put_many(&self, pairs: &[(&str, String)]) -> Result<()> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut conn = lock(&self.conn)?;
            let tx = conn.transaction()?;
            for (key, value) in pairs {
                tx.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )?;
            }
            tx.commit()?;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let mut entries = lock(&self.entries)?;
            for (key, value) in pairs {
                entries.insert(key.to_string(), value.clone());
            }
        }

        Ok(())
    }

    /// Returns the stored value, or `default` when the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.get_raw(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(default),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }

    /// Applies `f` to the current (or default) value and stores the result.
    /// Nothing is written when `f` fails.
    pub fn update<T, F>(&self, key: &str, default: T, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> Result<T>,
    {
        let next = f(self.get(key, default)?)?;
        self.set(key, &next)?;
        Ok(next)
    }
}

/// Defaults handed out for keys that have never been written.
#[derive(Debug, Clone)]
pub struct StateDefaults {
    pub stats: StorageStats,
}

impl StateDefaults {
    pub fn new(network_nodes: u64) -> Self {
        Self { stats: StorageStats::empty(network_nodes) }
    }
}

/// Everything the dashboard persists, read as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub files: Vec<StorageFile>,
    pub stats: StorageStats,
    pub transactions: Vec<Transaction>,
}

/// Typed view over [`Store`] for the three dashboard records.
#[derive(Clone)]
pub struct StateStore {
    store: Store,
    defaults: StateDefaults,
}

impl StateStore {
    pub fn new(store: Store, defaults: StateDefaults) -> Self {
        Self { store, defaults }
    }

    pub fn files(&self) -> Result<Vec<StorageFile>> {
        self.store.get(FILES_KEY, Vec::new())
    }

    pub fn stats(&self) -> Result<StorageStats> {
        self.store.get(STATS_KEY, self.defaults.stats.clone())
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.store.get(TRANSACTIONS_KEY, Vec::new())
    }

    pub fn update_stats<F>(&self, f: F) -> Result<StorageStats>
    where
        F: FnOnce(StorageStats) -> Result<StorageStats>,
    {
        self.store.update(STATS_KEY, self.defaults.stats.clone(), f)
    }

    #[cfg(test)]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            files: self.files()?,
            stats: self.stats()?,
            transactions: self.transactions()?,
        })
    }

    /// Replaces stats and prepends a transaction in one write.
    pub fn commit_stats_with_transaction(&self, stats: &StorageStats, tx: Transaction) -> Result<()> {
        let mut txs = self.transactions()?;
        txs.insert(0, tx);
        self.store.put_many(&[
            (STATS_KEY, serde_json::to_string(stats)?),
            (TRANSACTIONS_KEY, serde_json::to_string(&txs)?),
        ])
    }

    /// Appends a file, replaces stats and prepends a transaction in one write.
    pub fn commit_upload(&self, file: StorageFile, stats: &StorageStats, tx: Transaction) -> Result<()> {
        let mut files = self.files()?;
        files.push(file);
        let mut txs = self.transactions()?;
        txs.insert(0, tx);
        self.store.put_many(&[
            (FILES_KEY, serde_json::to_string(&files)?),
            (STATS_KEY, serde_json::to_string(stats)?),
            (TRANSACTIONS_KEY, serde_json::to_string(&txs)?),
        ])
    }
}
