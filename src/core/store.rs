use crate::adapters::codec::{codec_for, StorageFormat};
use crate::domain::model::{Catalog, CatalogEntry};
use crate::domain::ports::{CatalogCodec, Storage};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded(usize),
    /// The file parsed but holds no entries.
    Empty,
    /// Missing file, decode error or I/O fault; the catalog is left empty.
    Failed,
}

/// Result of re-reading the file right after a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Mismatch,
}

/// Owns the in-memory catalog and keeps it in step with one backing file.
pub struct CatalogStore<S: Storage> {
    storage: S,
    path: String,
    codec: Box<dyn CatalogCodec>,
    catalog: Catalog,
}

impl<S: Storage> CatalogStore<S> {
    pub fn new(storage: S, path: impl Into<String>, format: StorageFormat) -> Self {
        Self {
            storage,
            path: path.into(),
            codec: codec_for(format),
            catalog: Catalog::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn format(&self) -> StorageFormat {
        self.codec.format()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.catalog.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut CatalogEntry> {
        self.catalog.get_mut(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.catalog.contains(title)
    }

    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.catalog.insert(entry)
    }

    pub fn remove(&mut self, title: &str) -> Option<CatalogEntry> {
        self.catalog.remove(title)
    }

    fn read_catalog(&self) -> Result<Catalog> {
        let data = self.storage.read_file(&self.path)?;
        self.codec.decode(&data)
    }

    /// Replaces the in-memory catalog with the file contents. All or
    /// nothing: any failure leaves the catalog empty.
    pub fn load(&mut self) -> LoadStatus {
        tracing::info!("Loading {} ({}) into memory", self.path, self.format());
        self.catalog.clear();

        match self.read_catalog() {
            Ok(catalog) if catalog.is_empty() => {
                tracing::warn!("Database file exists but is empty: {}", self.path);
                LoadStatus::Empty
            }
            Ok(catalog) => {
                self.catalog = catalog;
                tracing::info!("Database loaded into memory: {} movies", self.catalog.len());
                LoadStatus::Loaded(self.catalog.len())
            }
            Err(e) => {
                tracing::error!("Failed to load database file {}: {}", self.path, e);
                LoadStatus::Failed
            }
        }
    }

    /// Rewrites the whole file, then re-reads it to confirm it matches
    /// memory. A mismatch is logged and reported, never raised.
    pub fn save(&self) -> Result<SyncStatus> {
        tracing::debug!("Saving {} movies to {}", self.catalog.len(), self.path);
        let data = self.codec.encode(&self.catalog)?;
        self.storage.write_file(&self.path, &data)?;
        tracing::info!("Movie DB saved to file: {}", self.path);

        match self.read_catalog() {
            Ok(on_disk) if on_disk == self.catalog => {
                tracing::debug!("Save verified: file is synced with memory");
                Ok(SyncStatus::Synced)
            }
            Ok(on_disk) => {
                tracing::error!(
                    "Save verification failed: {} holds {} movies, memory holds {}",
                    self.path,
                    on_disk.len(),
                    self.catalog.len()
                );
                Ok(SyncStatus::Mismatch)
            }
            Err(e) => {
                tracing::error!("Save verification failed: could not re-read {}: {}", self.path, e);
                Ok(SyncStatus::Mismatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CatalogError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            storage
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                CatalogError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_load_missing_file_fails_empty() {
        let mut store = CatalogStore::new(MockStorage::default(), "movies.json", StorageFormat::Json);

        assert_eq!(store.load(), LoadStatus::Failed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_empty_object_is_not_failure() {
        let storage = MockStorage::with_file("movies.json", b"{}");
        let mut store = CatalogStore::new(storage, "movies.json", StorageFormat::Json);

        assert_eq!(store.load(), LoadStatus::Empty);
    }

    #[test]
    fn test_failed_load_discards_previous_state() {
        let storage = MockStorage::with_file("movies.json", br#"{"Alien": {"date": 1979, "rating": 8.5}}"#);
        let mut store = CatalogStore::new(storage.clone(), "movies.json", StorageFormat::Json);
        assert_eq!(store.load(), LoadStatus::Loaded(1));

        storage
            .files
            .lock()
            .unwrap()
            .insert("movies.json".to_string(), b"{\"Alien\": ".to_vec());

        assert_eq!(store.load(), LoadStatus::Failed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_verify() {
        let mut store = CatalogStore::new(MockStorage::default(), "movies.csv", StorageFormat::Csv);
        store.insert(CatalogEntry::new("Heat", 1995, 8.3));

        assert_eq!(store.save().unwrap(), SyncStatus::Synced);

        let mut reloaded = CatalogStore::new(store.storage().clone(), "movies.csv", StorageFormat::Csv);
        assert_eq!(reloaded.load(), LoadStatus::Loaded(1));
        assert_eq!(reloaded.catalog(), store.catalog());
    }
}
