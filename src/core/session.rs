use crate::core::service::CatalogService;
use crate::core::store::{LoadStatus, SyncStatus};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Scoped use of a catalog: loads on open and saves once more on every
/// exit path. `close` reports the final save; dropping the session without
/// closing it (early return, panic unwind) still saves and logs the outcome.
pub struct CatalogSession<S: Storage> {
    service: CatalogService<S>,
    load_status: LoadStatus,
    closed: bool,
}

impl<S: Storage> CatalogSession<S> {
    pub fn open(mut service: CatalogService<S>) -> Self {
        let load_status = service.load();
        tracing::info!("Catalog session started ({:?})", load_status);
        Self {
            service,
            load_status,
            closed: false,
        }
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn service(&self) -> &CatalogService<S> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut CatalogService<S> {
        &mut self.service
    }

    /// An unreadable file that nobody has added to since is left alone
    /// rather than replaced by an empty catalog.
    fn final_save(&self) -> Option<Result<SyncStatus>> {
        if self.load_status == LoadStatus::Failed && self.service.store().is_empty() {
            tracing::warn!(
                "Skipping final save: {} could not be loaded and nothing was added",
                self.service.store().path()
            );
            return None;
        }
        Some(self.service.save())
    }

    pub fn close(mut self) -> Option<Result<SyncStatus>> {
        self.closed = true;
        let outcome = self.final_save();
        tracing::info!("Catalog session closed, DB saved to: {}", self.service.store().path());
        outcome
    }
}

impl<S: Storage> Drop for CatalogSession<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if std::thread::panicking() {
            tracing::error!("Catalog session ended by a panic, saving before exit");
        }
        match self.final_save() {
            Some(Ok(status)) => tracing::info!("Final save on drop: {:?}", status),
            Some(Err(e)) => tracing::error!("Final save on drop failed: {}", e),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::codec::StorageFormat;
    use crate::core::store::CatalogStore;
    use crate::domain::model::NewEntry;
    use crate::utils::error::CatalogError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        writes: Arc<Mutex<usize>>,
    }

    impl Storage for CountingStorage {
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
            *self.writes.lock().unwrap() += 1;
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn service(storage: CountingStorage) -> CatalogService<CountingStorage> {
        CatalogService::new(CatalogStore::new(storage, "movies.json", StorageFormat::Json))
    }

    #[test]
    fn test_close_saves_on_clean_exit() {
        let storage = CountingStorage::default();
        storage
            .files
            .lock()
            .unwrap()
            .insert("movies.json".to_string(), b"{}".to_vec());

        let session = CatalogSession::open(service(storage.clone()));
        let outcome = session.close();

        assert!(matches!(outcome, Some(Ok(SyncStatus::Synced))));
        assert_eq!(*storage.writes.lock().unwrap(), 1);
    }

    #[test]
    fn test_drop_saves_when_not_closed() {
        let storage = CountingStorage::default();
        {
            let mut session = CatalogSession::open(service(storage.clone()));
            session
                .service_mut()
                .add_entry(NewEntry::new("Heat", 1995, 8.3))
                .unwrap();
        }

        // one save for the add, one on drop
        assert_eq!(*storage.writes.lock().unwrap(), 2);
    }

    #[test]
    fn test_drop_saves_during_panic() {
        let storage = CountingStorage::default();
        let cloned = storage.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let mut session = CatalogSession::open(service(cloned));
            session
                .service_mut()
                .add_entry(NewEntry::new("Heat", 1995, 8.3))
                .unwrap();
            panic!("menu crashed");
        }));

        assert!(result.is_err());
        assert_eq!(*storage.writes.lock().unwrap(), 2);
    }

    #[test]
    fn test_unreadable_file_is_not_clobbered() {
        let storage = CountingStorage::default();
        storage
            .files
            .lock()
            .unwrap()
            .insert("movies.json".to_string(), b"{broken".to_vec());

        let session = CatalogSession::open(service(storage.clone()));
        assert_eq!(session.load_status(), LoadStatus::Failed);
        assert!(session.close().is_none());

        assert_eq!(*storage.writes.lock().unwrap(), 0);
        assert_eq!(
            storage.files.lock().unwrap().get("movies.json").unwrap(),
            b"{broken"
        );
    }
}
