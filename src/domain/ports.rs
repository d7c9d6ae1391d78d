use crate::adapters::codec::StorageFormat;
use crate::domain::model::{Catalog, MovieMetadata};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw byte access to the backing file.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Must replace the whole file; a reader never observes a partial write.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// One on-disk encoding of a catalog.
pub trait CatalogCodec: Send + Sync {
    fn format(&self) -> StorageFormat;
    fn encode(&self, catalog: &Catalog) -> Result<Vec<u8>>;
    fn decode(&self, data: &[u8]) -> Result<Catalog>;
}

#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// `Ok(None)` when the service has no record for the title.
    async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>>;
}
