pub mod service;
pub mod session;
pub mod store;

pub use crate::domain::model::{Catalog, CatalogEntry};
pub use crate::domain::ports::{CatalogCodec, MetadataLookup, Storage};
pub use crate::utils::error::Result;
