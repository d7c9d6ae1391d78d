pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::codec::StorageFormat;
pub use crate::adapters::http::OmdbClient;
pub use crate::adapters::storage::LocalStorage;
pub use crate::config::AppConfig;
pub use crate::core::service::CatalogService;
pub use crate::core::session::CatalogSession;
pub use crate::core::store::{CatalogStore, LoadStatus, SyncStatus};
pub use crate::domain::model::{Catalog, CatalogEntry};
pub use crate::utils::error::{CatalogError, Result};
