#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::codec::StorageFormat;
use crate::adapters::http::DEFAULT_LOOKUP_ENDPOINT;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_STORAGE_PATH: &str = "movies.json";
pub const DEFAULT_TEMPLATE_PATH: &str = "_static/index_template.html";
pub const DEFAULT_LOG_FILE: &str = "logs/app.log";
pub const DEFAULT_PAGE_TITLE: &str = "My Movie App";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LookupSettings {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Fully resolved settings: command line over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub storage_path: String,
    pub format: StorageFormat,
    pub lookup: Option<LookupSettings>,
    pub template: PathBuf,
    pub web_output: Option<PathBuf>,
    pub page_title: String,
    pub log_file: PathBuf,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl AppConfig {
    /// Splits the storage path into the directory handed to `LocalStorage`
    /// and the file name the store reads and writes.
    pub fn storage_location(&self) -> (String, String) {
        let path = Path::new(&self.storage_path);
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.storage_path.clone());
        (base, file)
    }

    pub fn lookup_endpoint_or_default(endpoint: Option<String>) -> String {
        endpoint.unwrap_or_else(|| DEFAULT_LOOKUP_ENDPOINT.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.path", &self.storage_path)?;
        validate_path("web.template", &self.template.to_string_lossy())?;
        validate_path("logging.file", &self.log_file.to_string_lossy())?;

        if let Some(lookup) = &self.lookup {
            validate_url("lookup.endpoint", &lookup.endpoint)?;
            validate_range("lookup.timeout_seconds", lookup.timeout_seconds, 1, 120)?;
        }
        Ok(())
    }
}
