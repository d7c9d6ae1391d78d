pub mod csv;
pub mod json;

pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;

use crate::domain::ports::CatalogCodec;
use crate::utils::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    /// Infers the backend from the file extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| CatalogError::InvalidConfigValueError {
                field: "storage.path".to_string(),
                value: path.to_string(),
                reason: "File has no extension; pass --format json|csv".to_string(),
            })?;
        extension.parse()
    }
}

impl FromStr for StorageFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(StorageFormat::Json),
            "csv" => Ok(StorageFormat::Csv),
            other => Err(CatalogError::InvalidConfigValueError {
                field: "storage.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: json, csv".to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Json => write!(f, "json"),
            StorageFormat::Csv => write!(f, "csv"),
        }
    }
}

pub fn codec_for(format: StorageFormat) -> Box<dyn CatalogCodec> {
    match format {
        StorageFormat::Json => Box::new(JsonCodec),
        StorageFormat::Csv => Box::new(CsvCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(StorageFormat::from_path("movies.json").unwrap(), StorageFormat::Json);
        assert_eq!(StorageFormat::from_path("data/movies.CSV").unwrap(), StorageFormat::Csv);
        assert!(StorageFormat::from_path("movies.txt").is_err());
        assert!(StorageFormat::from_path("movies").is_err());
    }

    #[test]
    fn test_codec_for_selects_backend() {
        assert_eq!(codec_for(StorageFormat::Json).format(), StorageFormat::Json);
        assert_eq!(codec_for(StorageFormat::Csv).format(), StorageFormat::Csv);
    }
}
