use crate::adapters::codec::StorageFormat;
use crate::utils::error::{CatalogError, Result};
use crate::utils::logger::LogFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<StorageConfig>,
    pub lookup: Option<LookupConfig>,
    pub web: Option<WebConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
    pub format: Option<StorageFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebConfig {
    pub template: Option<String>,
    pub output: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables
    /// are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage.as_ref()?.path.as_deref()
    }

    pub fn storage_format(&self) -> Option<StorageFormat> {
        self.storage.as_ref()?.format
    }

    /// An api key whose `${VAR}` was never substituted counts as missing.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.lookup.as_ref()?.api_key.as_deref()?;
        if key.is_empty() || key.contains("${") {
            tracing::warn!("Lookup api_key is empty or unresolved, metadata lookup disabled");
            return None;
        }
        Some(key)
    }

    pub fn lookup_endpoint(&self) -> Option<&str> {
        self.lookup.as_ref()?.endpoint.as_deref()
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.lookup.as_ref()?.timeout_seconds
    }

    pub fn template(&self) -> Option<&str> {
        self.web.as_ref()?.template.as_deref()
    }

    pub fn web_output(&self) -> Option<&str> {
        self.web.as_ref()?.output.as_deref()
    }

    pub fn page_title(&self) -> Option<&str> {
        self.web.as_ref()?.title.as_deref()
    }

    pub fn log_file(&self) -> Option<&str> {
        self.logging.as_ref()?.file.as_deref()
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref()?.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
path = "data/movies.csv"
format = "csv"

[lookup]
endpoint = "https://omdb.example.com/"
api_key = "abc123"
timeout_seconds = 5

[web]
template = "_static/index_template.html"
title = "Friday Night"

[logging]
file = "logs/catalog.log"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage_path(), Some("data/movies.csv"));
        assert_eq!(config.storage_format(), Some(StorageFormat::Csv));
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.timeout_seconds(), Some(5));
        assert_eq!(config.page_title(), Some("Friday Night"));
        assert_eq!(config.log_format(), Some(LogFormat::Json));
        assert_eq!(config.web_output(), None);
    }

    #[test]
    fn test_all_sections_optional() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.storage_path().is_none());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MOVIE_CATALOG_TEST_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[lookup]
api_key = "${MOVIE_CATALOG_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("MOVIE_CATALOG_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_is_missing() {
        let config = TomlConfig::from_toml_str(
            r#"
[lookup]
api_key = "${MOVIE_CATALOG_UNSET_VARIABLE}"
"#,
        )
        .unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let result = TomlConfig::from_toml_str(
            r#"
[storage]
format = "xml"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\npath = \"catalog.json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage_path(), Some("catalog.json"));
    }
}
