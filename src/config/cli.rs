use super::toml_config::TomlConfig;
use super::{
    AppConfig, LookupSettings, DEFAULT_LOG_FILE, DEFAULT_PAGE_TITLE, DEFAULT_STORAGE_PATH,
    DEFAULT_TEMPLATE_PATH, DEFAULT_TIMEOUT_SECONDS,
};
use crate::adapters::codec::StorageFormat;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "movie-catalog")]
#[command(about = "A personal movie catalog stored as JSON or CSV")]
pub struct CliConfig {
    /// Backing file for the catalog
    #[arg(long)]
    pub storage: Option<String>,

    /// Storage format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<StorageFormat>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// OMDb API key; enables adding movies by title lookup
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub lookup_endpoint: Option<String>,

    /// HTML template used by "Generate web page"
    #[arg(long)]
    pub template: Option<String>,

    #[arg(long)]
    pub log_file: Option<String>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn load_file_config(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_deref()
            .map(TomlConfig::from_file)
            .transpose()
    }

    /// Command line values win over the config file, which wins over
    /// defaults.
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<AppConfig> {
        let file_str = |get: fn(&TomlConfig) -> Option<&str>| file.and_then(get).map(str::to_string);

        let storage_path = self
            .storage
            .clone()
            .or_else(|| file_str(TomlConfig::storage_path))
            .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string());

        let format = match self.format.or_else(|| file.and_then(TomlConfig::storage_format)) {
            Some(format) => format,
            None => StorageFormat::from_path(&storage_path)?,
        };

        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| file_str(TomlConfig::api_key));
        let lookup = api_key.map(|api_key| LookupSettings {
            endpoint: AppConfig::lookup_endpoint_or_default(
                self.lookup_endpoint
                    .clone()
                    .or_else(|| file_str(TomlConfig::lookup_endpoint)),
            ),
            api_key,
            timeout_seconds: file
                .and_then(TomlConfig::timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        });

        Ok(AppConfig {
            storage_path,
            format,
            lookup,
            template: PathBuf::from(
                self.template
                    .clone()
                    .or_else(|| file_str(TomlConfig::template))
                    .unwrap_or_else(|| DEFAULT_TEMPLATE_PATH.to_string()),
            ),
            web_output: file_str(TomlConfig::web_output).map(PathBuf::from),
            page_title: file_str(TomlConfig::page_title)
                .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            log_file: PathBuf::from(
                self.log_file
                    .clone()
                    .or_else(|| file_str(TomlConfig::log_file))
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            ),
            log_format: self
                .log_format
                .or_else(|| file.and_then(TomlConfig::log_format))
                .unwrap_or_default(),
            verbose: self.verbose,
        })
    }
}
