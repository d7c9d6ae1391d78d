use clap::Parser;
use movie_catalog::app::menu::{Menu, WebPageSettings};
use movie_catalog::domain::ports::MetadataLookup;
use movie_catalog::utils::error::{CatalogError, ErrorSeverity};
use movie_catalog::utils::{logger, validation::Validate};
use movie_catalog::{
    CatalogService, CatalogSession, CatalogStore, CliConfig, LoadStatus, LocalStorage, OmdbClient,
};

fn exit_with(e: &CatalogError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match cli.load_file_config() {
        Ok(file_config) => file_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.as_deref().unwrap_or_default(), e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    let config = match cli.resolve(file_config.as_ref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    logger::init_cli_logger(config.verbose, &config.log_file, config.log_format)?;
    tracing::info!("🚀 Starting movie-catalog");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let lookup = match &config.lookup {
        Some(settings) => {
            match OmdbClient::new(settings.endpoint.clone(), settings.api_key.clone(), settings.timeout()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Lookup client unavailable, falling back to manual entry: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let (base_path, file_name) = config.storage_location();
    let store = CatalogStore::new(LocalStorage::new(base_path), file_name, config.format);
    let mut session = CatalogSession::open(CatalogService::new(store));
    if session.load_status() == LoadStatus::Failed {
        println!(
            "⚠️  Could not load {}; starting with an empty catalog",
            config.storage_path
        );
    }

    let web = WebPageSettings {
        template: config.template.clone(),
        output: config.web_output.clone(),
        title: config.page_title.clone(),
    };

    let outcome = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut menu = Menu::new(
            session.service_mut(),
            lookup.as_ref().map(|client| client as &dyn MetadataLookup),
            web,
            stdin.lock(),
            stdout.lock(),
        );
        menu.run().await
    };
    if let Err(e) = outcome {
        tracing::error!(
            "❌ Menu stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
    }

    match session.close() {
        Some(Ok(status)) => tracing::info!("✅ Final save complete: {:?}", status),
        Some(Err(e)) => {
            tracing::error!("❌ Final save failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
        }
        None => {}
    }

    Ok(())
}
