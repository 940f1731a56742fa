use clap::Parser;
use coderzhub::{
    AppConfig, AppContext, FileSessionCache, HttpApiClient, SessionStore,
    api::ApiState,
    cache::CacheState,
    cli::{self, Cli},
    config::Env,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point for the application, responsible for
/// initializing all core components: Command parsing, Configuration,
/// Logging, the API client, and the Session Store.
#[tokio::main]
async fn main() {
    // 1. Command Parsing
    // Done before any service construction so `--help` costs nothing.
    let cli = Cli::parse();

    // 2. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() implements the fail-fast principle for missing
    // Production settings.
    let config = AppConfig::load();

    // 3. Logging Filter Setup
    // Sets the default log level. It prioritizes the RUST_LOG environment
    // variable, falling back to a sensible default.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coderzhub=info".into());

    // 4. Initialize Logging based on Environment
    // The structured logging format is dynamically selected based on APP_ENV.
    match config.env {
        Env::Local => {
            // LOCAL: Pretty print output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON format output for ingestion by log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::debug!("starting against backend {}", config.backend_url);

    // 5. API Client Initialization
    // Rehydrates the persisted cookie store so a session from a previous run
    // still authenticates this one.
    let api = match HttpApiClient::new(&config) {
        Ok(client) => Arc::new(client) as ApiState,
        Err(e) => {
            eprintln!("Could not initialize the HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // 6. Session Store Assembly
    // The file cache is the local-storage stand-in; the store owns it and
    // the API client from here on.
    let cache = Arc::new(FileSessionCache::new(config.session_cache_path())) as CacheState;
    let session = Arc::new(SessionStore::new(api.clone(), cache));

    // 7. Unified Context Assembly & Dispatch
    let ctx = AppContext {
        api,
        session,
        config,
    };

    let code = cli::run(&ctx, cli.command).await;
    std::process::exit(code);
}
