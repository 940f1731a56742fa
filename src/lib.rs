use std::sync::Arc;

// --- Module Structure ---

// Core application services and components.
pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod session;

// Role-gated navigation: the pure gate plus the declarative route table
// (segregated Public, Authenticated, Admin).
pub mod gate;
pub mod routes;

// The independent utility tools and the command-line adapter driving them.
pub mod cli;
pub mod tools;

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// (main.rs) and to the integration tests.
pub use api::{ApiState, HttpApiClient, MockApiService};
pub use cache::{CacheState, FileSessionCache, MemorySessionCache};
pub use config::AppConfig;
pub use session::SessionStore;

/// AppContext
///
/// The single container holding every assembled service the application
/// needs: the API client, the Session Store, and the loaded configuration.
/// Built once in `main` and handed to the command handlers, so every part of
/// the process observes the same session and talks through the same
/// cookie-carrying client.
#[derive(Clone)]
pub struct AppContext {
    /// The typed client for the backend REST interface.
    pub api: ApiState,
    /// Single source of truth for the authenticated identity.
    pub session: Arc<SessionStore>,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}
