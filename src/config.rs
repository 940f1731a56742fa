use std::env;
use std::path::PathBuf;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is
/// immutable once loaded, ensuring every service (API client, session cache)
/// sees the same values for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the backend REST API (e.g. "http://localhost:5000/api").
    /// Every consumed endpoint is resolved relative to this.
    pub backend_url: String,
    /// Directory holding the persisted session cache and the cookie store.
    pub data_dir: PathBuf,
    /// Runtime environment marker. Controls the logging format.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between human-readable local
/// logging and JSON logging suitable for ingestion in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup. Points at a localhost backend and the current directory so
    /// no environment variables are required to scaffold state in tests.
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000/api".to_string(),
            data_dir: PathBuf::from("."),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration
    /// at startup. Reads all parameters from environment variables and
    /// implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if `BACKEND_URL` is not set in production. In local runs a
    /// development default is substituted so the application starts without
    /// any setup.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Backend URL Resolution
        // The production URL is mandatory and must be explicitly set.
        let backend_url = match env {
            Env::Production => {
                env::var("BACKEND_URL").expect("FATAL: BACKEND_URL must be set in production.")
            }
            _ => env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        };

        // Data Directory Resolution
        // Explicit override first, then the platform data directory, then the
        // working directory as a last resort.
        let data_dir = env::var("CODERZHUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .map(|d| d.join("coderzhub"))
                    .unwrap_or_else(|| PathBuf::from("."))
            });

        Self {
            backend_url,
            data_dir,
            env,
        }
    }

    /// Path of the single file standing in for the browser's local-storage
    /// key: the JSON-serialized normalized identity.
    pub fn session_cache_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Path of the persisted cookie store carrying the backend session
    /// cookie between application runs.
    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir.join("cookies.json")
    }
}
