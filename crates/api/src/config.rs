use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use fascicoli_core::admission::SelectionPolicy;
use fascicoli_core::booking::BookingSettings;
use fascicoli_core::error::CoreError;
use fascicoli_core::requirements::RequirementTable;

use crate::auth::jwt::JwtConfig;

/// Which backend holds the catalog, ledger and reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store, optionally seeded from a JSON file.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// The single operator credential accepted by `POST /auth/login`.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the credentials have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub memory_seed_path: Option<PathBuf>,
    /// Snapshot cache lifetime in seconds (default: `45`).
    pub cache_ttl_secs: u64,
    /// JSON reason table; the built-in four reasons when unset.
    pub reasons_file: Option<PathBuf>,
    pub portfolio_required: bool,
    /// `false` also disables the cost-center lookup.
    pub cost_center_required: bool,
    pub login: LoginConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => panic!("{name} must be true or false"),
        },
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `STORE_BACKEND`         | `postgres`                 |
    /// | `DATABASE_URL`          | -- (required for postgres) |
    /// | `MEMORY_SEED_PATH`      | --                         |
    /// | `CACHE_TTL_SECS`        | `45`                       |
    /// | `REASONS_FILE`          | --                         |
    /// | `PORTFOLIO_REQUIRED`    | `true`                     |
    /// | `COST_CENTER_REQUIRED`  | `true`                     |
    /// | `APP_USERNAME`          | `operatore`                |
    /// | `APP_PASSWORD_HASH`     | -- (required)              |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values, on a missing `APP_PASSWORD_HASH`, and
    /// on a missing `DATABASE_URL` with the postgres backend.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let store_backend: StoreBackend = env_or("STORE_BACKEND", "postgres")
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            );
        }

        let cache_ttl_secs: u64 = env_or("CACHE_TTL_SECS", "45")
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let password_hash = std::env::var("APP_PASSWORD_HASH")
            .expect("APP_PASSWORD_HASH must be set in the environment");
        assert!(!password_hash.is_empty(), "APP_PASSWORD_HASH must not be empty");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store_backend,
            database_url,
            memory_seed_path: env_path("MEMORY_SEED_PATH"),
            cache_ttl_secs,
            reasons_file: env_path("REASONS_FILE"),
            portfolio_required: env_bool("PORTFOLIO_REQUIRED", true),
            cost_center_required: env_bool("COST_CENTER_REQUIRED", true),
            login: LoginConfig {
                username: env_or("APP_USERNAME", "operatore"),
                password_hash,
            },
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            portfolio_required: self.portfolio_required,
            cost_center_required: self.cost_center_required,
        }
    }

    /// Assemble the booking settings, reading `REASONS_FILE` when set.
    pub fn booking_settings(&self) -> Result<BookingSettings, CoreError> {
        let requirements = match &self.reasons_file {
            Some(path) => RequirementTable::from_json_file(path)?,
            None => RequirementTable::default(),
        };
        Ok(BookingSettings {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            requirements,
            policy: self.selection_policy(),
        })
    }
}
