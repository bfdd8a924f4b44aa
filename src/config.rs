use std::env;
use thiserror::Error;

/// Resources whose PATCH leaves the row untouched unless `SOFT_DELETE_NOOP` says otherwise.
pub const DEFAULT_SOFT_DELETE_NOOP: &[&str] = &["RolUser", "RolFormPermission", "ModuleForm"];

/// AppConfig
///
/// Holds the application's configuration. Loaded once at startup, immutable afterwards,
/// and pulled into handlers via `FromRef` as part of the shared `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format.
    pub env: Env,
    // Where rows live: Postgres, or an in-process map for local runs.
    pub storage: StorageBackend,
    // Database connection string (Postgres). Empty when storage is in-memory.
    pub db_url: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Upper bound of the sqlx connection pool.
    pub max_connections: u32,
    // Apply `migrations/` on startup.
    pub run_migrations: bool,
    // Per-resource soft-delete behavior.
    pub soft_delete: SoftDeleteSettings,
}

/// Env
///
/// Defines the runtime context: human-readable logs locally, JSON logs in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// StorageBackend
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// SoftDeleteMode
///
/// `Flag` sets `is_deleted = true` on the row. `NoOp` only confirms the row exists,
/// which is how the join tables have always behaved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoftDeleteMode {
    Flag,
    NoOp,
}

/// SoftDeleteSettings
///
/// Names of the resources (as they appear under `/api/`) whose soft delete is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftDeleteSettings {
    pub noop: Vec<String>,
}

impl Default for SoftDeleteSettings {
    fn default() -> Self {
        Self {
            noop: DEFAULT_SOFT_DELETE_NOOP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SoftDeleteSettings {
    /// Parses `SOFT_DELETE_NOOP`. `none` (or an empty value) turns every resource into a
    /// real soft delete.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Self { noop: Vec::new() };
        }
        Self {
            noop: trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn mode_for(&self, resource: &str) -> SoftDeleteMode {
        if self.noop.iter().any(|name| name.eq_ignore_ascii_case(resource)) {
            SoftDeleteMode::NoOp
        } else {
            SoftDeleteMode::Flag
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe values for tests: in-memory storage, no migrations, nothing read from the
    /// environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            storage: StorageBackend::Memory,
            db_url: String::new(),
            bind_addr: "127.0.0.1:3000".to_string(),
            max_connections: 5,
            run_migrations: false,
            soft_delete: SoftDeleteSettings::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables. Fails fast on a missing
    /// `DATABASE_URL` (Postgres storage) or on values that do not parse.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let storage = match env::var("STORAGE").as_deref() {
            Ok(v) if v.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            _ => StorageBackend::Postgres,
        };

        let db_url = match storage {
            StorageBackend::Postgres => {
                env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?
            }
            StorageBackend::Memory => env::var("DATABASE_URL").unwrap_or_default(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: raw,
            })?,
            Err(_) => 5,
        };

        let run_migrations = match env::var("RUN_MIGRATIONS") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "RUN_MIGRATIONS",
                value: raw,
            })?,
            Err(_) => true,
        };

        let soft_delete = env::var("SOFT_DELETE_NOOP")
            .map(|raw| SoftDeleteSettings::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            env,
            storage,
            db_url,
            bind_addr,
            max_connections,
            run_migrations,
            soft_delete,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
