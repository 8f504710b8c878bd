//! Server configuration for Silex.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Parsing goes through [`ServerConfig::from_lookup`] so it can be exercised
//! without touching the process environment.

use std::net::SocketAddr;

/// Default number of approved reviews returned on the public route.
pub const DEFAULT_PUBLIC_LIMIT: usize = 20;

const DEFAULT_PORT: u16 = 8300;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Shared secret for the admin routes. `None` closes them.
    pub admin_password: Option<String>,
    /// Cap on the public review listing.
    pub public_limit: usize,
    /// Webhook that receives lead notifications (logged only when unset).
    pub lead_webhook_url: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage_backend", &self.storage_backend)
            .field("log_level", &self.log_level)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[redacted]"))
            .field("public_limit", &self.public_limit)
            .field("lead_webhook_url", &self.lead_webhook_url)
            .finish()
    }
}

/// Supported storage backend types.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// Embedded redb file.
    Redb { path: String },
    /// PostgreSQL `reviews` table.
    Postgres { url: String },
}

impl std::fmt::Debug for StorageBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Redb { path } => f.debug_struct("Redb").field("path", path).finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("url", &"[redacted]")
                .finish(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on, binds to `0.0.0.0`
    /// - `SILEX_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `SILEX_STORAGE` — `memory`, `redb`, or `postgres` (default: `memory`)
    /// - `SILEX_STORAGE_PATH` — redb file path (default: `./data/reviews.redb`)
    /// - `DATABASE_URL` — PostgreSQL connection string (used when `SILEX_STORAGE=postgres`)
    /// - `SILEX_LOG_LEVEL` — log filter (default: `info`)
    /// - `ADMIN_PASSWORD` — shared secret for the admin routes
    /// - `SILEX_PUBLIC_LIMIT` — approved reviews on the public route (default: `20`)
    /// - `SILEX_LEAD_WEBHOOK_URL` — where lead notifications are posted
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

        // Priority: SILEX_BIND_ADDR > PORT > default 127.0.0.1:8300
        let bind_addr = if let Some(addr) = lookup("SILEX_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            default_addr
        };

        let storage_backend = match lookup("SILEX_STORAGE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageBackendType::Redb {
                path: lookup("SILEX_STORAGE_PATH")
                    .unwrap_or_else(|| "./data/reviews.redb".to_owned()),
            },
            "postgres" | "postgresql" => StorageBackendType::Postgres {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgres://localhost/silex".to_owned()),
            },
            _ => StorageBackendType::Memory,
        };

        let log_level = lookup("SILEX_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let admin_password = lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty());

        let public_limit = lookup("SILEX_PUBLIC_LIMIT")
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_PUBLIC_LIMIT);

        let lead_webhook_url = lookup("SILEX_LEAD_WEBHOOK_URL").filter(|u| !u.is_empty());

        Self {
            bind_addr,
            storage_backend,
            log_level,
            admin_password,
            public_limit,
            lead_webhook_url,
        }
    }
}
