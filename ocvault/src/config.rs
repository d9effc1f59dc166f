use std::env;
use std::path::PathBuf;

/// Username accepted when `ADMIN_USERNAME` is unset.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Password accepted when `ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "321password123";

const DEFAULT_SLED_PATH: &str = "./vault-data";
const DEFAULT_LISTEN: &str = "0.0.0.0:8787";

/// Which storage backend the vault runs on, fixed at config-load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// In-process map; resets on restart, never expires.
    Memory,
    /// Embedded sled database with per-entry TTL.
    Sled { path: PathBuf },
    /// External cache service reached over HTTP.
    Remote { url: String },
    /// No backend at all: degraded mode with synthetic fallback tokens.
    Disabled,
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub backend: BackendConfig,
    pub listen: String,
}

impl VaultConfig {
    /// Loads configuration from the environment.
    ///
    /// Credentials fall back to the hardcoded defaults. `VAULT_BACKEND`
    /// selects the store (`memory`, `sled`, `remote`, `none`); anything
    /// unrecognized, or `remote` without `VAULT_CACHE_URL`, falls back to
    /// `memory` rather than failing startup.
    pub fn from_env() -> Self {
        let backend = match env::var("VAULT_BACKEND").as_deref() {
            Ok("sled") => BackendConfig::Sled {
                path: env::var("VAULT_SLED_PATH")
                    .unwrap_or_else(|_| DEFAULT_SLED_PATH.to_owned())
                    .into(),
            },
            Ok("remote") => match env::var("VAULT_CACHE_URL") {
                Ok(url) => BackendConfig::Remote { url },
                Err(_) => {
                    tracing::warn!("VAULT_BACKEND=remote but VAULT_CACHE_URL unset, using memory");
                    BackendConfig::Memory
                }
            },
            Ok("none") => BackendConfig::Disabled,
            Ok("memory") | Err(_) => BackendConfig::Memory,
            Ok(other) => {
                tracing::warn!(backend = other, "unknown VAULT_BACKEND, using memory");
                BackendConfig::Memory
            }
        };

        VaultConfig {
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_owned()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_owned()),
            backend,
            listen: env::var("VAULT_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_owned()),
        }
    }

    /// Whether the given login matches the configured admin account.
    ///
    /// Exact string equality on both fields; there is deliberately no
    /// hashing, rate limiting, or lockout.
    pub fn credentials_match(&self, username: &str, password: &str) -> bool {
        username == self.admin_username && password == self.admin_password
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            admin_username: DEFAULT_ADMIN_USERNAME.to_owned(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_owned(),
            backend: BackendConfig::Memory,
            listen: DEFAULT_LISTEN.to_owned(),
        }
    }
}
