//! Configuration loading and resolution
//!
//! Settings resolve with the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Provider credentials have no compiled default; startup fails without them.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default Sentinel Hub endpoint host
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://services.sentinel-hub.com";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port
    pub port: u16,
    /// Imagery provider base URL (overridable for tests/staging)
    pub provider_base_url: String,
    /// OAuth client id for the imagery provider
    pub client_id: String,
    /// OAuth client secret for the imagery provider
    pub client_secret: String,
    /// Optional fixed seed for the per-request random stream.
    /// Unset in production; set for deterministic replay.
    pub rng_seed: Option<u64>,
}

/// Raw TOML config file contents (all fields optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub provider_base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub rng_seed: Option<u64>,
}

impl TomlConfig {
    /// Load the config file if one exists at a conventional location.
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let Some(path) = config_file_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("malformed config file {}: {e}", path.display())))
    }
}

/// Conventional config file path for the platform
/// (e.g. `~/.config/carboneye/config.toml` on Linux).
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("carboneye").join("config.toml"));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/carboneye/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    user_config
}

impl ServiceConfig {
    /// Resolve the full configuration.
    ///
    /// `cli_port` and `cli_seed` come from command-line flags and take
    /// precedence over everything else.
    pub fn resolve(cli_port: Option<u16>, cli_seed: Option<u64>) -> Result<Self> {
        let file = TomlConfig::load()?;

        let port = cli_port
            .or_else(|| env_parsed("CEYE_PORT"))
            .or_else(|| env_parsed("PORT"))
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let provider_base_url = std::env::var("CEYE_PROVIDER_BASE_URL")
            .ok()
            .or(file.provider_base_url)
            .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string());

        let env_client_id = std::env::var("CLIENT_ID").ok();
        if env_client_id.is_some() && file.client_id.is_some() {
            tracing::warn!(
                "CLIENT_ID found in both environment and config file; using environment"
            );
        }
        let client_id = env_client_id.or(file.client_id).ok_or_else(|| {
            Error::Config("CLIENT_ID not set (env or config file)".to_string())
        })?;

        let client_secret = std::env::var("CLIENT_SECRET")
            .ok()
            .or(file.client_secret)
            .ok_or_else(|| {
                Error::Config("CLIENT_SECRET not set (env or config file)".to_string())
            })?;

        let rng_seed = cli_seed.or_else(|| env_parsed("CEYE_RNG_SEED")).or(file.rng_seed);

        Ok(Self {
            port,
            provider_base_url,
            client_id,
            client_secret,
            rng_seed,
        })
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config_parses_partial_file() {
        let parsed: TomlConfig = toml::from_str("port = 8080\nclient_id = \"abc\"").unwrap();
        assert_eq!(parsed.port, Some(8080));
        assert_eq!(parsed.client_id.as_deref(), Some("abc"));
        assert_eq!(parsed.client_secret, None);
        assert_eq!(parsed.rng_seed, None);
    }

    #[test]
    fn test_toml_config_rejects_garbage() {
        let parsed = toml::from_str::<TomlConfig>("port = \"not a number\"");
        assert!(parsed.is_err());
    }
}
