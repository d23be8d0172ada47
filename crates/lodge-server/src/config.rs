//! Server configuration loaded from environment variables.
//!
//! All settings have development defaults so the server can start with
//! zero configuration.  Nothing is validated eagerly: a wrong asset-host
//! URL or a missing production secret surfaces on first use, not at boot.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path of the SQLite database.
    /// Env: `DATABASE_PATH`
    /// Default: the platform data directory chosen by the store.
    pub database_path: Option<PathBuf>,

    /// Secret used to sign identity tokens.
    /// Env: `JWT_SECRET`
    /// Default: a fixed development-only value.
    pub jwt_secret: String,

    /// Identity token lifetime in seconds.
    /// Env: `JWT_TTL_SECS`
    /// Default: `86400` (24 hours)
    pub jwt_ttl_secs: i64,

    /// Base URL of the external asset host images are forwarded to.
    /// Env: `ASSET_HOST_URL`
    /// Default: empty (uploads fail until configured).
    pub asset_host_url: String,

    /// API key for the asset host, sent as a bearer token.
    /// Env: `ASSET_HOST_KEY`
    /// Default: none.
    pub asset_host_key: Option<String>,

    /// Origins allowed to call the API with credentials, comma-separated.
    /// Env: `ALLOWED_ORIGINS`
    /// Default: `http://localhost:5173` (the dev frontend).
    pub allowed_origins: Vec<String>,

    // -- Self-hosted instance settings --

    /// Whether the content mutation routes are open to anonymous callers.
    /// Instance admins who want a locked-down back office set this to
    /// false, which gates every mutation behind an admin session.
    /// Env: `OPEN_CONTRIBUTIONS` (true/false)
    /// Default: `true`
    pub open_contributions: bool,

    /// Whether the identity cookie carries the `Secure` attribute.
    /// Must be enabled when serving over HTTPS in production.
    /// Env: `SECURE_COOKIES` (true/false)
    /// Default: `false`
    pub secure_cookies: bool,
}

/// Development-only signing secret used when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "lodge-dev-secret";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            database_path: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_secs: 24 * 60 * 60,
            asset_host_url: String::new(),
            asset_host_key: None,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            open_contributions: true,
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                config.jwt_secret = secret;
            }
        } else {
            tracing::warn!("JWT_SECRET not set, using development secret");
        }

        if let Ok(val) = std::env::var("JWT_TTL_SECS") {
            match val.parse::<i64>() {
                Ok(secs) if secs > 0 => config.jwt_ttl_secs = secs,
                _ => tracing::warn!(value = %val, "Invalid JWT_TTL_SECS, using default"),
            }
        }

        if let Ok(url) = std::env::var("ASSET_HOST_URL") {
            config.asset_host_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(key) = std::env::var("ASSET_HOST_KEY") {
            if !key.is_empty() {
                config.asset_host_key = Some(key);
            }
        }

        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if !parsed.is_empty() {
                config.allowed_origins = parsed;
            }
        }

        // -- Self-hosted settings --

        if let Ok(val) = std::env::var("OPEN_CONTRIBUTIONS") {
            config.open_contributions = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("SECURE_COOKIES") {
            config.secure_cookies = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.jwt_ttl_secs, 86400);
        assert!(config.open_contributions);
        assert!(!config.secure_cookies);
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_dev_secret_is_present() {
        // The secret is never empty; token signing must always work in
        // development even with no environment at all.
        assert!(!ServerConfig::default().jwt_secret.is_empty());
    }
}
