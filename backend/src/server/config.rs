//! Application configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment-derived configuration for the server process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`BIND_ADDR`, default
    /// `0.0.0.0:8080`).
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Media root for evidence storage (`MEDIA_ROOT`, default `media`).
    pub media_root: PathBuf,
    /// Whether session cookies carry the `Secure` flag
    /// (`SESSION_COOKIE_SECURE`, default on; set `0` to disable).
    pub cookie_secure: bool,
    /// Path to the session signing key file (`SESSION_KEY_FILE`).
    pub session_key_file: String,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or `BIND_ADDR` does not parse.
    pub fn from_env() -> std::io::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;
        let media_root = env::var("MEDIA_ROOT")
            .map_or_else(|_| PathBuf::from("media"), PathBuf::from);
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);
        let session_key_file = env::var("SESSION_KEY_FILE")
            .unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());
        Ok(Self {
            bind_addr,
            database_url,
            media_root,
            cookie_secure,
            session_key_file,
        })
    }
}
