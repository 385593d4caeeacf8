//! Environment-driven configuration
//!
//! Everything comes from environment variables (a `.env` file is read by
//! the binary before this runs). Missing required values fail hard with
//! the variable name in the message.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Default cron expression for the daily fetch: every day at 12:00.
pub const DEFAULT_FETCH_CRON: &str = "0 0 12 * * *";

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Process-wide configuration, assembled once at startup and passed
/// explicitly to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (`CLINICD_BIND_ADDR`).
    pub bind_addr: SocketAddr,

    /// Allow any CORS origin (`CORS_PERMISSIVE`, default false).
    pub cors_permissive: bool,

    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: String,

    /// SMTP relay settings for prescription mail.
    pub mail: MailConfig,

    /// URL the scheduler fetches daily (`FETCH_URL`, defaults to this
    /// server's own user listing).
    pub fetch_url: String,

    /// Cron expression for the daily fetch (`FETCH_CRON`).
    pub fetch_cron: String,
}

/// SMTP relay credentials.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Clinic <clinic@example.com>`.
    pub from: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let bind = env::var("CLINICD_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("invalid CLINICD_BIND_ADDR '{}'", bind))?;

        let mail = MailConfig {
            host: required("SMTP_HOST")?,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            from: required("SMTP_FROM")?,
        };

        Ok(Self {
            bind_addr,
            cors_permissive: env::var("CORS_PERMISSIVE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            database_url: required("DATABASE_URL")?,
            mail,
            fetch_url: env::var("FETCH_URL").unwrap_or_else(|_| default_fetch_url(&bind_addr)),
            fetch_cron: env::var("FETCH_CRON").unwrap_or_else(|_| DEFAULT_FETCH_CRON.to_string()),
        })
    }
}

/// The scheduler fetches our own user listing unless told otherwise.
pub fn default_fetch_url(bind_addr: &SocketAddr) -> String {
    format!("http://{}/api/userDetails", bind_addr)
}

fn required(key: &'static str) -> Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("required environment variable {} is not set", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_url_points_at_own_listing() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        assert_eq!(
            default_fetch_url(&addr),
            "http://127.0.0.1:3000/api/userDetails"
        );
    }

    #[test]
    fn default_cron_is_daily_noon() {
        assert_eq!(DEFAULT_FETCH_CRON, "0 0 12 * * *");
    }
}
