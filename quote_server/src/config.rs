//! Server configuration.
//!
//! Values come from environment variables, optionally seeded from a dotenv file named by
//! `ENV_FILE` (default `.env.dev`). Variables already set in the environment win over the
//! file. Empty values count as unset.
//!
//! | Variable                 | Default                  |
//! |--------------------------|--------------------------|
//! | `BIND_ADDRESS`           | `0.0.0.0`                |
//! | `PORT`                   | `4000`                   |
//! | `QUOTES_DIR`             | `/app/data/quotes`       |
//! | `SYMBOLS_FILE_PATH`      | `/app/data/symbols.json` |
//! | `EMAIL_FROM`             | `noreply@example.com`    |
//! | `SYMBOLS_CACHE_SECONDS`  | `300`                    |
//! | `SYMBOLS_RELOAD_SECONDS` | `0` (no periodic reload) |
//! | `SMTP_HOST`              | unset (log-only)         |
//! | `SMTP_PORT`              | `587`                    |
//! | `SMTP_USER`              | unset (no AUTH)          |
//! | `SMTP_PASS`              | unset (no AUTH)          |
//! | `SMTP_SECURE`            | `false` (STARTTLS)       |
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::{debug, info, warn};
use quote_common::net::{DEFAULT_PORT, addr};
use quote_common::{QuoteError, Result};

use crate::notifier::smtp::{DEFAULT_TIMEOUT, SmtpOptions};

const DEFAULT_ENV_FILE: &str = ".env.dev";

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface the receiver binds to.
    pub bind_address: String,
    /// TCP port of the receiver.
    pub port: u16,
    /// Directory holding one `<SYMBOL>.json` series per symbol.
    pub quotes_dir: PathBuf,
    /// Symbol directory dataset.
    pub symbols_file: PathBuf,
    /// Sender address of notification mails.
    pub email_from: String,
    /// Max age advertised with symbol listings.
    pub symbols_cache_secs: u64,
    /// Interval of the background directory reload; `0` disables it.
    pub symbols_reload_secs: u64,
    /// `None` selects the log-only notifier.
    pub smtp_host: Option<String>,
    #[allow(missing_docs)]
    pub smtp_port: u16,
    /// AUTH user; AUTH is used only together with `smtp_password`.
    pub smtp_user: Option<String>,
    #[allow(missing_docs)]
    pub smtp_password: Option<String>,
    /// Implicit TLS; otherwise STARTTLS when the server offers it.
    pub smtp_secure: bool,
}

impl ServerConfig {
    /// Load the dotenv file (if any) and read the process environment.
    pub fn from_env() -> Result<Self> {
        load_env_file();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| String::from("0.0.0.0")),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            quotes_dir: get("QUOTES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/app/data/quotes")),
            symbols_file: get("SYMBOLS_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/app/data/symbols.json")),
            email_from: get("EMAIL_FROM").unwrap_or_else(|| String::from("noreply@example.com")),
            symbols_cache_secs: parse_or(&get, "SYMBOLS_CACHE_SECONDS", 300)?,
            symbols_reload_secs: parse_or(&get, "SYMBOLS_RELOAD_SECONDS", 0)?,
            smtp_host: get("SMTP_HOST"),
            smtp_port: parse_or(&get, "SMTP_PORT", 587)?,
            smtp_user: get("SMTP_USER"),
            smtp_password: get("SMTP_PASS"),
            smtp_secure: parse_or(&get, "SMTP_SECURE", false)?,
        })
    }

    /// Mail server settings, or `None` when notifications are only logged.
    pub fn smtp_options(&self) -> Option<SmtpOptions> {
        self.smtp_host.as_ref().map(|host| SmtpOptions {
            host: host.clone(),
            port: self.smtp_port,
            secure: self.smtp_secure,
            user: self.smtp_user.clone(),
            password: self.smtp_password.clone(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// `host:port` the receiver binds to.
    pub fn listen_addr(&self) -> String {
        addr(&self.bind_address, self.port)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| QuoteError::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}

fn load_env_file() {
    let name = env::var("ENV_FILE").unwrap_or_else(|_| String::from(DEFAULT_ENV_FILE));
    match dotenvy::from_filename(&name) {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No env file {}, using process environment", name),
        Err(e) => warn!("Ignoring env file {}: {}", name, e),
    }
}
