//! CLI + environment configuration.
//!
//! Everything required is validated in one place into an immutable
//! [`Settings`]; the catalog client never sees raw environment state.

use crate::error::{Result, ServerError};
use clap::{Parser, ValueEnum};
use datahub_catalog::config::{CatalogAuth, CatalogConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Expose a Datahub metadata catalog to MCP clients.
#[derive(Debug, Parser)]
#[command(name = "datahub-mcp-server", version, about)]
pub struct Cli {
    /// Base URL of the Datahub instance, e.g. http://localhost:8088
    #[arg(long, env = "DATAHUB_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for HTTP basic auth against Datahub
    #[arg(long, env = "DATAHUB_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP basic auth against Datahub
    #[arg(long, env = "DATAHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// MCP transport to serve
    #[arg(long, value_enum, default_value = "stdio")]
    pub transport: Transport,

    /// Listen port for the streamable HTTP transport
    #[arg(long, default_value_t = 8099)]
    pub port: u16,

    /// Timeout for outbound Datahub requests, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Path to a stored Datahub access token (used as bearer auth when still valid)
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Serve MCP over stdin/stdout
    Stdio,
    /// Serve MCP over streamable HTTP at /mcp
    StreamableHttp,
}

/// Validated, immutable server settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub transport: Transport,
    pub port: u16,
    pub timeout: Duration,
    pub token_file: PathBuf,
}

impl Settings {
    /// Validate CLI/environment input.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` when any of the three required Datahub
    /// values is missing or blank.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base_url = require(cli.base_url.as_deref(), "DATAHUB_BASE_URL", "--base-url")?;
        let username = require(cli.username.as_deref(), "DATAHUB_USERNAME", "--username")?;
        let password = require(cli.password.as_deref(), "DATAHUB_PASSWORD", "--password")?;

        let token_file = match &cli.token_file {
            Some(p) => p.clone(),
            None => default_token_path()?,
        };

        Ok(Self {
            base_url,
            username,
            password,
            transport: cli.transport,
            port: cli.port,
            timeout: Duration::from_secs(cli.timeout_secs),
            token_file,
        })
    }

    /// Catalog configuration with the given auth scheme.
    #[must_use]
    pub fn catalog_config(&self, auth: CatalogAuth) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            auth,
            timeout: self.timeout,
        }
    }

    #[must_use]
    pub fn basic_auth(&self) -> CatalogAuth {
        CatalogAuth::Basic {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

fn require(value: Option<&str>, env_name: &str, flag: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ServerError::Config(format!(
            "{env_name} is not set (or pass {flag})"
        ))),
    }
}

/// Default stored-token location: `$XDG_CONFIG_HOME/datahub-mcp/access-token`.
pub fn default_token_path() -> Result<PathBuf> {
    let base = if let Ok(v) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(v)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| ServerError::Config("HOME is not set".to_string()))?;
        PathBuf::from(home).join(".config")
    };
    Ok(base.join("datahub-mcp").join("access-token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(base_url: Option<&str>, username: Option<&str>, password: Option<&str>) -> Cli {
        Cli {
            base_url: base_url.map(str::to_string),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            transport: Transport::Stdio,
            port: 8099,
            timeout_secs: 30,
            token_file: Some(PathBuf::from("/tmp/unused-token")),
            log_json: false,
        }
    }

    #[test]
    fn settings_require_all_three_values() {
        for (b, u, p, missing) in [
            (None, Some("datahub"), Some("pw"), "DATAHUB_BASE_URL"),
            (Some("http://localhost:8088"), None, Some("pw"), "DATAHUB_USERNAME"),
            (Some("http://localhost:8088"), Some("datahub"), None, "DATAHUB_PASSWORD"),
        ] {
            let err = Settings::from_cli(&cli(b, u, p)).unwrap_err();
            assert!(matches!(err, ServerError::Config(_)));
            assert!(err.to_string().contains(missing), "got: {err}");
        }
    }

    #[test]
    fn settings_reject_blank_values() {
        let err = Settings::from_cli(&cli(
            Some("http://localhost:8088"),
            Some("   "),
            Some("pw"),
        ))
        .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn settings_build_from_complete_input() {
        let settings = Settings::from_cli(&cli(
            Some("http://localhost:8088"),
            Some("datahub"),
            Some("pw"),
        ))
        .expect("settings");
        assert_eq!(settings.base_url, "http://localhost:8088");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.token_file, PathBuf::from("/tmp/unused-token"));
    }
}
