//! Process configuration.
//!
//! Command-line flags and environment are resolved exactly once at startup
//! into an immutable [`Config`] that is passed to the components needing it.

use std::env::{self, VarError};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use miette::Diagnostic;
use thiserror::Error;

/// Environment variable holding the aviationstack access key.
pub const API_KEY_ENV: &str = "AVIATION_STACK_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "AVIATION_STACK_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com/v1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fatal startup errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("AVIATION_STACK_API_KEY is not set")]
    #[diagnostic(
        code(aviation_stack_mcp::config::missing_api_key),
        help("Export AVIATION_STACK_API_KEY with your aviationstack access key.")
    )]
    MissingApiKey,

    #[error("AVIATION_STACK_API_KEY is not valid UTF-8")]
    #[diagnostic(
        code(aviation_stack_mcp::config::non_unicode_api_key),
        help("aviationstack access keys are plain ASCII; re-export the variable.")
    )]
    NonUnicodeApiKey,

    #[error("AVIATION_STACK_API_KEY is empty")]
    #[diagnostic(
        code(aviation_stack_mcp::config::empty_api_key),
        help("Export AVIATION_STACK_API_KEY with your aviationstack access key.")
    )]
    EmptyApiKey,

    #[error("Timeout must be at least one second")]
    #[diagnostic(code(aviation_stack_mcp::config::invalid_timeout))]
    InvalidTimeout,

    #[error("Failed to build HTTP client")]
    #[diagnostic(code(aviation_stack_mcp::config::http_client))]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },
}

/// Transport the MCP server listens on. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionType {
    /// Newline-delimited JSON-RPC over standard input/output
    Stdio,
    /// Streamable HTTP on `--host`:`--port`
    Http,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Http => f.write_str("http"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "aviation-stack-mcp")]
#[command(author, version, about = "Aviation Stack MCP server", long_about = None)]
pub struct Cli {
    /// Transport to serve MCP on
    #[arg(long = "connection_type", value_enum, default_value = "stdio")]
    pub connection_type: ConnectionType,

    /// Host address to bind to (http transport)
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on (http transport)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Provider base URL (default: AVIATION_STACK_BASE_URL env or http://api.aviationstack.com/v1)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timeout for each provider request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Provider access key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Immutable server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub connection_type: ConnectionType,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            connection_type: ConnectionType::Stdio,
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Resolve parsed flags against the environment.
    ///
    /// Priority for base URL:
    /// 1. `--base-url`
    /// 2. AVIATION_STACK_BASE_URL environment variable
    /// 3. Default: http://api.aviationstack.com/v1
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV).map_err(|e| match e {
            VarError::NotPresent => ConfigError::MissingApiKey,
            VarError::NotUnicode(_) => ConfigError::NonUnicodeApiKey,
        })?;
        if cli.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env::var(BASE_URL_ENV).ok().filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ApiKey::new(api_key)?)
            .with_connection_type(cli.connection_type)
            .with_bind(cli.host, cli.port)
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(cli.timeout_secs)))
    }

    pub fn with_connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    pub fn with_bind(mut self, host: IpAddr, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
