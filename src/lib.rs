//! Aviation Stack MCP: aviationstack flight lookups exposed as Model Context
//! Protocol tools.

pub mod aviation;
pub mod config;
pub mod mcp;
pub mod server;

#[cfg(test)]
mod test_support;

/// Install the process-wide rustls crypto provider used by the HTTP client.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
