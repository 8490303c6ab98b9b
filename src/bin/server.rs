//! Aviation Stack MCP server binary.

use aviation_stack_mcp::{
    config::{Cli, Config},
    install_crypto_provider, server,
};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    server::init_tracing();
    install_crypto_provider();

    // Credential and transport are fixed before anything is served
    let config = Config::from_cli(&cli)?;
    server::run(config).await?;

    Ok(())
}
