//! ElasticBox CLI
//!
//! Command-line interface for browsing boxes and following deployed
//! instances on an ElasticBox platform.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "ebox")]
#[command(about = "ElasticBox deployment CLI", long_about = None)]
struct Cli {
    /// Box platform URL
    #[arg(long, env = "EBOX_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Token sent with every request
    #[arg(long, env = "EBOX_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        endpoint_url: cli.endpoint_url,
        token: cli.token,
    };

    handle_command(cli.command, &config).await
}
