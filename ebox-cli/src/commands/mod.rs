//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod boxes;
mod instance;
mod job;

pub use boxes::{BoxCommands, Bucket};
pub use instance::InstanceCommands;
pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Browse boxes
    Boxes {
        #[command(subcommand)]
        command: BoxCommands,
    },
    /// Inspect deployed instances
    Instance {
        #[command(subcommand)]
        command: InstanceCommands,
    },
    /// Work with job files
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Boxes { command } => boxes::handle_box_command(command, config).await,
        Commands::Instance { command } => instance::handle_instance_command(command, config).await,
        Commands::Job { command } => job::handle_job_command(command),
    }
}
