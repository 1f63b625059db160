//! Instance command handlers
//!
//! Shows where a deployed instance stands.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use ebox_client::{page_url, resource_id};
use ebox_core::domain::deployment::DeploymentStatus;

use crate::config::Config;

/// Instance subcommands
#[derive(Subcommand)]
pub enum InstanceCommands {
    /// Poll the status of an instance once
    Status {
        /// Instance resource URL or instance ID
        instance: String,
    },
}

/// Handle instance commands
///
/// # Arguments
/// * `command` - The instance command to execute
/// * `config` - The CLI configuration
pub async fn handle_instance_command(command: InstanceCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        InstanceCommands::Status { instance } => {
            let resource_url = if instance.contains("://") {
                instance
            } else {
                client.instance_url(&instance)
            };

            let status = client.poll_status(&resource_url).await?;

            println!("{}", "Instance Status".bold().underline());
            println!();
            println!("  {}       {}", "ID:".bold(), resource_id(&resource_url));
            println!("  {}   {}", "Status:".bold(), colorize_status(&status));
            if let DeploymentStatus::Failed { message } = &status {
                println!("  {}  {}", "Message:".bold(), message.red());
            }
            println!(
                "  {}     {}",
                "Page:".bold(),
                page_url(client.endpoint_url(), &resource_url).cyan()
            );

            Ok(())
        }
    }
}

/// Colorize deployment status for display
fn colorize_status(status: &DeploymentStatus) -> ColoredString {
    match status {
        DeploymentStatus::Pending => "Pending".yellow(),
        DeploymentStatus::Done => "Done".green(),
        DeploymentStatus::Failed { .. } => "Failed".red(),
    }
}
