//! Job command handlers
//!
//! Checks job files before they are handed to the runner.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use ebox_runner::job::JobDefinition;
use std::path::PathBuf;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Validate a job file and list its steps
    Check {
        /// Path to the job file
        file: PathBuf,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
pub fn handle_job_command(command: JobCommands) -> Result<()> {
    match command {
        JobCommands::Check { file } => {
            let job = JobDefinition::from_file(&file)
                .with_context(|| format!("Invalid job file {}", file.display()))?;

            println!(
                "{}",
                format!("Job {} has {} step(s):", job.display_name(), job.steps.len()).bold()
            );
            println!();
            for (index, step) in job.steps.iter().enumerate() {
                println!("  {} {}. {}", "▸".cyan(), index + 1, step.id().bold());
                println!(
                    "    Box:          {} (profile {})",
                    step.box_id(),
                    step.profile()
                );
                println!(
                    "    Target:       {} / {} x{}",
                    step.workspace(),
                    step.environment(),
                    step.instances()
                );
                println!();
            }

            Ok(())
        }
    }
}
