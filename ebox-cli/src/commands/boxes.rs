//! Box command handlers
//!
//! Lists the boxes of a workspace by bucket and shows single boxes.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::*;
use ebox_client::ElasticBoxApi;
use ebox_core::domain::boxes::{BoxDescriptor, BoxKind};
use ebox_runner::repository::{ApiBoxRepository, BoxRepository};
use std::sync::Arc;

use crate::config::Config;

/// Box subcommands
#[derive(Subcommand)]
pub enum BoxCommands {
    /// List the boxes of a workspace
    List {
        /// Workspace (owner) to list
        workspace: String,

        /// Which boxes to show
        #[arg(long, value_enum, default_value_t = Bucket::NoPolicy)]
        bucket: Bucket,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get box details
    Get {
        /// Box ID
        id: String,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Box buckets offered when configuring a deploy step
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Bucket {
    /// Boxes that are not policy boxes
    NoPolicy,
    /// Boxes that are neither policy nor application boxes
    NoPolicyNoApplication,
    /// Policy boxes backed by a CloudFormation template
    CloudformationPolicy,
    /// Every other policy box
    NonCloudformationPolicy,
}

impl Bucket {
    fn label(self) -> &'static str {
        match self {
            Bucket::NoPolicy => "non-policy",
            Bucket::NoPolicyNoApplication => "non-policy, non-application",
            Bucket::CloudformationPolicy => "CloudFormation policy",
            Bucket::NonCloudformationPolicy => "non-CloudFormation policy",
        }
    }
}

/// Handle box commands
///
/// # Arguments
/// * `command` - The box command to execute
/// * `config` - The CLI configuration
pub async fn handle_box_command(command: BoxCommands, config: &Config) -> Result<()> {
    let api: Arc<dyn ElasticBoxApi> = Arc::new(config.client()?);
    let repository = ApiBoxRepository::new(api);

    match command {
        BoxCommands::List {
            workspace,
            bucket,
            json,
        } => list_boxes(&repository, &workspace, bucket, json).await,
        BoxCommands::Get { id, json } => get_box(&repository, &id, json).await,
    }
}

/// List the boxes of one bucket
async fn list_boxes(
    repository: &dyn BoxRepository,
    workspace: &str,
    bucket: Bucket,
    json: bool,
) -> Result<()> {
    let boxes: Vec<BoxDescriptor> = match bucket {
        Bucket::NoPolicy => repository.get_no_policy_boxes(workspace).await?,
        Bucket::NoPolicyNoApplication => {
            repository
                .get_no_policy_and_no_application_boxes(workspace)
                .await?
        }
        Bucket::CloudformationPolicy => repository
            .get_cloud_formation_policy_boxes(workspace)
            .await?
            .into_iter()
            .map(BoxDescriptor::from)
            .collect(),
        Bucket::NonCloudformationPolicy => repository
            .get_no_cloud_formation_policy_boxes(workspace)
            .await?
            .into_iter()
            .map(BoxDescriptor::from)
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&boxes)?);
        return Ok(());
    }

    if boxes.is_empty() {
        println!(
            "{}",
            format!("No {} boxes found in {}.", bucket.label(), workspace).yellow()
        );
    } else {
        println!(
            "{}",
            format!(
                "Found {} {} box(es) in {}:",
                boxes.len(),
                bucket.label(),
                workspace
            )
            .bold()
        );
        println!();
        for descriptor in &boxes {
            print_box_summary(descriptor);
        }
    }

    Ok(())
}

/// Get and display a single box
async fn get_box(repository: &dyn BoxRepository, id: &str, json: bool) -> Result<()> {
    let descriptor = repository.get_box(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print_box_details(&descriptor);
    }

    Ok(())
}

/// Print a box summary
fn print_box_summary(descriptor: &BoxDescriptor) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        descriptor.name().unwrap_or("(unnamed)").bold(),
        format!("[{}]", colorize_kind(&descriptor.kind())).dimmed()
    );
    println!("    ID:           {}", descriptor.id().dimmed());
    if let Some(policy) = descriptor.as_policy() {
        println!(
            "    CloudFormation: {}",
            yes_no(policy.is_cloud_formation_template)
        );
    }
    println!();
}

/// Print detailed box information
fn print_box_details(descriptor: &BoxDescriptor) {
    println!("{}", "Box Details".bold().underline());
    println!();
    println!("  {}     {}", "ID:".bold(), descriptor.id());
    println!(
        "  {}   {}",
        "Name:".bold(),
        descriptor.name().unwrap_or("(unnamed)")
    );
    println!("  {}   {}", "Kind:".bold(), colorize_kind(&descriptor.kind()));

    if let Some(policy) = descriptor.as_policy() {
        println!(
            "  {} {}",
            "CloudFormation:".bold(),
            yes_no(policy.is_cloud_formation_template)
        );
        if let Some(provider) = policy.provider_type {
            println!("  {} {}", "Provider:".bold(), provider);
        }
    }
}

/// Colorize a box kind for display
fn colorize_kind(kind: &BoxKind) -> ColoredString {
    match kind {
        BoxKind::Policy => kind.as_str().magenta(),
        BoxKind::Script => kind.as_str().green(),
        BoxKind::Application => kind.as_str().blue(),
        BoxKind::Other(_) => kind.as_str().normal(),
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value { "yes".green() } else { "no".dimmed() }
}
