//! ElasticBox Runner binary
//!
//! Loads a job file, deploys its boxes one step at a time and logs a summary.
//! Ctrl-C cancels the step that is currently waiting.

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ebox_runner::cancel::CancellationToken;
use ebox_runner::config::Config;
use ebox_runner::job::{JobDefinition, JobExecutor};
use ebox_runner::step::StepContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ebox_runner=info,ebox_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ElasticBox Runner");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    match &config.endpoint_url {
        Some(url) => info!("Loaded configuration: endpoint_url={}", url),
        None => warn!("No endpoint configured, deploy steps will fail"),
    }
    info!(
        "Poll interval: {:?}, deploy timeout: {:?}",
        config.poll_interval, config.deploy_timeout
    );

    let mut job = JobDefinition::from_file(&config.job_file)
        .with_context(|| format!("Failed to load job {}", config.job_file.display()))?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let executor = JobExecutor::new(StepContext::from_config(&config, cancel));

    match executor.run(&mut job).await {
        Ok(report) => {
            for step in &report.steps {
                info!(
                    "  - {} deployed box {} as instance {}",
                    step.step_id, step.box_id, step.instance_id
                );
            }
            info!("Job {} finished successfully", report.name);
            Ok(())
        }
        Err(e) => {
            error!(
                "Job {} failed after {} completed step(s): {}",
                job.display_name(),
                e.completed.len(),
                e
            );
            Err(e.into())
        }
    }
}

/// Cancels the running job on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, cancelling job");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for interrupts: {}", e),
        }
    });
}
