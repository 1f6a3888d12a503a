use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use repo_steward::action::{self, ActionInputs, OutputSink};
use repo_steward::config::AppConfig;
use repo_steward::platform::github::GitHubPlatform;
use repo_steward::workflow::types::OperationResult;

#[derive(Parser)]
#[command(
    name = "repo-steward",
    about = "Create, delete, archive or update an organization repository"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(flatten)]
    inputs: ActionInputs,
}

async fn run(cli: &Cli) -> anyhow::Result<OperationResult> {
    let config = AppConfig::load(cli.config.as_deref())?;
    // Required inputs are checked before any client is built
    cli.inputs.required()?;

    let platform = GitHubPlatform::new(&config.github)?;
    let result = action::run(&config, &cli.inputs, Arc::new(platform)).await?;
    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let sink = OutputSink::from_env();

    let result = match run(&cli).await {
        Ok(result) => result,
        Err(e) => {
            let message = action::failure_message(&e);
            tracing::error!(error = %message, "Repository operation aborted");
            OperationResult::failure(message)
        }
    };

    action::publish(&result, &sink)
}
