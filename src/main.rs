use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use estimator::commands::{run_estimate, EstimateOptions, EXIT_STARTUP_FAILURE};
use estimator::models::{ErrorKind, ErrorResponse};

/// Estimator - turn a task description into a JSON time estimate
#[derive(Parser)]
#[command(name = "estimator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Task description; prompted for interactively when omitted
    #[arg(short, long)]
    task: Option<String>,

    /// Config file (defaults to ./estimator.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the model to use
    #[arg(long)]
    model: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    url: Option<String>,

    /// Override the timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Override the maximum number of output tokens
    #[arg(long)]
    max_output_tokens: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Stdout is reserved for the JSON document, even when something panics.
    std::panic::set_hook(Box::new(|info| {
        let response = ErrorResponse::new(ErrorKind::Internal, format!("unexpected failure: {}", info));
        println!("{}", response.to_pretty_json());
    }));

    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let project_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            let response = ErrorResponse::new(
                ErrorKind::Config,
                format!("Could not determine working directory: {}", e),
            );
            println!("{}", response.to_pretty_json());
            std::process::exit(EXIT_STARTUP_FAILURE);
        }
    };

    let options = EstimateOptions {
        task: cli.task,
        config_file: cli.config,
        model: cli.model,
        url: cli.url,
        timeout: cli.timeout,
        max_output_tokens: cli.max_output_tokens,
    };

    let code = run_estimate(&project_root, options).await;
    std::process::exit(code);
}
