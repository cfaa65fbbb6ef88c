//! `scratchnet` command line.
//!
//! Credentials and defaults come from the environment (see
//! [`scratchnet::config`]); flags override the target and comment.

use std::process::ExitCode;

use clap::Parser;
use scratchnet::config::AutomationConfig;
use scratchnet::scratch::Pipeline;
use tracing_subscriber::EnvFilter;

/// Log in to Scratch, look up a profile and optionally comment on it.
#[derive(Debug, Parser)]
#[command(name = "scratchnet", version)]
struct Cli {
    /// Profile to visit. Overrides TARGET_USER / SCRATCH_TARGET.
    #[arg(long)]
    target: Option<String>,

    /// Comment to post. Overrides COMMENT_CONTENT.
    #[arg(long, conflicts_with = "no_comment")]
    comment: Option<String>,

    /// Skip the comment step even if COMMENT_CONTENT is set.
    #[arg(long)]
    no_comment: bool,

    /// Debug-level logging unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match AutomationConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(target) = cli.target {
        config.target = Some(target);
    }
    if let Some(comment) = cli.comment {
        config.comment = Some(comment);
    }
    if cli.no_comment {
        config.comment = None;
    }

    let Some(plan) = config.plan() else {
        tracing::info!(
            "interactive mode is not supported; set SCRATCH_USERNAME and SCRATCH_PASSWORD to run automatically"
        );
        return ExitCode::SUCCESS;
    };

    tracing::info!("credentials found, starting automatic mode");
    let outcome = Pipeline::new(config.endpoints, config.request_timeout)
        .run(&plan)
        .await;
    ExitCode::from(outcome.exit_code())
}
