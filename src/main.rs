//! commit-blog - CLI entry point, normally invoked by a post-commit hook.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commit_blog::config::secrets_file_path;
use commit_blog::git::locate_repository;
use commit_blog::pipeline::{PipelineEnv, TerminalPrompter, run_with_retry};
use commit_blog::progress::{DesktopNotifier, Notifier, NoopNotifier, ProgressReporter, log_file_path};

/// Write a blog post about the latest commit using an LLM.
#[derive(Parser, Debug)]
#[command(name = "commit-blog")]
#[command(about = "Write a blog post about the latest commit using an LLM")]
#[command(version)]
struct Cli {
    /// Path inside the repository to write about
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Do not send desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Show debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let location = locate_repository(&cli.repo).with_context(|| {
        format!(
            "Not a git repository: {}. Run commit-blog from within a git repository.",
            cli.repo.display()
        )
    })?;

    let reporter = ProgressReporter::create(&log_file_path(&location.git_dir));
    let env = PipelineEnv::new(location, secrets_file_path());

    let notifier: Box<dyn Notifier> = if cli.no_notify {
        Box::new(NoopNotifier)
    } else {
        Box::new(DesktopNotifier)
    };

    let outcome = run_with_retry(&env, &TerminalPrompter, notifier.as_ref(), &reporter).await;
    Ok(ExitCode::from(outcome.exit_code()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
