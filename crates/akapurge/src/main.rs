mod cli;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use akapurge_api::{PurgeClient, TransportConfig};
use akapurge_core::settings::MAIL_KEY;
use akapurge_core::{Dispatcher, TaskSet};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Default log level; `--quiet` keeps errors only and wins over `-v`.
fn log_level(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = log_level(verbosity, quiet);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Everything that can be rejected locally is rejected before the
    // first request goes out.
    let settings = akapurge_config::load_settings(&cli.config_file)?
        .with_override(MAIL_KEY, cli.mail.as_deref());
    let tasks = TaskSet::plan(&cli.purge_input(), &settings)?;

    if cli.dry_run {
        for task in tasks.iter() {
            println!("{}", output::render_task(task)?);
        }
        return Ok(());
    }

    let transport = TransportConfig::with_timeout(Duration::from_secs(cli.timeout));
    let client = PurgeClient::new(&transport)?;

    tracing::debug!(tasks = tasks.len(), "dispatching purge plan");
    let outcomes = Dispatcher::new(client).run(&tasks).await?;

    if !cli.quiet {
        for outcome in &outcomes {
            println!("{}", output::render_outcome(outcome));
        }
    }
    Ok(())
}
