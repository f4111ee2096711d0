use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vocaboo_config::Config;
use vocaboo_ui::UiMode;

mod cli;
mod commands;
mod controller;
mod events;
mod profile;
mod state;
mod store;
mod trainer;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Command};
use self::controller::{AppController, Services};
use self::state::AppState;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = profile::load_config(cli.data_dir.as_deref())?;
    init_tracing(&config);

    // stdin reads cannot be cancelled, so the runtime is shut down with a timeout
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli, config));
    runtime.shutdown_timeout(Duration::from_millis(200));

    result
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let (mode, from, to) = match cli.command() {
        Command::Add { source, target } => {
            if commands::add_word(&config, &source, &target)? {
                println!("Added: {} -> {}", source.trim(), target.trim());
            } else {
                println!("Already in the vocabulary: {} -> {}", source.trim(), target.trim());
            }
            return Ok(());
        }
        Command::Stats => {
            print!("{}", commands::stats_report(&config)?);
            return Ok(());
        }
        Command::Train => (UiMode::Train, None, None),
        Command::Lookup { from, to } => (UiMode::Lookup, from, to),
    };

    let state = Arc::new(AppState::new(config, cli.seed));
    let services = Services::from_state(&state, from, to).await?;

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(services, mode);

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("Task finished"),
                Ok(Err(e)) => tracing::error!("Task exited: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    Ok(())
}
