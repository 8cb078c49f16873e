//! Syncs `OmniFocus` tasks into the Habitica todo list.
//!
//! Usage:
//!
//! ```text
//! habitifocus [--config <path>] [--userid <id>] [--apikey <key>]
//!             [--concurrency <n>] [--timeout <secs>] [--dry-run] [--debug]
//! ```
//!
//! Credentials come from `~/.habitifocus.toml`, `HABITIFOCUS_USERID` and
//! `HABITIFOCUS_APIKEY`, or the flags above, later sources winning. The
//! process exits non-zero when configuration is invalid, a snapshot cannot
//! be read, or an action fails. Interrupting the run with Ctrl-C abandons
//! in-flight requests; the next run converges.

use camino::Utf8PathBuf;
use clap::Parser;
use habitifocus::config::{AppConfig, ConfigError, ConfigOverrides, ProcessEnv, Secret};
use habitifocus::sync::{
    adapters::{habitica::HabiticaClient, omnifocus::OmniFocusTaskSource},
    domain::SyncAction,
    ports::RemoteTaskStoreError,
    services::{Reconciler, SyncError},
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type LiveReconciler = Reconciler<OmniFocusTaskSource, HabiticaClient>;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "habitifocus", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Habitica user ID.
    #[arg(long = "userid", value_name = "ID")]
    user_id: Option<String>,

    /// Habitica API token.
    #[arg(long = "apikey", value_name = "KEY")]
    api_key: Option<String>,

    /// Maximum actions of one pass in flight at once.
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Abandon the run after this many seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Log the planned actions without applying them.
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            user_id: self.user_id.clone(),
            api_key: self.api_key.clone().map(Secret::new),
            concurrency: self.concurrency,
        }
    }

    fn run_timeout(&self) -> Result<Option<Duration>, CliError> {
        match self.timeout_secs {
            Some(0) => Err(CliError::InvalidArgs(
                "--timeout must be greater than 0".to_owned(),
            )),
            other => Ok(other.map(Duration::from_secs)),
        }
    }
}

/// Errors that end the process with a failure status.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialise Habitica client: {0}")]
    Client(#[source] RemoteTaskStoreError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("sync interrupted")]
    Interrupted,
    #[error("sync did not finish within {0:?}")]
    TimedOut(Duration),
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "sync failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("habitifocus={default_level},warn"))
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        warn!("tracing subscriber already installed");
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let run_timeout = args.run_timeout()?;
    let config = AppConfig::load(args.config.as_deref())?
        .with_env(&ProcessEnv)
        .with_overrides(args.overrides());
    config.validate()?;

    let local = OmniFocusTaskSource::new(config.omnifocus_config()?);
    let remote = HabiticaClient::new(config.habitica_config()?).map_err(CliError::Client)?;
    let reconciler = Reconciler::new(Arc::new(local), Arc::new(remote))
        .with_config(config.reconciler_config()?);

    let runtime = build_runtime()?;
    runtime.block_on(async {
        let work = async {
            if args.dry_run {
                dry_run(&reconciler).await
            } else {
                sync(&reconciler).await
            }
        };
        let limited = async {
            match run_timeout {
                Some(limit) => match tokio::time::timeout(limit, work).await {
                    Ok(result) => result,
                    Err(_) => Err(CliError::TimedOut(limit)),
                },
                None => work.await,
            }
        };

        tokio::select! {
            result = limited => result,
            Ok(()) = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
        }
    })
}

async fn sync(reconciler: &LiveReconciler) -> Result<(), CliError> {
    let report = reconciler.run().await?;
    info!(
        planned = report.planned(),
        applied = report.applied(),
        touched = report.touched().len(),
        "sync complete"
    );
    Ok(())
}

async fn dry_run(reconciler: &LiveReconciler) -> Result<(), CliError> {
    let plan = reconciler.plan().await?;
    for action in plan.actions() {
        match &action {
            SyncAction::Create(task) => {
                info!(alias = %task.alias(), text = task.text(), "would create");
            }
            SyncAction::Complete(alias) => info!(alias = %alias, "would complete"),
            SyncAction::Delete(alias) => info!(alias = %alias, "would delete"),
        }
    }
    info!(planned = plan.len(), "dry run complete");
    Ok(())
}

fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)
}
