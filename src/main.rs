use m3_office::adapters::ReqwestHttpClient;
use m3_office::cli::{handle_help_command, handle_version_command, parse_args, CliCommand};
use m3_office::config::OfficeConfig;
use m3_office::models::Snapshot;
use m3_office::store::StateStore;
use m3_office::sync::StateSynchronizer;
use m3_office::workstation::{Office, WorkstationView};

use color_eyre::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Printed by `--once`.
#[derive(Serialize)]
struct OnceReport<'a> {
    snapshot: &'a Snapshot,
    error: Option<String>,
    workstations: Vec<WorkstationView>,
    failed_workstations: Vec<String>,
}

/// Log to stderr so `--once` output on stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("m3_office=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let options = match parse_args(std::env::args())? {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            handle_help_command();
            return Ok(());
        }
        CliCommand::Run(options) => options,
    };

    init_logging();

    let config = OfficeConfig::from_env().apply_options(&options);
    tracing::debug!(?config, "Configuration resolved");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if options.once {
        runtime.block_on(run_once(config))
    } else {
        runtime.block_on(run(config))
    }
}

fn synchronizer_for(config: &OfficeConfig, store: &Arc<StateStore>) -> StateSynchronizer {
    let client = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout));
    StateSynchronizer::new(client, Arc::clone(store), config.state_url.clone())
}

async fn run(config: OfficeConfig) -> Result<()> {
    let store = StateStore::global();
    let mut synchronizer = synchronizer_for(&config, &store);

    if let Some(dir) = &config.dump_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut office = Office::mount(Arc::clone(&store), config.surface_width, config.surface_height);
    synchronizer.start(config.poll_interval);

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };
    office.run_until(shutdown, config.dump_dir.as_deref()).await;

    synchronizer.stop();
    Ok(())
}

async fn run_once(config: OfficeConfig) -> Result<()> {
    let store = StateStore::global();
    let synchronizer = synchronizer_for(&config, &store);

    let outcome = synchronizer.refresh_now().await;
    let office = Office::mount(Arc::clone(&store), config.surface_width, config.surface_height);

    if let Some(dir) = &config.dump_dir {
        std::fs::create_dir_all(dir)?;
        let written = office.save_all(dir)?;
        tracing::info!("Wrote {} screen(s) to {}", written.len(), dir.display());
    }

    let snapshot = store.snapshot();
    let report = OnceReport {
        snapshot: &snapshot,
        error: store.flags().error,
        workstations: office.views(),
        failed_workstations: office
            .failures()
            .iter()
            .map(|failure| format!("{}: {}", failure.agent, failure.error))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    outcome?;
    Ok(())
}
