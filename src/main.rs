use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use fever_triage::algorithm::triage::{assess, reevaluate_records};
use fever_triage::models::{OwnerFilter, RawAssessmentForm};
use fever_triage::store::{InMemoryRecordStore, RecordStore};
use fever_triage::utils::io::{read_records, write_records};
use fever_triage::utils::logging::{create_spinner, finish_spinner, init_logging};
use fever_triage::{AppConfig, AppState, create_router};

/// Febrile patient triage service
#[derive(Parser, Debug)]
#[command(name = "fever-triage")]
#[command(version, about = "Decision support for triaging febrile patients")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the JSON HTTP API
    Serve {
        /// Listen address; overrides FEVER_TRIAGE_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// Parquet snapshot file; overrides FEVER_TRIAGE_DATA_FILE
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Evaluate one assessment form (JSON) and print the result
    Assess {
        /// Path to the form
        form: PathBuf,
    },

    /// Copy a record snapshot to a new Parquet file
    Export {
        /// Snapshot to read
        #[arg(long)]
        data: PathBuf,
        /// File to write
        #[arg(long)]
        output: PathBuf,
        /// Assign records without an owner to this user id
        #[arg(long)]
        reassign_to: Option<String>,
        /// Recompute every diagnosis with the current rules
        #[arg(long)]
        reevaluate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    match Cli::parse().command {
        Commands::Serve { bind, data } => serve(bind, data).await,
        Commands::Assess { form } => assess_file(&form),
        Commands::Export {
            data,
            output,
            reassign_to,
            reevaluate,
        } => export(data, output, reassign_to, reevaluate).await,
    }
}

async fn serve(bind: Option<SocketAddr>, data: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_process_env().context("Invalid configuration")?;
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    if data.is_some() {
        config.data_file = data;
    }
    info!("Starting fever-triage with configuration:\n{config}");

    let bind_address = config.bind_address;
    let state = AppState::from_config(config).context("Failed to initialize application state")?;
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!("Listening on {bind_address}");
    axum::serve(listener, create_router(state))
        .await
        .context("Server error")?;
    Ok(())
}

fn assess_file(path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let form: RawAssessmentForm =
        serde_json::from_str(&text).context("Form is not a valid assessment document")?;

    let (_, result) = assess(&form, Utc::now().date_naive())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn export(
    data: PathBuf,
    output: PathBuf,
    reassign_to: Option<String>,
    reevaluate: bool,
) -> anyhow::Result<()> {
    let spinner = create_spinner("Reading records");
    let mut records = read_records(&data)
        .with_context(|| format!("Failed to read snapshot {}", data.display()))?;

    if reevaluate {
        spinner.set_message("Re-evaluating records");
        reevaluate_records(&mut records, Utc::now().date_naive());
    }

    if let Some(owner) = reassign_to {
        let store = InMemoryRecordStore::from_records(records);
        let changed = store.reassign_unowned(&owner).await?;
        info!("Reassigned {changed} records to {owner}");
        records = store.list(&OwnerFilter::All).await?;
    }

    spinner.set_message("Writing records");
    write_records(&output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    finish_spinner(
        &spinner,
        &format!("Exported {} records to {}", records.len(), output.display()),
    );
    Ok(())
}
