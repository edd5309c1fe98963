mod cli;
mod config;
mod logging;
mod query;
mod ui;

use crate::cli::{Args, Command};
use crate::config::{load_client_config, resolve_settings};
use crate::logging::init_tracing;
use crate::query::QueryOptions;
use anyhow::Context;
use clap::Parser;
use ddi_core::{HttpBackend, PredictionBackend};
use protocol::config::ClientConfig;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _file_guard = init_tracing(&args.log_dir, args.log_to_stderr)?;

    let config = match &args.config {
        Some(path) => load_client_config(path)?,
        None => ClientConfig::default(),
    };
    let settings = resolve_settings(&args, config)?;
    info!(
        endpoint = %settings.endpoint,
        export_dir = %settings.export_dir.display(),
        request_timeout_ms = settings.request_timeout.map(|t| t.as_millis() as u64),
        "ddi-console starting"
    );

    let backend: Arc<dyn PredictionBackend> = Arc::new(
        HttpBackend::new(settings.connect_timeout).context("failed to build http client")?,
    );

    match args.command {
        Some(Command::Query {
            drug1,
            drug2,
            json,
            export,
        }) => {
            query::run(
                &settings,
                backend.as_ref(),
                &drug1,
                &drug2,
                QueryOptions { json, export },
            )
            .await
        }
        None => ui::run(settings, backend).await,
    }
}
