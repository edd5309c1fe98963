use crate::cli::Args;
use anyhow::Context;
use protocol::config::{
    parse_http_endpoint, ClientConfig, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_ENDPOINT,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_EXPORT_DIR: &str = ".";

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) endpoint: String,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) connect_timeout: Duration,
    pub(crate) export_dir: PathBuf,
}

pub(crate) fn load_client_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ClientConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

pub(crate) fn resolve_settings(args: &Args, config: ClientConfig) -> anyhow::Result<Settings> {
    let backend = config.backend.unwrap_or_default();
    let export = config.export.unwrap_or_default();

    let endpoint = args
        .endpoint
        .clone()
        .or(backend.endpoint)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
        .trim()
        .to_string();
    if let Err(reason) = parse_http_endpoint(&endpoint) {
        anyhow::bail!("endpoint must be an http(s) URL, got {endpoint:?}: {reason}");
    }

    let request_timeout = match backend
        .request_timeout_ms
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let connect_timeout_ms = backend
        .connect_timeout_ms
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
    if connect_timeout_ms == 0 {
        anyhow::bail!("backend.connect_timeout_ms must be greater than 0");
    }

    let export_dir = args
        .export_dir
        .clone()
        .or_else(|| export.dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));

    Ok(Settings {
        endpoint,
        request_timeout,
        connect_timeout: Duration::from_millis(connect_timeout_ms),
        export_dir,
    })
}
