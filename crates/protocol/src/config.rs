use serde::Deserialize;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    pub backend: Option<BackendConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackendConfig {
    pub endpoint: Option<String>,
    /// `0` disables the per-request timeout.
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    pub dir: Option<String>,
}

/// Parses `endpoint` as an absolute http(s) URL with a non-empty host.
///
/// The error is a short reason suitable for showing next to the input.
pub fn parse_http_endpoint(endpoint: &str) -> Result<Url, String> {
    let url = Url::parse(endpoint.trim()).map_err(|err| err.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}
