use crate::error::{PredictionError, TransportError, GENERIC_SERVER_ERROR};
use async_trait::async_trait;
use protocol::{ErrorBody, PredictionRequest, PredictionResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Raw HTTP reply before it is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
}

impl BackendReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status / 100 == 2
    }
}

/// The prediction service as seen by a session.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn post_prediction(
        &self,
        endpoint: &str,
        request: &PredictionRequest,
    ) -> Result<BackendReply, TransportError>;
}

pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| TransportError(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PredictionBackend for HttpBackend {
    async fn post_prediction(
        &self,
        endpoint: &str,
        request: &PredictionRequest,
    ) -> Result<BackendReply, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(
                    endpoint = %endpoint,
                    timeout = err.is_timeout(),
                    connect = err.is_connect(),
                    error = %err,
                    "prediction request failed"
                );
                TransportError(err.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            tracing::warn!(
                endpoint = %endpoint,
                status,
                error = %err,
                "failed to read response body"
            );
            TransportError(err.to_string())
        })?;
        tracing::debug!(endpoint = %endpoint, status, body_len = body.len(), "prediction reply");
        Ok(BackendReply { status, body })
    }
}

/// Turns a raw reply into a validated response or the matching error.
pub fn classify_reply(reply: &BackendReply) -> Result<PredictionResponse, PredictionError> {
    if !reply.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&reply.body)
            .ok()
            .and_then(|body| body.message())
            .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
        return Err(PredictionError::Backend(message));
    }
    serde_json::from_str::<PredictionResponse>(&reply.body)
        .map_err(|err| PredictionError::MalformedResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PredictionSession, SessionState};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const SUCCESS_BODY: &str = r#"{
        "interaction": {"label": "Synergistic", "classes": ["Synergistic", "None"], "scores": [0.82, 0.18]},
        "severity": {"label": "Major", "classes": ["Major", "Moderate"], "scores": [0.7, 0.3]}
    }"#;

    #[test]
    fn success_reply_parses() {
        let response = classify_reply(&BackendReply::new(200, SUCCESS_BODY)).unwrap();
        assert_eq!(response.interaction.label, "Synergistic");
        assert_eq!(response.severity.label, "Major");
    }

    #[test]
    fn error_reply_uses_server_message() {
        let reply = BackendReply::new(500, r#"{"error":"model unavailable"}"#);
        assert_eq!(
            classify_reply(&reply),
            Err(PredictionError::Backend("model unavailable".to_string()))
        );
    }

    #[test]
    fn error_reply_without_message_is_generic() {
        for body in ["{}", "<html>bad gateway</html>", "", r#"{"error": ""}"#] {
            let reply = BackendReply::new(502, body);
            assert_eq!(
                classify_reply(&reply),
                Err(PredictionError::Backend(GENERIC_SERVER_ERROR.to_string()))
            );
        }
    }

    #[test]
    fn incomplete_success_body_is_malformed() {
        let bodies = [
            "not json",
            r#"{"interaction": {"label": "x", "classes": [], "scores": []}}"#,
            r#"{"interaction": {"classes": [], "scores": []}, "severity": {"label": "y", "classes": [], "scores": []}}"#,
            r#"{"interaction": {"label": "x", "scores": []}, "severity": {"label": "y", "classes": [], "scores": []}}"#,
        ];
        for body in bodies {
            let result = classify_reply(&BackendReply::new(200, body));
            assert!(
                matches!(result, Err(PredictionError::MalformedResponse(_))),
                "body {body} should be malformed"
            );
        }
    }

    #[test]
    fn any_2xx_counts_as_success() {
        assert!(BackendReply::new(201, "").is_success());
        assert!(!BackendReply::new(302, "").is_success());
        assert!(!BackendReply::new(404, "").is_success());
    }

    #[test]
    fn error_reply_with_non_string_message() {
        let reply = BackendReply::new(404, r#"{"error": 404}"#);
        assert_eq!(
            classify_reply(&reply),
            Err(PredictionError::Backend("404".to_string()))
        );
    }

    /// Serves one canned HTTP response and hands back the raw request text.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request
        });
        (format!("http://{addr}/predict"), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn backend() -> HttpBackend {
        HttpBackend::new(Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn http_backend_posts_json_pair() {
        let (endpoint, server) = serve_once("200 OK", SUCCESS_BODY).await;
        let reply = backend()
            .post_prediction(&endpoint, &PredictionRequest::new("Aspirin", "Warfarin"))
            .await
            .unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, SUCCESS_BODY);

        let request = server.await.unwrap();
        let lowered = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /predict HTTP/1.1\r\n"), "{request}");
        assert!(lowered.contains("\r\ncontent-type: application/json\r\n"));
        assert!(lowered.contains("\r\naccept: application/json\r\n"));
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"drug1": "Aspirin", "drug2": "Warfarin"})
        );
    }

    #[tokio::test]
    async fn http_backend_keeps_error_status_and_body() {
        let body = r#"{"error":"model unavailable"}"#;
        let (endpoint, server) = serve_once("500 Internal Server Error", body).await;
        let reply = backend()
            .post_prediction(&endpoint, &PredictionRequest::new("Aspirin", "Warfarin"))
            .await
            .unwrap();
        server.await.unwrap();
        assert_eq!(reply, BackendReply::new(500, body));
        assert_eq!(
            classify_reply(&reply),
            Err(PredictionError::Backend("model unavailable".to_string()))
        );
    }

    #[tokio::test]
    async fn session_over_http_reaches_success() {
        let (endpoint, server) = serve_once("200 OK", SUCCESS_BODY).await;
        let mut session = PredictionSession::default();
        let state = session
            .submit(&backend(), "Aspirin", "Warfarin", &endpoint)
            .await;
        assert!(matches!(state, SessionState::Success(_)), "{state:?}");
        server.await.unwrap();
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/predict", listener.local_addr().unwrap());
        drop(listener);

        let mut session = PredictionSession::default();
        let state = session
            .submit(&backend(), "Aspirin", "Warfarin", &endpoint)
            .await;
        match state {
            SessionState::Error(message) => {
                assert!(message.starts_with("Network error: "), "{message}")
            }
            other => panic!("expected network error, got {other:?}"),
        }
        assert!(session.history().is_empty());
    }
}
