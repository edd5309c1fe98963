use crate::backend::{classify_reply, PredictionBackend};
use crate::error::{ExportError, HistoryError, PredictionError, TransportError};
use crate::history::{export_csv, format_timestamp, ExportOutcome, HistoryEntry, QueryHistory};
use crate::ranking::{rank_top, RankedClass};
use crate::severity::{classify, Tier};
use protocol::config::{parse_http_endpoint, DEFAULT_REQUEST_TIMEOUT_MS};
use protocol::{PredictionRequest, PredictionResponse};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// `None` waits on the transport forever.
    pub request_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
        }
    }
}

/// The single request a session is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub id: Uuid,
    pub drug1: String,
    pub drug2: String,
    pub endpoint: String,
    pub submitted_at: SystemTime,
}

impl PendingSubmission {
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest::new(self.drug1.clone(), self.drug2.clone())
    }
}

/// A successful prediction, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub drug1: String,
    pub drug2: String,
    pub queried_at: String,
    pub response: PredictionResponse,
    pub interaction_top: Vec<RankedClass>,
    pub severity_top: Vec<RankedClass>,
    pub tier: Tier,
}

impl PredictionReport {
    pub fn build(
        drug1: String,
        drug2: String,
        queried_at: String,
        response: PredictionResponse,
    ) -> Self {
        let interaction_top =
            rank_top(&response.interaction.classes, &response.interaction.scores);
        let severity_top = rank_top(&response.severity.classes, &response.severity.scores);
        let tier = classify(&response.severity.label);
        Self {
            drug1,
            drug2,
            queried_at,
            response,
            interaction_top,
            severity_top,
            tier,
        }
    }

    pub fn pair(&self) -> String {
        format!("{} + {}", self.drug1, self.drug2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting(PendingSubmission),
    Success(Box<PredictionReport>),
    Error(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting(_) => "submitting",
            SessionState::Success(_) => "success",
            SessionState::Error(_) => "error",
        }
    }
}

/// Owns the lifecycle of one query at a time plus the session's history.
pub struct PredictionSession {
    state: SessionState,
    history: QueryHistory,
    options: SessionOptions,
}

impl Default for PredictionSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl PredictionSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            state: SessionState::Idle,
            history: QueryHistory::new(),
            options,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Submitting(_))
    }

    /// Validates the inputs and moves to `Submitting`.
    ///
    /// Returns `None` without touching the network when either drug name is
    /// blank or the endpoint is not an http(s) URL (state becomes `Error`),
    /// or when a request is already in flight (state is left alone).
    pub fn begin(
        &mut self,
        drug1: &str,
        drug2: &str,
        endpoint: &str,
    ) -> Option<PendingSubmission> {
        if let SessionState::Submitting(pending) = &self.state {
            tracing::warn!(id = %pending.id, "submission ignored; request already in flight");
            return None;
        }
        let drug1 = drug1.trim();
        let drug2 = drug2.trim();
        if drug1.is_empty() || drug2.is_empty() {
            self.transition(SessionState::Error(PredictionError::Validation.to_string()));
            return None;
        }
        if let Err(reason) = parse_http_endpoint(endpoint) {
            tracing::warn!(endpoint = %endpoint, reason = %reason, "submission rejected");
            let err = PredictionError::InvalidEndpoint(reason);
            self.transition(SessionState::Error(err.to_string()));
            return None;
        }
        let pending = PendingSubmission {
            id: Uuid::new_v4(),
            drug1: drug1.to_string(),
            drug2: drug2.to_string(),
            endpoint: endpoint.trim().to_string(),
            submitted_at: SystemTime::now(),
        };
        tracing::info!(
            id = %pending.id,
            drug1 = %pending.drug1,
            drug2 = %pending.drug2,
            endpoint = %pending.endpoint,
            "prediction submitted"
        );
        self.transition(SessionState::Submitting(pending.clone()));
        Some(pending)
    }

    /// Settles the in-flight request. Always leaves `Submitting`.
    ///
    /// A completion for a request other than the in-flight one is dropped.
    pub fn complete(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<PredictionResponse, PredictionError>,
    ) -> &SessionState {
        let in_flight = matches!(
            &self.state,
            SessionState::Submitting(current) if current.id == pending.id
        );
        if !in_flight {
            tracing::warn!(
                id = %pending.id,
                state = self.state.name(),
                "stale completion ignored"
            );
            return &self.state;
        }
        match outcome {
            Ok(response) => {
                let queried_at = format_timestamp(SystemTime::now());
                self.history.push(HistoryEntry::new(
                    pending.drug1.clone(),
                    pending.drug2.clone(),
                    response.interaction.label.clone(),
                    response.severity.label.clone(),
                    queried_at.clone(),
                ));
                let report =
                    PredictionReport::build(pending.drug1, pending.drug2, queried_at, response);
                tracing::info!(
                    id = %pending.id,
                    interaction = %report.response.interaction.label,
                    severity = %report.response.severity.label,
                    tier = %report.tier,
                    history_len = self.history.len(),
                    "prediction succeeded"
                );
                self.transition(SessionState::Success(Box::new(report)));
            }
            Err(err) => {
                tracing::warn!(id = %pending.id, error = %err, "prediction failed");
                self.transition(SessionState::Error(err.to_string()));
            }
        }
        &self.state
    }

    /// Runs one full submission cycle against `backend`.
    pub async fn submit(
        &mut self,
        backend: &dyn PredictionBackend,
        drug1: &str,
        drug2: &str,
        endpoint: &str,
    ) -> &SessionState {
        let Some(pending) = self.begin(drug1, drug2, endpoint) else {
            return &self.state;
        };
        let outcome = dispatch(backend, &pending, self.options.request_timeout).await;
        self.complete(pending, outcome)
    }

    /// Drops a shown result or error. Has no effect while a request is in flight.
    pub fn clear(&mut self) {
        if self.is_busy() {
            return;
        }
        self.transition(SessionState::Idle);
    }

    /// The drug pair stored at `index`, for refilling the inputs.
    pub fn recall(&self, index: usize) -> Result<(&str, &str), HistoryError> {
        let entry = self.history.get(index)?;
        Ok((entry.drug1(), entry.drug2()))
    }

    pub fn export_history(&self, dir: &Path) -> Result<ExportOutcome, ExportError> {
        export_csv(&self.history, dir)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }
}

/// Sends `pending` to the backend and classifies what comes back.
///
/// Runs without the session borrowed so a UI loop can await it elsewhere.
pub async fn dispatch(
    backend: &dyn PredictionBackend,
    pending: &PendingSubmission,
    timeout: Option<Duration>,
) -> Result<PredictionResponse, PredictionError> {
    let request = pending.request();
    let call = backend.post_prediction(&pending.endpoint, &request);
    let reply = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(reply) => reply,
            Err(_) => Err(TransportError(format!(
                "request timed out after {}ms",
                limit.as_millis()
            ))),
        },
        None => call.await,
    }?;
    classify_reply(&reply)
}
