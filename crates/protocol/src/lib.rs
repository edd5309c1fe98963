use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod config;

/// Body of the POST sent to the prediction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRequest {
    pub drug1: String,
    pub drug2: String,
}

impl PredictionRequest {
    pub fn new(drug1: impl Into<String>, drug2: impl Into<String>) -> Self {
        Self {
            drug1: drug1.into(),
            drug2: drug2.into(),
        }
    }
}

/// A categorical distribution returned by the backend.
///
/// `scores` is parallel-indexed to `classes`. A `null` score reads as 0; a
/// short `scores` array is padded with 0 at ranking time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Distribution {
    pub label: String,
    pub classes: Vec<String>,
    #[serde(deserialize_with = "scores_or_zero")]
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub interaction: Distribution,
    pub severity: Distribution,
}

/// Body of a non-2xx reply. The `error` field is optional and may hold any
/// JSON value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorBody {
    /// Text to show for `error`. Falsy values (`null`, `false`, `0`, blank
    /// strings) give `None` so the caller falls back to its generic message.
    pub fn message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

fn scores_or_zero<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|score| score.unwrap_or(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_backend_field_names() {
        let request = PredictionRequest::new("Aspirin", "Warfarin");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"drug1": "Aspirin", "drug2": "Warfarin"})
        );
    }

    #[test]
    fn response_parses_full_payload() {
        let body = r#"{
            "interaction": {"label": "Synergistic", "classes": ["Synergistic", "None"], "scores": [0.82, 0.18]},
            "severity": {"label": "Major", "classes": ["Major", "Moderate"], "scores": [0.7, 0.3]}
        }"#;
        let response: PredictionResponse = serde_json::from_str(body).expect("deserialize");
        assert_eq!(response.interaction.label, "Synergistic");
        assert_eq!(response.severity.classes, vec!["Major", "Moderate"]);
        assert_eq!(response.interaction.scores, vec![0.82, 0.18]);
    }

    #[test]
    fn null_scores_read_as_zero() {
        let body = r#"{"label": "x", "classes": ["a", "b"], "scores": [null, 0.4]}"#;
        let dist: Distribution = serde_json::from_str(body).expect("deserialize");
        assert_eq!(dist.scores, vec![0.0, 0.4]);
    }

    #[test]
    fn response_without_severity_label_is_rejected() {
        let body = r#"{
            "interaction": {"label": "Synergistic", "classes": [], "scores": []},
            "severity": {"classes": [], "scores": []}
        }"#;
        assert!(serde_json::from_str::<PredictionResponse>(body).is_err());
    }

    #[test]
    fn error_body_field_is_optional() {
        let body: ErrorBody = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(body.message(), None);
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "model unavailable"}"#).expect("deserialize");
        assert_eq!(body.message().as_deref(), Some("model unavailable"));
    }

    #[test]
    fn non_string_error_is_rendered() {
        let message = |raw: &str| {
            serde_json::from_str::<ErrorBody>(raw)
                .expect("deserialize")
                .message()
        };
        assert_eq!(message(r#"{"error": 404}"#).as_deref(), Some("404"));
        assert_eq!(message(r#"{"error": true}"#).as_deref(), Some("true"));
        assert_eq!(
            message(r#"{"error": {"code": 7}}"#).as_deref(),
            Some(r#"{"code":7}"#)
        );
        assert_eq!(message(r#"{"error": null}"#), None);
        assert_eq!(message(r#"{"error": 0}"#), None);
        assert_eq!(message(r#"{"error": "  "}"#), None);
    }
}
