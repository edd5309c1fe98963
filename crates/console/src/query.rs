use crate::config::Settings;
use anyhow::Context;
use ddi_core::{
    ExportOutcome, PredictionBackend, PredictionReport, PredictionSession, RankedClass,
    SessionOptions, SessionState,
};

pub(crate) struct QueryOptions {
    pub(crate) json: bool,
    pub(crate) export: bool,
}

/// Runs a single submission and prints the report to stdout.
pub(crate) async fn run(
    settings: &Settings,
    backend: &dyn PredictionBackend,
    drug1: &str,
    drug2: &str,
    options: QueryOptions,
) -> anyhow::Result<()> {
    let mut session = PredictionSession::new(SessionOptions {
        request_timeout: settings.request_timeout,
    });
    let report = match session
        .submit(backend, drug1, drug2, &settings.endpoint)
        .await
    {
        SessionState::Success(report) => report.clone(),
        SessionState::Error(message) => anyhow::bail!("{message}"),
        other => anyhow::bail!("prediction ended in unexpected state {}", other.name()),
    };

    if options.json {
        let payload = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{payload}");
    } else {
        print!("{}", report_text(&report));
    }

    if options.export {
        match session.export_history(&settings.export_dir)? {
            ExportOutcome::Written(path) => eprintln!("history saved to {}", path.display()),
            ExportOutcome::NothingToExport => eprintln!("No history to download!"),
        }
    }
    Ok(())
}

pub(crate) fn report_text(report: &PredictionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  (queried {})\n", report.pair(), report.queried_at));
    out.push_str(&format!(
        "Interaction: {}\n",
        report.response.interaction.label
    ));
    push_rows(&mut out, &report.interaction_top);
    out.push_str(&format!(
        "Severity: {} [{}]\n",
        report.response.severity.label, report.tier
    ));
    push_rows(&mut out, &report.severity_top);
    out
}

fn push_rows(out: &mut String, rows: &[RankedClass]) {
    let width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);
    for row in rows {
        out.push_str(&format!("  {:<width$}  {:>6}\n", row.name, row.percent()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ddi_core::{BackendReply, TransportError};
    use protocol::PredictionRequest;
    use std::path::PathBuf;

    struct FixedBackend(BackendReply);

    #[async_trait]
    impl PredictionBackend for FixedBackend {
        async fn post_prediction(
            &self,
            _endpoint: &str,
            _request: &PredictionRequest,
        ) -> Result<BackendReply, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn settings(export_dir: PathBuf) -> Settings {
        Settings {
            endpoint: "http://127.0.0.1:5000/predict".to_string(),
            request_timeout: None,
            connect_timeout: std::time::Duration::from_secs(1),
            export_dir,
        }
    }

    fn sample_report() -> PredictionReport {
        let response = serde_json::from_str(
            r#"{
                "interaction": {"label": "Synergistic", "classes": ["Synergistic", "None"], "scores": [0.82, 0.18]},
                "severity": {"label": "Major", "classes": ["Major", "Moderate"], "scores": [0.7, 0.3]}
            }"#,
        )
        .unwrap();
        PredictionReport::build(
            "Aspirin".to_string(),
            "Warfarin".to_string(),
            "2026-10-19T10:00:00Z".to_string(),
            response,
        )
    }

    #[test]
    fn text_report_lists_top_rows() {
        let text = report_text(&sample_report());
        assert_eq!(
            text,
            "Aspirin + Warfarin  (queried 2026-10-19T10:00:00Z)\n\
             Interaction: Synergistic\n\
             \x20 Synergistic   82.0%\n\
             \x20 None          18.0%\n\
             Severity: Major [high]\n\
             \x20 Major      70.0%\n\
             \x20 Moderate   30.0%\n"
        );
    }

    #[tokio::test]
    async fn server_error_becomes_command_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FixedBackend(BackendReply::new(500, r#"{"error":"model unavailable"}"#));
        let err = run(
            &settings(dir.path().to_path_buf()),
            &backend,
            "Aspirin",
            "Warfarin",
            QueryOptions {
                json: false,
                export: true,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn blank_drug_fails_with_validation_message() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FixedBackend(BackendReply::new(200, "{}"));
        let err = run(
            &settings(dir.path().to_path_buf()),
            &backend,
            "Aspirin",
            " ",
            QueryOptions {
                json: true,
                export: false,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Please enter both drug names.");
    }

    #[tokio::test]
    async fn export_flag_writes_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::to_string(&sample_report().response).unwrap();
        let backend = FixedBackend(BackendReply::new(200, body));
        run(
            &settings(dir.path().to_path_buf()),
            &backend,
            "Aspirin",
            "Warfarin",
            QueryOptions {
                json: true,
                export: true,
            },
        )
        .await
        .unwrap();
        let csv = std::fs::read_to_string(dir.path().join("ddi-history.csv")).unwrap();
        assert!(csv.starts_with(
            "Drug 1,Drug 2,Interaction,Severity,Time\n\"Aspirin\",\"Warfarin\""
        ));
    }
}
