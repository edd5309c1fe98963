use ddi_core::{
    ExportOutcome, PendingSubmission, PredictionError, PredictionSession, SessionState,
};
use protocol::PredictionResponse;
use ratatui::widgets::ListState;
use std::path::PathBuf;

pub(crate) const EMPTY_EXPORT_NOTICE: &str = "No history to download!";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Drug1,
    Drug2,
    Endpoint,
    History,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Drug1, Focus::Drug2, Focus::Endpoint, Focus::History];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub(crate) fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub(crate) enum UiEvent {
    Completed {
        pending: PendingSubmission,
        outcome: Result<PredictionResponse, PredictionError>,
    },
}

/// Presentation state around the session: input fields, focus, selection
/// and the one-line notice shown in the footer.
pub(crate) struct AppState {
    pub(crate) session: PredictionSession,
    pub(crate) drug1: String,
    pub(crate) drug2: String,
    pub(crate) endpoint: String,
    pub(crate) focus: Focus,
    pub(crate) history_selected: usize,
    pub(crate) history_list_state: ListState,
    pub(crate) notice: Option<String>,
    pub(crate) confirm_quit: bool,
    export_dir: PathBuf,
}

impl AppState {
    pub(crate) fn new(session: PredictionSession, endpoint: String, export_dir: PathBuf) -> Self {
        Self {
            session,
            drug1: String::new(),
            drug2: String::new(),
            endpoint,
            focus: Focus::default(),
            history_selected: 0,
            history_list_state: ListState::default(),
            notice: None,
            confirm_quit: false,
            export_dir,
        }
    }

    pub(crate) fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Completed { pending, outcome } => {
                let state = self.session.complete(pending, outcome);
                if matches!(state, SessionState::Success(_)) {
                    self.history_selected = 0;
                }
                self.sync_history_selection();
            }
        }
    }

    pub(crate) fn submit(&mut self) -> Option<PendingSubmission> {
        if self.session.is_busy() {
            return None;
        }
        self.notice = None;
        self.session.begin(&self.drug1, &self.drug2, &self.endpoint)
    }

    /// Empties the drug inputs and drops the shown result or error.
    pub(crate) fn clear(&mut self) {
        self.drug1.clear();
        self.drug2.clear();
        self.notice = None;
        self.session.clear();
        if self.focus == Focus::Drug2 {
            self.focus = Focus::Drug1;
        }
    }

    /// Copies the selected history pair back into the inputs.
    pub(crate) fn recall_selected(&mut self) {
        match self.session.recall(self.history_selected) {
            Ok((drug1, drug2)) => {
                self.drug1 = drug1.to_string();
                self.drug2 = drug2.to_string();
                self.focus = Focus::Drug1;
                self.notice = Some(format!("Loaded {} + {}", self.drug1, self.drug2));
            }
            Err(err) => tracing::debug!(error = %err, "nothing to recall"),
        }
    }

    pub(crate) fn export_history(&mut self) {
        let notice = match self.session.export_history(&self.export_dir) {
            Ok(ExportOutcome::Written(path)) => format!("Saved {}", path.display()),
            Ok(ExportOutcome::NothingToExport) => EMPTY_EXPORT_NOTICE.to_string(),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    dir = %self.export_dir.display(),
                    "history export failed"
                );
                format!("Export failed: {err}")
            }
        };
        self.notice = Some(notice);
    }

    pub(crate) fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Drug1 => Some(&mut self.drug1),
            Focus::Drug2 => Some(&mut self.drug2),
            Focus::Endpoint => Some(&mut self.endpoint),
            Focus::History => None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.sync_history_selection();
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        self.sync_history_selection();
    }

    pub(crate) fn select_next(&mut self) {
        let len = self.session.history().len();
        if len == 0 {
            return;
        }
        self.history_selected = (self.history_selected + 1) % len;
        self.sync_history_selection();
    }

    pub(crate) fn select_prev(&mut self) {
        let len = self.session.history().len();
        if len == 0 {
            return;
        }
        self.history_selected = if self.history_selected == 0 {
            len - 1
        } else {
            self.history_selected - 1
        };
        self.sync_history_selection();
    }

    fn sync_history_selection(&mut self) {
        let len = self.session.history().len();
        if len == 0 {
            self.history_selected = 0;
            self.history_list_state.select(None);
        } else {
            self.history_selected = self.history_selected.min(len - 1);
            self.history_list_state.select(Some(self.history_selected));
        }
    }
}
