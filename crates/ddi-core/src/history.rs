use crate::error::{ExportError, HistoryError};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const HISTORY_LIMIT: usize = 10;
pub const CSV_HEADER: &str = "Drug 1,Drug 2,Interaction,Severity,Time";
pub const EXPORT_FILE_NAME: &str = "ddi-history.csv";

/// One completed, successful query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    drug1: String,
    drug2: String,
    interaction_label: String,
    severity_label: String,
    timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        drug1: impl Into<String>,
        drug2: impl Into<String>,
        interaction_label: impl Into<String>,
        severity_label: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            drug1: drug1.into(),
            drug2: drug2.into(),
            interaction_label: interaction_label.into(),
            severity_label: severity_label.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn drug1(&self) -> &str {
        &self.drug1
    }

    pub fn drug2(&self) -> &str {
        &self.drug2
    }

    pub fn interaction_label(&self) -> &str {
        &self.interaction_label
    }

    pub fn severity_label(&self) -> &str {
        &self.severity_label
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn csv_fields(&self) -> [&str; 5] {
        [
            &self.drug1,
            &self.drug2,
            &self.interaction_label,
            &self.severity_label,
            &self.timestamp,
        ]
    }
}

/// Newest-first log of successful queries, bounded at `capacity`.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_LIMIT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        self.entries.get(index).ok_or(HistoryError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Header row plus one fully quoted row per entry, newest-first.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        for entry in &self.entries {
            writer.write_record(entry.csv_fields())?;
        }
        writer.flush()?;
        let rows = writer
            .into_inner()
            .map_err(|err| {
                ExportError::Io(std::io::Error::new(
                    err.error().kind(),
                    err.error().to_string(),
                ))
            })?;

        let mut out = String::with_capacity(CSV_HEADER.len() + 1 + rows.len());
        out.push_str(CSV_HEADER);
        out.push('\n');
        out.push_str(&String::from_utf8_lossy(&rows));
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    NothingToExport,
}

/// Writes `dir/ddi-history.csv`. An empty history writes nothing.
pub fn export_csv(history: &QueryHistory, dir: &Path) -> Result<ExportOutcome, ExportError> {
    if history.is_empty() {
        return Ok(ExportOutcome::NothingToExport);
    }
    let csv = history.to_csv()?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, csv)?;
    tracing::info!(path = %path.display(), rows = history.len(), "history exported");
    Ok(ExportOutcome::Written(path))
}

pub fn format_timestamp(time: SystemTime) -> String {
    humantime::format_rfc3339_seconds(time).to_string()
}
