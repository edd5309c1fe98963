//! Client-side core for drug-drug interaction queries.
//!
//! A [`session::PredictionSession`] drives one query at a time through
//! `Idle → Submitting → Success | Error`, keeps the bounded
//! [`history::QueryHistory`] and formats replies with [`ranking`] and
//! [`severity`]. The backend is reached through [`backend::PredictionBackend`].

pub mod backend;
pub mod error;
pub mod history;
pub mod ranking;
pub mod session;
pub mod severity;

pub use backend::{BackendReply, HttpBackend, PredictionBackend};
pub use error::{ExportError, HistoryError, PredictionError, TransportError};
pub use history::{ExportOutcome, HistoryEntry, QueryHistory, HISTORY_LIMIT};
pub use ranking::{rank, RankedClass};
pub use session::{
    dispatch, PendingSubmission, PredictionReport, PredictionSession, SessionOptions, SessionState,
};
pub use severity::{classify, Tier};
