//! Fetch error taxonomy and the per-call outcome type.
//!
//! Fetchers never return `Err`: every failure is turned into
//! `SeriesOutcome::Fallback`, which still carries a full-window series. The
//! error is kept alongside so callers can tell *why* values are missing.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{ObservationWindow, Series, ValueField};

/// Why a fetch fell back to the all-missing series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Timeout, connection failure, or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The embedded script variable was not found in the page.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Expected columns/fields are missing or could not be parsed.
    #[error("schema error: {0}")]
    Schema(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Extraction(_) => "extraction",
            FetchError::Schema(_) => "schema",
        }
    }
}

/// Result of one `(country, source)` fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    /// The source answered and its payload parsed.
    Complete(Series),
    /// Something failed; `series` is the all-missing fallback.
    Fallback { series: Series, error: FetchError },
}

impl SeriesOutcome {
    /// Build the outcome for `country` from parsed observations or an error.
    pub fn from_result(
        country: &str,
        field: ValueField,
        window: &ObservationWindow,
        result: Result<Vec<(NaiveDate, Option<f64>)>, FetchError>,
    ) -> Self {
        match result {
            Ok(observations) => SeriesOutcome::Complete(Series::aligned(country, field, window, observations)),
            Err(error) => SeriesOutcome::Fallback {
                series: Series::fallback(country, field, window),
                error,
            },
        }
    }

    pub fn series(&self) -> &Series {
        match self {
            SeriesOutcome::Complete(series) => series,
            SeriesOutcome::Fallback { series, .. } => series,
        }
    }

    pub fn into_series(self) -> Series {
        match self {
            SeriesOutcome::Complete(series) => series,
            SeriesOutcome::Fallback { series, .. } => series,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SeriesOutcome::Complete(_) => None,
            SeriesOutcome::Fallback { error, .. } => Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SeriesOutcome::Complete(_))
    }
}
