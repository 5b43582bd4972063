//! Per-run fetch report and its terminal rendering.

use crate::data::{FetchError, SeriesOutcome};
use crate::domain::ObservationWindow;

pub mod format;

pub use format::format_run_summary;

/// How one `(country, source)` fetch went.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub rows: usize,
    pub populated: usize,
    /// `None` when the source answered and parsed.
    pub error: Option<FetchError>,
}

impl SourceStatus {
    pub fn from_outcome(outcome: &SeriesOutcome) -> Self {
        Self {
            rows: outcome.series().len(),
            populated: outcome.series().populated(),
            error: outcome.error().cloned(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryReport {
    pub code: String,
    pub bond: SourceStatus,
    pub cds: SourceStatus,
}

/// Outcome of every fetch in a run, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub window: ObservationWindow,
    pub countries: Vec<CountryReport>,
}

impl FetchReport {
    pub fn new(window: ObservationWindow) -> Self {
        Self {
            window,
            countries: Vec::new(),
        }
    }

    /// Number of `(country, source)` pairs that fell back.
    pub fn fallback_count(&self) -> usize {
        self.countries
            .iter()
            .map(|c| usize::from(!c.bond.is_complete()) + usize::from(!c.cds.is_complete()))
            .sum()
    }

    pub fn bond_failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.countries
            .iter()
            .filter_map(|c| c.bond.error.as_ref().map(|e| (c.code.as_str(), e)))
    }

    pub fn cds_failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.countries
            .iter()
            .filter_map(|c| c.cds.error.as_ref().map(|e| (c.code.as_str(), e)))
    }
}
