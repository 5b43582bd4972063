//! ECB statistical data warehouse: 10-year benchmark bond yields.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::data::http::HttpTransport;
use crate::data::outcome::{FetchError, SeriesOutcome};
use crate::data::parse::{parse_date, parse_value};
use crate::domain::{ObservationWindow, ValueField};

pub const ECB_BASE_URL: &str = "https://sdw.ecb.europa.eu/service/data/FM";

const DATE_COLUMN: &str = "TIME_PERIOD";
const VALUE_COLUMN: &str = "OBS_VALUE";

/// Fetches one country's daily 10y yield series.
pub struct BondSeriesFetcher<'a> {
    transport: &'a dyn HttpTransport,
    window: ObservationWindow,
    base_url: String,
}

impl<'a> BondSeriesFetcher<'a> {
    pub fn new(transport: &'a dyn HttpTransport, window: ObservationWindow) -> Self {
        Self {
            transport,
            window,
            base_url: ECB_BASE_URL.to_string(),
        }
    }

    /// Point the fetcher at a different service root (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    /// Data-warehouse URL for the daily 10y benchmark yield of `iso`.
    pub fn request_url(&self, iso: &str) -> String {
        let (start, end) = self.window.iso_bounds();
        format!(
            "{}/D.{iso}.EUR.4F.BB.{iso}_10Y.YLD?startPeriod={start}&endPeriod={end}&format=csvdata",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Fetch the series for `iso`. Never fails; see `SeriesOutcome`.
    pub fn fetch(&self, iso: &str) -> SeriesOutcome {
        let result = self.fetch_observations(iso);
        SeriesOutcome::from_result(iso, ValueField::BondYield, &self.window, result)
    }

    fn fetch_observations(&self, iso: &str) -> Result<Vec<(NaiveDate, Option<f64>)>, FetchError> {
        let url = self.request_url(iso);
        let resp = self.transport.get(&url)?;
        if !resp.is_success() {
            return Err(FetchError::Transport(format!(
                "ECB request for {iso} failed with status {}",
                resp.status
            )));
        }
        let observations = parse_csvdata(&resp.body)?;
        debug!(country = iso, rows = observations.len(), "parsed ECB payload");
        Ok(observations)
    }
}

/// Parse an ECB `csvdata` payload into `(date, value)` pairs.
///
/// Only `TIME_PERIOD` and `OBS_VALUE` are read; every other column is
/// ignored. Bad values are missing, bad dates are a schema error.
pub fn parse_csvdata(body: &str) -> Result<Vec<(NaiveDate, Option<f64>)>, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::Schema(format!("failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = column_index(&header_map, DATE_COLUMN)?;
    let value_idx = column_index(&header_map, VALUE_COLUMN)?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| FetchError::Schema(format!("CSV parse error: {e}")))?;
        // +2: header line plus 1-based numbering.
        let line = idx + 2;
        let date_raw = record
            .get(date_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::Schema(format!("missing {DATE_COLUMN} on line {line}")))?;
        let date = parse_date(date_raw)?;
        let value = record.get(value_idx).and_then(parse_value);
        out.push((date, value));
    }

    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_ascii_uppercase(), idx))
        .collect()
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, FetchError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| FetchError::Schema(format!("missing required column `{name}`")))
}
