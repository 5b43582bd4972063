//! Sovereign 5y CDS spreads scraped from worldgovernmentbonds.com.
//!
//! The quote endpoint is not documented and is discovered per request:
//!
//! 1. GET the country's history page and pull `jsGlobalVars` out of it.
//! 2. POST `{"GLOBALVAR": <jsGlobalVars>}` to `jsGlobalVars.ENDPOINT` with
//!    browser-like origin headers, and read `result.quote` from the reply.
//!
//! Stage 2 is never attempted when stage 1 fails.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::data::extract::{JsGlobalVarsExtractor, VariableExtractor};
use crate::data::http::HttpTransport;
use crate::data::outcome::{FetchError, SeriesOutcome};
use crate::data::parse::{parse_date, value_from_json};
use crate::domain::{ObservationWindow, ValueField};

pub const CDS_SITE_URL: &str = "https://www.worldgovernmentbonds.com";

const DATE_FIELD: &str = "DATA_VAL";
const CLOSE_FIELD: &str = "CLOSE_VAL";

const USER_AGENT: &str = "Mozilla/5.0";

/// Fetches one country's daily 5y CDS spread series.
pub struct CdsSeriesFetcher<'a> {
    transport: &'a dyn HttpTransport,
    extractor: Box<dyn VariableExtractor + 'a>,
    window: ObservationWindow,
    site_url: String,
}

impl<'a> CdsSeriesFetcher<'a> {
    pub fn new(transport: &'a dyn HttpTransport, window: ObservationWindow) -> Self {
        Self {
            transport,
            extractor: Box::new(JsGlobalVarsExtractor),
            window,
            site_url: CDS_SITE_URL.to_string(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn VariableExtractor + 'a>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    /// Site root without a trailing slash; also the `origin`/`referer` of
    /// the quote request.
    fn site_root(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// History page for the country identified by `slug`.
    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/cds-historical-data/{slug}/5-years/", self.site_root())
    }

    /// Fetch the series for `iso` using the page identified by `slug`.
    /// Never fails; see `SeriesOutcome`.
    pub fn fetch(&self, iso: &str, slug: &str) -> SeriesOutcome {
        let result = self.fetch_observations(iso, slug);
        SeriesOutcome::from_result(iso, ValueField::CdsSpread, &self.window, result)
    }

    fn fetch_observations(&self, iso: &str, slug: &str) -> Result<Vec<(NaiveDate, Option<f64>)>, FetchError> {
        // Stage 1: discover the endpoint.
        let page_url = self.page_url(slug);
        let page = self.transport.get(&page_url)?;
        if !page.is_success() {
            return Err(FetchError::Transport(format!(
                "CDS page for {iso} returned status {}",
                page.status
            )));
        }
        let vars = self.extractor.extract(&page.body)?;
        let endpoint = vars
            .get("ENDPOINT")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::Schema("jsGlobalVars has no ENDPOINT".into()))?
            .to_string();
        debug!(country = iso, endpoint = %endpoint, "discovered CDS endpoint");

        // Stage 2: query it.
        let payload = json!({ "GLOBALVAR": Value::Object(vars) });
        let site = self.site_root();
        let headers = [("User-Agent", USER_AGENT), ("origin", site), ("referer", site)];
        let resp = self.transport.post_json(&endpoint, &payload, &headers)?;
        if !resp.is_success() {
            return Err(FetchError::Transport(format!(
                "CDS quote request for {iso} returned status {}",
                resp.status
            )));
        }
        let observations = parse_quote_table(&resp.body)?;
        debug!(country = iso, rows = observations.len(), "parsed CDS quote table");
        Ok(observations)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    quote: Value,
}

/// Parse a quote response into `(date, close)` pairs.
///
/// `result.quote` is a keyed table (`{"0": {row}, "1": {row}, ...}`); a plain
/// array of rows is accepted as well. Row order does not matter because the
/// series is aligned by date afterwards.
pub fn parse_quote_table(body: &str) -> Result<Vec<(NaiveDate, Option<f64>)>, FetchError> {
    let response: QuoteResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Schema(format!("quote response has no result.quote table: {e}")))?;

    let rows: Vec<Value> = match response.result.quote {
        Value::Object(map) => map.into_iter().map(|(_, row)| row).collect(),
        Value::Array(items) => items,
        other => {
            return Err(FetchError::Schema(format!(
                "result.quote is not a table: {other}"
            )));
        }
    };
    if rows.is_empty() {
        return Err(FetchError::Schema("quote table is empty".into()));
    }

    rows.into_iter()
        .map(|row| -> Result<(NaiveDate, Option<f64>), FetchError> {
            let date = match row.get(DATE_FIELD) {
                Some(Value::String(raw)) => parse_date(raw)?,
                Some(other) => {
                    return Err(FetchError::Schema(format!(
                        "{DATE_FIELD} is not a date string: {other}"
                    )));
                }
                None => return Err(FetchError::Schema(format!("quote row without {DATE_FIELD}"))),
            };
            let close = row.get(CLOSE_FIELD).and_then(value_from_json);
            Ok((date, close))
        })
        .collect()
}
