//! Upstream data sources.
//!
//! - `ecb`: 10y benchmark bond yields from the ECB statistical data warehouse
//! - `cds`: 5y CDS spreads via the two-stage page scrape
//! - `extract`: the embedded-variable extractor used by `cds`
//! - `http`: the blocking transport both fetchers are written against
//! - `outcome`: fetch error taxonomy and the complete/fallback outcome type

pub mod cds;
pub mod ecb;
pub mod extract;
pub mod http;
pub mod outcome;
pub mod parse;

pub use cds::CdsSeriesFetcher;
pub use ecb::BondSeriesFetcher;
pub use extract::{JsGlobalVarsExtractor, VariableExtractor};
pub use http::{HttpResponse, HttpTransport, Method, RecordedRequest, ReplayTransport, ReqwestTransport};
pub use outcome::{FetchError, SeriesOutcome};
