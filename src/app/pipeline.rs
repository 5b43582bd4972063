//! Collection pipeline: registry -> per-country fetches -> panels -> disk.
//!
//! `PanelAssembler` only talks to an injected `HttpTransport`, so the whole
//! collection step can be replayed offline. `run_collection` wires it to the
//! real network and the Parquet store.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::PanelConfig;
use crate::data::{BondSeriesFetcher, CdsSeriesFetcher, HttpTransport, ReqwestTransport, SeriesOutcome};
use crate::domain::{CountryRegistry, FieldMismatch, Panel, Series, ValueField};
use crate::error::AppError;
use crate::report::{CountryReport, FetchReport, SourceStatus};

/// Both panels of a run plus what happened while building them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPanels {
    pub bonds: Panel,
    pub cds: Panel,
    pub report: FetchReport,
}

/// Drives both fetchers over every registry entry, sequentially.
pub struct PanelAssembler<'a> {
    registry: &'a CountryRegistry,
    bonds: BondSeriesFetcher<'a>,
    cds: CdsSeriesFetcher<'a>,
}

impl<'a> PanelAssembler<'a> {
    /// Assembler over `config`'s registry and window, with default fetchers
    /// on `transport`.
    pub fn new(transport: &'a dyn HttpTransport, config: &'a PanelConfig) -> Self {
        Self {
            registry: &config.registry,
            bonds: BondSeriesFetcher::new(transport, config.window),
            cds: CdsSeriesFetcher::new(transport, config.window),
        }
    }

    /// Assembler with caller-built fetchers (custom URLs or extractor).
    pub fn with_fetchers(
        registry: &'a CountryRegistry,
        bonds: BondSeriesFetcher<'a>,
        cds: CdsSeriesFetcher<'a>,
    ) -> Self {
        Self { registry, bonds, cds }
    }

    /// Fetch every country and build the two sorted panels.
    ///
    /// Fetch failures never surface here: a country whose fetches fell back
    /// is present in the panels with missing values and is flagged in the
    /// report. The only error is a fetcher handing back a series of the
    /// wrong field.
    pub fn assemble(&self) -> Result<AssembledPanels, FieldMismatch> {
        let mut bond_series: Vec<Series> = Vec::with_capacity(self.registry.len());
        let mut cds_series: Vec<Series> = Vec::with_capacity(self.registry.len());
        let mut report = FetchReport::new(*self.bonds.window());

        for country in self.registry {
            let bond = self.bonds.fetch(&country.code);
            log_outcome(&country.code, ValueField::BondYield, &bond);

            let cds = self.cds.fetch(&country.code, &country.identifier);
            log_outcome(&country.code, ValueField::CdsSpread, &cds);

            report.countries.push(CountryReport {
                code: country.code.clone(),
                bond: SourceStatus::from_outcome(&bond),
                cds: SourceStatus::from_outcome(&cds),
            });
            bond_series.push(bond.into_series());
            cds_series.push(cds.into_series());
        }

        let bonds = Panel::from_series(ValueField::BondYield, bond_series)?;
        let cds = Panel::from_series(ValueField::CdsSpread, cds_series)?;
        info!(
            countries = self.registry.len(),
            bond_rows = bonds.len(),
            cds_rows = cds.len(),
            fallbacks = report.fallback_count(),
            "assembled panels"
        );

        Ok(AssembledPanels { bonds, cds, report })
    }
}

fn log_outcome(code: &str, field: ValueField, outcome: &SeriesOutcome) {
    let series = outcome.series();
    match outcome.error() {
        None => info!(
            country = code,
            field = field.column_name(),
            populated = series.populated(),
            rows = series.len(),
            "fetched series"
        ),
        Some(err) => warn!(
            country = code,
            field = field.column_name(),
            kind = err.kind(),
            error = %err,
            "fetch failed, using all-missing series"
        ),
    }
}

/// All outputs of a single collection run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub panels: AssembledPanels,
    pub written: Vec<PathBuf>,
}

/// Fetch everything over the network and persist both panels.
pub fn run_collection(config: &PanelConfig) -> Result<RunOutput, AppError> {
    let transport = ReqwestTransport::new(config.request_timeout)
        .map_err(|e| AppError::config(format!("HTTP client setup failed: {e}")))?;
    let panels = PanelAssembler::new(&transport, config)
        .assemble()
        .map_err(|e| AppError::internal(format!("panel assembly failed: {e}")))?;

    let written = crate::io::write_panels(&config.output_dir, &panels.bonds, &panels.cds)?;
    Ok(RunOutput { panels, written })
}
