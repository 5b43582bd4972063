//! Offline end-to-end collection over the full EU-27 + UK registry.

use std::fs;

use sovereign_panels::app::pipeline::PanelAssembler;
use sovereign_panels::config::PanelConfig;
use sovereign_panels::data::{BondSeriesFetcher, CdsSeriesFetcher, HttpResponse, Method, ReplayTransport};
use sovereign_panels::domain::{ObservationWindow, Panel, ValueField};
use sovereign_panels::io::{BONDS_FILE, CDS_FILE, read_panel, write_panels};

const QUOTE_ENDPOINT: &str = "https://quotes.test/api";

/// Upstream fixture: ECB answers for DE and IT, the CDS page works for
/// Germany only, Greece's page has lost its script block, and everything
/// else is unreachable.
fn upstream(window: ObservationWindow) -> ReplayTransport {
    let unused = ReplayTransport::new();
    let bonds = BondSeriesFetcher::new(&unused, window);
    let cds = CdsSeriesFetcher::new(&unused, window);

    let page = format!(r#"<script>var jsGlobalVars = {{"ENDPOINT":"{QUOTE_ENDPOINT}","SYMBOL":"GERMANY5YCDS"}};</script>"#);
    let quotes = r#"{"result":{"quote":{
        "0":{"DATA_VAL":"2021-01-04","CLOSE_VAL":"9.87"},
        "1":{"DATA_VAL":"2021-01-05","CLOSE_VAL":"9.91"},
        "2":{"DATA_VAL":"2025-05-30","CLOSE_VAL":"11.02"}
    }}}"#;

    ReplayTransport::new()
        .with_get(
            bonds.request_url("DE"),
            HttpResponse::ok("TIME_PERIOD,OBS_VALUE\n2021-01-01,-0.57\n2021-01-04,-0.60\n2025-05-30,2.50\n"),
        )
        .with_get(
            bonds.request_url("IT"),
            HttpResponse::ok("TIME_PERIOD,OBS_VALUE\n2021-01-04,0.52\n"),
        )
        .with_get(cds.page_url("germany"), HttpResponse::ok(page))
        .with_post(QUOTE_ENDPOINT, HttpResponse::ok(quotes))
        .with_get(cds.page_url("greece"), HttpResponse::ok("<html><body>maintenance</body></html>"))
}

fn assert_sorted(panel: &Panel) {
    for pair in panel.rows().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.country <= b.country, "{} after {}", b.country, a.country);
        if a.country == b.country {
            assert!(a.date < b.date, "{} not after {} for {}", b.date, a.date, a.country);
        }
    }
}

#[test]
fn full_registry_panels_are_complete_and_ordered() {
    let config = PanelConfig::default();
    let transport = upstream(config.window);
    let panels = PanelAssembler::new(&transport, &config).assemble().unwrap();

    let expected_rows = config.registry.len() * config.window.business_day_count();
    assert_eq!(expected_rows, 28 * 1151);
    assert_eq!(panels.bonds.len(), expected_rows);
    assert_eq!(panels.cds.len(), expected_rows);
    assert_sorted(&panels.bonds);
    assert_sorted(&panels.cds);

    assert_eq!(panels.bonds.populated(), 4);
    assert_eq!(panels.cds.populated(), 3);

    let de_cds: Vec<_> = panels
        .cds
        .rows()
        .iter()
        .filter(|r| r.country == "DE" && r.value.is_some())
        .map(|r| (r.date.to_string(), r.value))
        .collect();
    assert_eq!(
        de_cds,
        vec![
            ("2021-01-04".to_string(), Some(9.87)),
            ("2021-01-05".to_string(), Some(9.91)),
            ("2025-05-30".to_string(), Some(11.02)),
        ]
    );

    // Only Germany's page exposed an endpoint, so exactly one POST went out.
    assert_eq!(transport.request_count(Method::Post), 1);
    assert_eq!(transport.request_count(Method::Get), 2 * 28);

    let gr = panels.report.countries.iter().find(|c| c.code == "GR").unwrap();
    assert_eq!(gr.cds.error.as_ref().map(|e| e.kind()), Some("extraction"));
    assert_eq!(panels.report.fallback_count(), 2 * 28 - 3);
}

#[test]
fn failed_series_keep_dates_and_country() {
    let config = PanelConfig::default();
    let transport = ReplayTransport::new();
    let panels = PanelAssembler::new(&transport, &config).assemble().unwrap();

    let days: Vec<_> = config.window.business_days().collect();
    let uk: Vec<_> = panels.bonds.rows().iter().filter(|r| r.country == "UK").collect();
    assert_eq!(uk.len(), days.len());
    assert!(uk.iter().zip(&days).all(|(r, d)| r.date == *d && r.value.is_none()));
}

#[test]
fn identical_upstream_gives_byte_identical_files() {
    let config = PanelConfig::default();
    let out = tempfile::tempdir().unwrap();
    let first_dir = out.path().join("first");
    let second_dir = out.path().join("second");

    for dir in [&first_dir, &second_dir] {
        let transport = upstream(config.window);
        let panels = PanelAssembler::new(&transport, &config).assemble().unwrap();
        write_panels(dir, &panels.bonds, &panels.cds).unwrap();
    }

    for file in [BONDS_FILE, CDS_FILE] {
        let a = fs::read(first_dir.join(file)).unwrap();
        let b = fs::read(second_dir.join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between runs");
    }

    let bonds = read_panel(&first_dir.join(BONDS_FILE), ValueField::BondYield).unwrap();
    assert_eq!(bonds.len(), 28 * 1151);
    assert_sorted(&bonds);
}
