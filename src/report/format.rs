//! Plain-text run summary.

use crate::report::{FetchReport, SourceStatus};

/// Format the per-country coverage table printed at the end of a run.
pub fn format_run_summary(report: &FetchReport) -> String {
    let mut out = String::new();

    out.push_str("=== sovereign panels ===\n");
    out.push_str(&format!(
        "Window: {} .. {} ({} business days)\n",
        report.window.start,
        report.window.end,
        report.window.business_day_count()
    ));
    out.push_str(&format!("Countries: {}\n\n", report.countries.len()));

    out.push_str(&format!("{:<8} {:<24} {:<24}\n", "country", "bond_yield", "cds_spread"));
    for c in &report.countries {
        out.push_str(&format!(
            "{:<8} {:<24} {:<24}\n",
            c.code,
            fmt_status(&c.bond),
            fmt_status(&c.cds)
        ));
    }

    let bond_failures: Vec<_> = report.bond_failures().collect();
    let cds_failures: Vec<_> = report.cds_failures().collect();
    if !bond_failures.is_empty() || !cds_failures.is_empty() {
        out.push_str("\nFallbacks:\n");
        for (code, err) in bond_failures {
            out.push_str(&format!("  {code} bond_yield: {err}\n"));
        }
        for (code, err) in cds_failures {
            out.push_str(&format!("  {code} cds_spread: {err}\n"));
        }
    }

    out
}

fn fmt_status(status: &SourceStatus) -> String {
    match &status.error {
        None => format!("ok {}/{}", status.populated, status.rows),
        Some(err) => format!("fallback ({})", err.kind()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::FetchError;
    use crate::domain::ObservationWindow;
    use crate::report::CountryReport;

    #[test]
    fn summary_lists_countries_and_fallbacks() {
        let window = ObservationWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        );
        let mut report = FetchReport::new(window);
        report.countries.push(CountryReport {
            code: "DE".into(),
            bond: SourceStatus { rows: 5, populated: 5, error: None },
            cds: SourceStatus {
                rows: 5,
                populated: 0,
                error: Some(FetchError::Extraction("jsGlobalVars not found".into())),
            },
        });

        let text = format_run_summary(&report);
        assert!(text.contains("(5 business days)"));
        assert!(text.contains("ok 5/5"));
        assert!(text.contains("fallback (extraction)"));
        assert!(text.contains("DE cds_spread: extraction error: jsGlobalVars not found"));
        assert_eq!(report.fallback_count(), 1);
    }
}
