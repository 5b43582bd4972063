//! Shared domain types.
//!
//! Everything here is plain data:
//!
//! - the observation window and its business-day calendar
//! - per-country series (always full-window, see `Series`)
//! - long-form panels built from many series

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

/// First calendar day of the collection window.
pub const START: NaiveDate = match NaiveDate::from_ymd_opt(2021, 1, 1) {
    Some(d) => d,
    None => panic!("invalid START date"),
};

/// Last calendar day of the collection window.
pub const END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 5, 31) {
    Some(d) => d,
    None => panic!("invalid END date"),
};

/// Inclusive date window `[start, end]` with a Monday–Friday calendar.
///
/// No holiday calendar is applied: a market holiday is still a business day
/// and simply carries a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for ObservationWindow {
    fn default() -> Self {
        Self { start: START, end: END }
    }
}

impl ObservationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every business day in the window, ascending.
    pub fn business_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |d| *d <= end)
            .filter(|d| is_business_day(*d))
    }

    pub fn business_day_count(&self) -> usize {
        self.business_days().count()
    }

    /// `(start, end)` formatted as `YYYY-MM-DD`, the form both sources expect.
    pub fn iso_bounds(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }

    /// First business day on or after `start`, if the window has any.
    pub fn first_business_day(&self) -> Option<NaiveDate> {
        self.business_days().next()
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Which value column a series or panel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueField {
    /// 10-year benchmark government bond yield (percent).
    BondYield,
    /// 5-year sovereign CDS spread (bp).
    CdsSpread,
}

impl ValueField {
    /// Column name used in persisted tables.
    pub fn column_name(self) -> &'static str {
        match self {
            ValueField::BondYield => "bond_yield",
            ValueField::CdsSpread => "cds_spread",
        }
    }
}

/// A single `(date, value, country)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub country: String,
}

/// One country's series for one source.
///
/// Invariant: exactly one row per business day of the window it was built
/// for, ascending by date. Constructors are the only way to build one, so
/// the invariant holds for fetched and fallback series alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    field: ValueField,
    country: String,
    rows: Vec<ObservationRow>,
}

impl Series {
    /// Full-window series with every value missing.
    pub fn fallback(country: &str, field: ValueField, window: &ObservationWindow) -> Self {
        let rows = window
            .business_days()
            .map(|date| ObservationRow {
                date,
                value: None,
                country: country.to_string(),
            })
            .collect();
        Self {
            field,
            country: country.to_string(),
            rows,
        }
    }

    /// Align raw `(date, value)` observations onto the window's calendar.
    ///
    /// Observations outside the window or on weekends are dropped. When a
    /// date appears more than once the later observation wins.
    pub fn aligned<I>(country: &str, field: ValueField, window: &ObservationWindow, observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let by_date: std::collections::BTreeMap<NaiveDate, Option<f64>> = observations
            .into_iter()
            .filter(|(d, _)| window.contains(*d) && is_business_day(*d))
            .collect();

        let rows = window
            .business_days()
            .map(|date| ObservationRow {
                date,
                value: by_date.get(&date).copied().flatten(),
                country: country.to_string(),
            })
            .collect();
        Self {
            field,
            country: country.to_string(),
            rows,
        }
    }

    pub fn field(&self) -> ValueField {
        self.field
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with a populated value.
    pub fn populated(&self) -> usize {
        self.rows.iter().filter(|r| r.value.is_some()).count()
    }

    pub fn into_rows(self) -> Vec<ObservationRow> {
        self.rows
    }
}

/// A series was handed to a panel of a different field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("series for {country} carries `{}` but the panel is `{}`", .found.column_name(), .expected.column_name())]
pub struct FieldMismatch {
    pub country: String,
    pub expected: ValueField,
    pub found: ValueField,
}

/// Long-form table of many countries' series for one source.
///
/// Rows are sorted by `(country, date)` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    field: ValueField,
    rows: Vec<ObservationRow>,
}

impl Panel {
    /// Concatenate series in the given order, then stable-sort by
    /// `(country, date)`.
    ///
    /// Every series must carry `field`; the first one that does not is
    /// returned as an error and no panel is built.
    pub fn from_series<I>(field: ValueField, series: I) -> Result<Self, FieldMismatch>
    where
        I: IntoIterator<Item = Series>,
    {
        let mut rows: Vec<ObservationRow> = Vec::new();
        for s in series {
            if s.field != field {
                return Err(FieldMismatch {
                    country: s.country,
                    expected: field,
                    found: s.field,
                });
            }
            rows.extend(s.rows);
        }
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.date.cmp(&b.date)));
        Ok(Self { field, rows })
    }

    /// Build a panel from rows already in memory (e.g. read back from disk).
    ///
    /// Rows are re-sorted so the ordering invariant holds.
    pub fn from_rows(field: ValueField, mut rows: Vec<ObservationRow>) -> Self {
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.date.cmp(&b.date)));
        Self { field, rows }
    }

    pub fn field(&self) -> ValueField {
        self.field
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn populated(&self) -> usize {
        self.rows.iter().filter(|r| r.value.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_window_business_days() {
        let window = ObservationWindow::default();
        // 2021-01-01 is a Friday, 2025-05-31 a Saturday.
        assert_eq!(window.first_business_day(), Some(d(2021, 1, 1)));
        assert_eq!(window.business_days().last(), Some(d(2025, 5, 30)));
        assert_eq!(window.business_day_count(), 1151);
    }

    #[test]
    fn business_days_skip_weekends() {
        let window = ObservationWindow::new(d(2024, 3, 1), d(2024, 3, 11));
        let days: Vec<_> = window.business_days().collect();
        assert_eq!(
            days,
            vec![
                d(2024, 3, 1),
                d(2024, 3, 4),
                d(2024, 3, 5),
                d(2024, 3, 6),
                d(2024, 3, 7),
                d(2024, 3, 8),
                d(2024, 3, 11),
            ]
        );
    }

    #[test]
    fn fallback_series_covers_window() {
        let window = ObservationWindow::new(d(2024, 3, 1), d(2024, 3, 11));
        let s = Series::fallback("DE", ValueField::BondYield, &window);
        assert_eq!(s.len(), 7);
        assert_eq!(s.populated(), 0);
        assert!(s.rows().iter().all(|r| r.country == "DE"));
    }

    #[test]
    fn aligned_series_drops_out_of_calendar_and_fills_gaps() {
        let window = ObservationWindow::new(d(2024, 3, 1), d(2024, 3, 8));
        let obs = vec![
            (d(2024, 2, 29), Some(9.0)),
            (d(2024, 3, 1), Some(1.0)),
            (d(2024, 3, 2), Some(9.0)),
            (d(2024, 3, 5), Some(2.0)),
            (d(2024, 3, 5), Some(2.5)),
            (d(2024, 3, 11), Some(9.0)),
        ];
        let s = Series::aligned("FR", ValueField::CdsSpread, &window, obs);
        let values: Vec<_> = s.rows().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(1.0), None, Some(2.5), None, None, None]);
    }

    #[test]
    fn panel_sorts_by_country_then_date() {
        let window = ObservationWindow::new(d(2024, 3, 4), d(2024, 3, 6));
        let panel = Panel::from_series(
            ValueField::BondYield,
            vec![
                Series::fallback("IT", ValueField::BondYield, &window),
                Series::fallback("AT", ValueField::BondYield, &window),
                Series::fallback("DE", ValueField::BondYield, &window),
            ],
        )
        .unwrap();
        assert_eq!(panel.len(), 9);
        let keys: Vec<_> = panel.rows().iter().map(|r| (r.country.as_str(), r.date)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(panel.rows()[0].country, "AT");
    }

    #[test]
    fn panel_rejects_series_of_another_field() {
        let window = ObservationWindow::new(d(2024, 3, 4), d(2024, 3, 6));
        let err = Panel::from_series(
            ValueField::BondYield,
            vec![
                Series::fallback("AT", ValueField::CdsSpread, &window),
                Series::fallback("BE", ValueField::BondYield, &window),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            FieldMismatch {
                country: "AT".to_string(),
                expected: ValueField::BondYield,
                found: ValueField::CdsSpread,
            }
        );
        assert_eq!(err.to_string(), "series for AT carries `cds_spread` but the panel is `bond_yield`");
    }
}
