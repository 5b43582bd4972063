//! Parquet persistence for panels.
//!
//! Schema per file: `date: Date`, `<value field>: Float64` (nullable),
//! `country: Utf8`. Writes go to a `.tmp` sibling first and are renamed into
//! place, so a failed run never leaves a truncated table behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;

use crate::domain::{ObservationRow, Panel, ValueField};
use crate::error::AppError;

pub const BONDS_FILE: &str = "bonds.parq";
pub const CDS_FILE: &str = "cds.parq";

const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => panic!("invalid epoch"),
};

/// Write both panels into `dir`, creating it if needed.
///
/// Returns the written paths (bonds first).
pub fn write_panels(dir: &Path, bonds: &Panel, cds: &Panel) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let bonds_path = dir.join(BONDS_FILE);
    let cds_path = dir.join(CDS_FILE);
    write_panel(&bonds_path, bonds)?;
    write_panel(&cds_path, cds)?;
    Ok(vec![bonds_path, cds_path])
}

/// Write one panel to `path`.
pub fn write_panel(path: &Path, panel: &Panel) -> Result<(), AppError> {
    let mut df = panel_to_dataframe(panel)?;
    let tmp_path = path.with_extension("parq.tmp");

    let file = fs::File::create(&tmp_path)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", tmp_path.display())))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| AppError::io(format!("Failed to write parquet '{}': {e}", path.display())))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        AppError::io(format!("Failed to move '{}' into place: {e}", path.display()))
    })?;
    Ok(())
}

/// Read a panel written by `write_panel`.
pub fn read_panel(path: &Path, field: ValueField) -> Result<Panel, AppError> {
    let file = fs::File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open parquet '{}': {e}", path.display())))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| AppError::io(format!("Failed to read parquet '{}': {e}", path.display())))?;
    dataframe_to_panel(&df, field)
}

fn panel_to_dataframe(panel: &Panel) -> Result<DataFrame, AppError> {
    let rows = panel.rows();
    let dates: Vec<i32> = rows.iter().map(|r| (r.date - EPOCH).num_days() as i32).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
    let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| AppError::io(format!("date column cast failed: {e}")))?,
        Column::new(panel.field().column_name().into(), values),
        Column::new("country".into(), countries),
    ])
    .map_err(|e| AppError::io(format!("Failed to build panel table: {e}")))
}

fn dataframe_to_panel(df: &DataFrame, field: ValueField) -> Result<Panel, AppError> {
    let column = |name: &str| {
        df.column(name)
            .map_err(|e| AppError::io(format!("panel table has no `{name}` column: {e}")))
    };

    let dates = column("date")?
        .date()
        .map_err(|e| AppError::io(format!("`date` column type: {e}")))?;
    let values = column(field.column_name())?
        .f64()
        .map_err(|e| AppError::io(format!("`{}` column type: {e}", field.column_name())))?;
    let countries = column("country")?
        .str()
        .map_err(|e| AppError::io(format!("`country` column type: {e}")))?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let days = dates
            .get(i)
            .ok_or_else(|| AppError::io(format!("null date at row {i}")))?;
        let country = countries
            .get(i)
            .ok_or_else(|| AppError::io(format!("null country at row {i}")))?;
        rows.push(ObservationRow {
            date: EPOCH + chrono::Duration::days(i64::from(days)),
            value: values.get(i),
            country: country.to_string(),
        });
    }

    Ok(Panel::from_rows(field, rows))
}
