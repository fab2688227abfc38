//! CSV report output.
//!
//! The report holds plaintext passwords on purpose: it is meant to be read
//! locally, once, to find and change breached credentials.

use crate::error::Result;
use crate::model::ReportRow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Report location for an export path: every `.` becomes `_`, then `.csv`.
///
/// ```
/// use pifpwned::report::report_path;
/// use std::path::PathBuf;
///
/// assert_eq!(report_path("exports/vault.1pif"), PathBuf::from("exports/vault_1pif.csv"));
/// ```
pub fn report_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref().to_string_lossy().replace('.', "_");
    PathBuf::from(format!("{}.csv", input))
}

/// Renders rows as CSV: a header from the row's keys, then one record each.
pub fn to_csv_string(rows: &[ReportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the report, returning `false` without creating a file when
/// there are no rows.
pub fn write_report(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<bool> {
    let path = path.as_ref();

    if rows.is_empty() {
        info!("No rows to report, skipping {}", path.display());
        return Ok(false);
    }

    fs::write(path, to_csv_string(rows)?)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(true)
}
