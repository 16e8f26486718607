//! Export the generated market series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::MetricSeries;
use crate::error::AppError;

pub const SERIES_CSV_HEADER: &str =
    "date,steel_cost,aluminum_cost,fiberglass_cost,labor_rate,electricity_cost,order_volume";

/// Write one row per day, oldest first.
pub fn write_series_csv(path: &Path, series: &MetricSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{SERIES_CSV_HEADER}")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for r in &series.records {
        writeln!(
            out,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.0}",
            r.date,
            r.steel_cost,
            r.aluminum_cost,
            r.fiberglass_cost,
            r.labor_rate,
            r.electricity_cost,
            r.order_volume,
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = series.len(), "wrote series CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::generate_series;
    use crate::error::ErrorKind;

    #[test]
    fn writes_header_and_one_row_per_day() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let series = generate_series(&mut StdRng::seed_from_u64(9), 5, end).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_series_csv(&path, &series).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], SERIES_CSV_HEADER);
        assert!(lines[1].starts_with("2025-02-25,"));
        assert!(lines[5].starts_with("2025-03-01,"));
        assert_eq!(lines[3].split(',').count(), 7);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("series.csv");
        let err = write_series_csv(&path, &MetricSeries::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
