//! Export monthly buckets to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::{CategoryFilter, Metric, MonthlyBucket};
use crate::error::AppError;

/// Write one row per month: both channels, their total and the charted value.
pub fn write_monthly_csv(
    path: &Path,
    buckets: &[MonthlyBucket],
    filter: &CategoryFilter,
    metric: Metric,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut file = BufWriter::new(file);

    writeln!(
        file,
        "key,year,month,item_type,retail_sales,warehouse_sales,total_sales,metric,value"
    )
    .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for b in buckets {
        writeln!(
            file,
            "{},{},{},{},{:.2},{:.2},{:.2},{},{:.2}",
            b.key,
            b.year,
            b.month,
            csv_field(filter.as_str()),
            b.retail_sales,
            b.warehouse_sales,
            b.total_sales(),
            metric.wire_name(),
            metric.select(b),
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    file.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    info!(path = %path.display(), rows = buckets.len(), "exported monthly CSV");
    Ok(())
}

/// Quote a field if it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monthly.csv");
        let mut b = MonthlyBucket::new(2023, 1);
        b.retail_sales = 100.0;
        b.warehouse_sales = 50.5;

        write_monthly_csv(&path, &[b], &CategoryFilter::from("WINE"), Metric::Warehouse).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("key,year,month"));
        assert_eq!(
            lines[1],
            "2023-01,2023,1,WINE,100.00,50.50,150.50,warehouseSales,50.50"
        );
    }

    #[test]
    fn quotes_awkward_item_types() {
        assert_eq!(csv_field("DUTY FREE"), "DUTY FREE");
        assert_eq!(csv_field("A,B"), "\"A,B\"");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.csv");
        let err = write_monthly_csv(&path, &[], &CategoryFilter::All, Metric::Total).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
