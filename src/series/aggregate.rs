//! Raw (year, month, category) rows → one chronological monthly series.

use std::collections::BTreeMap;

use crate::domain::{CategoryFilter, MonthlyBucket, RawRecord};

/// Filter rows by category and sum both sales channels per (year, month).
///
/// Rows without a parsable year or month are skipped. The result is sorted
/// ascending by (year, month); downstream code relies on that order.
pub fn aggregate(rows: &[RawRecord], filter: &CategoryFilter) -> Vec<MonthlyBucket> {
    let mut by_month: BTreeMap<(i32, i32), MonthlyBucket> = BTreeMap::new();

    for row in rows.iter().filter(|r| filter.matches(&r.category)) {
        let (Some(year), Some(month)) = (row.year, row.month) else {
            continue;
        };

        let bucket = by_month
            .entry((year, month))
            .or_insert_with(|| MonthlyBucket::new(year, month));
        bucket.retail_sales += row.retail_sales;
        bucket.warehouse_sales += row.warehouse_sales;
    }

    by_month.into_values().collect()
}

/// Distinct categories present in the rows, sorted.
pub fn categories(rows: &[RawRecord]) -> Vec<String> {
    let mut out: Vec<String> = rows.iter().map(|r| r.category.clone()).collect();
    out.sort();
    out.dedup();
    out
}
