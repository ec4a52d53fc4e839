//! Monthly buckets → chart points for the selected metric.

use crate::domain::{ChartPoint, Metric, MonthlyBucket, month_name, month_short};

/// Map each bucket to a labelled point. Count and order are preserved.
pub fn project(buckets: &[MonthlyBucket], metric: Metric) -> Vec<ChartPoint> {
    buckets
        .iter()
        .map(|b| ChartPoint {
            key: b.key.clone(),
            label: format!("{} '{}", month_short(b.month), two_digit_year(b.year)),
            full_label: format!("{} {}", month_name(b.month), b.year),
            value: metric.select(b),
        })
        .collect()
}

fn two_digit_year(year: i32) -> String {
    let digits = year.to_string();
    let start = digits.len().saturating_sub(2);
    digits[start..].to_string()
}
