//! KPI summary of the projected series.

use crate::domain::{ChartPoint, KpiSummary, MonthlyBucket, month_short};

/// Placeholder range label when fewer than two months are available.
pub const NO_RANGE: &str = "—";

pub fn summarize(points: &[ChartPoint], buckets: &[MonthlyBucket]) -> KpiSummary {
    let sum: f64 = points.iter().map(|p| p.value).sum();
    let average = if points.is_empty() {
        0.0
    } else {
        sum / points.len() as f64
    };
    let latest = points.last().map(|p| p.value).unwrap_or(0.0);

    let range_label = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) if buckets.len() >= 2 => format!(
            "{} {} → {} {}",
            month_short(first.month),
            first.year,
            month_short(last.month),
            last.year
        ),
        _ => NO_RANGE.to_string(),
    };

    KpiSummary {
        sum,
        average,
        latest,
        range_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;
    use crate::series::project;

    #[test]
    fn empty_series_is_all_zero() {
        let kpis = summarize(&[], &[]);
        assert_eq!(kpis.sum, 0.0);
        assert_eq!(kpis.average, 0.0);
        assert_eq!(kpis.latest, 0.0);
        assert_eq!(kpis.range_label, NO_RANGE);
    }

    #[test]
    fn sum_average_latest_and_range() {
        let buckets = vec![
            MonthlyBucket { retail_sales: 10.0, ..MonthlyBucket::new(2022, 11) },
            MonthlyBucket { retail_sales: 20.0, ..MonthlyBucket::new(2022, 12) },
            MonthlyBucket { retail_sales: 60.0, ..MonthlyBucket::new(2023, 2) },
        ];
        let points = project(&buckets, Metric::Retail);
        let kpis = summarize(&points, &buckets);
        assert_eq!(kpis.sum, 90.0);
        assert_eq!(kpis.average, 30.0);
        assert_eq!(kpis.latest, 60.0);
        assert_eq!(kpis.range_label, "Nov 2022 → Feb 2023");
    }

    #[test]
    fn single_month_has_placeholder_range() {
        let buckets = vec![MonthlyBucket { warehouse_sales: 4.0, ..MonthlyBucket::new(2021, 6) }];
        let points = project(&buckets, Metric::Warehouse);
        let kpis = summarize(&points, &buckets);
        assert_eq!(kpis.latest, 4.0);
        assert_eq!(kpis.average, 4.0);
        assert_eq!(kpis.range_label, NO_RANGE);
    }

    #[test]
    fn out_of_range_months_abbreviate_like_real_ones() {
        let buckets = vec![MonthlyBucket::new(2024, 13), MonthlyBucket::new(2025, 0)];
        let points = project(&buckets, Metric::Total);
        let kpis = summarize(&points, &buckets);
        assert_eq!(kpis.range_label, "Mon 2024 → Mon 2025");
    }
}
