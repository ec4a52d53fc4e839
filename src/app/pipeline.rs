//! Shared derivation pipeline used by both CLI and TUI front-ends.
//!
//! rows -> filter + aggregate -> project(metric) -> KPIs
//!
//! The CLI runs it once; the TUI keeps a [`Pipeline`] so that redraws and hover
//! changes reuse the previous result until rows, filter or metric change.

use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::data::SalesClient;
use crate::domain::{CategoryFilter, ChartPoint, KpiSummary, Metric, MonthlyBucket, RawRecord};
use crate::error::AppError;
use crate::series::{Memo, RowsKey, aggregate, project, summarize};

/// Everything the presentation layer needs for one (rows, filter, metric).
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub buckets: Arc<[MonthlyBucket]>,
    pub points: Arc<[ChartPoint]>,
    pub kpis: KpiSummary,
}

type SeriesKey = (RowsKey, CategoryFilter, Metric);

#[derive(Debug, Default)]
pub struct Pipeline {
    buckets: Memo<(RowsKey, CategoryFilter), Arc<[MonthlyBucket]>>,
    series: Memo<SeriesKey, (Arc<[ChartPoint]>, KpiSummary)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(
        &mut self,
        rows: &Arc<[RawRecord]>,
        filter: &CategoryFilter,
        metric: Metric,
    ) -> Derived {
        let rows_key = RowsKey(Arc::clone(rows));

        let buckets = Arc::clone(
            self.buckets
                .get_or_compute((rows_key.clone(), filter.clone()), || {
                    debug!(rows = rows.len(), filter = filter.as_str(), "aggregating");
                    aggregate(rows, filter).into()
                }),
        );

        let (points, kpis) = self
            .series
            .get_or_compute((rows_key, filter.clone(), metric), || {
                debug!(buckets = buckets.len(), metric = metric.wire_name(), "projecting");
                let points = project(&buckets, metric);
                let kpis = summarize(&points, &buckets);
                (points.into(), kpis)
            })
            .clone();

        Derived {
            buckets,
            points,
            kpis,
        }
    }

    /// Number of (aggregate, projection) recomputations so far.
    pub fn computations(&self) -> (usize, usize) {
        (self.buckets.computations(), self.series.computations())
    }
}

/// One-shot derivation for the CLI.
pub fn derive_once(rows: &Arc<[RawRecord]>, filter: &CategoryFilter, metric: Metric) -> Derived {
    Pipeline::new().derive(rows, filter, metric)
}

/// Fetch the grouped dataset synchronously.
pub fn load_rows(settings: &Settings) -> Result<Arc<[RawRecord]>, AppError> {
    let client = SalesClient::from_settings(settings);
    Ok(client.fetch_aggregates()?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: i32, category: &str, retail: f64, warehouse: f64) -> RawRecord {
        RawRecord {
            year: Some(year),
            month: Some(month),
            category: category.to_string(),
            retail_sales: retail,
            warehouse_sales: warehouse,
        }
    }

    fn rows() -> Arc<[RawRecord]> {
        vec![
            row(2023, 1, "WINE", 100.0, 50.0),
            row(2023, 1, "BEER", 20.0, 5.0),
            row(2023, 2, "WINE", 10.0, 0.0),
        ]
        .into()
    }

    #[test]
    fn derives_buckets_points_and_kpis() {
        let d = derive_once(&rows(), &CategoryFilter::All, Metric::Total);
        assert_eq!(d.buckets.len(), 2);
        assert_eq!(d.points[0].value, 175.0);
        assert_eq!(d.points[1].value, 10.0);
        assert_eq!(d.kpis.sum, 185.0);
        assert_eq!(d.kpis.latest, 10.0);
        assert_eq!(d.kpis.range_label, "Jan 2023 → Feb 2023");
    }

    #[test]
    fn metric_change_reuses_buckets() {
        let rows = rows();
        let mut pipeline = Pipeline::new();
        pipeline.derive(&rows, &CategoryFilter::All, Metric::Total);
        pipeline.derive(&rows, &CategoryFilter::All, Metric::Total);
        assert_eq!(pipeline.computations(), (1, 1));

        let retail = pipeline.derive(&rows, &CategoryFilter::All, Metric::Retail);
        assert_eq!(pipeline.computations(), (1, 2));
        assert_eq!(retail.points[0].value, 120.0);
    }

    #[test]
    fn new_rows_or_filter_recompute() {
        let rows = rows();
        let mut pipeline = Pipeline::new();
        pipeline.derive(&rows, &CategoryFilter::All, Metric::Total);

        let wine = pipeline.derive(&rows, &CategoryFilter::from("WINE"), Metric::Total);
        assert_eq!(wine.points[0].value, 150.0);
        assert_eq!(pipeline.computations(), (2, 2));

        // Equal contents, different allocation.
        let copy: Arc<[RawRecord]> = rows.iter().cloned().collect::<Vec<_>>().into();
        pipeline.derive(&copy, &CategoryFilter::from("WINE"), Metric::Total);
        assert_eq!(pipeline.computations(), (3, 3));
    }
}
