//! Formatted terminal output: numbers, KPI block and the monthly table.
//!
//! Formatting lives in one place so output changes are localized (and easy to
//! pin with snapshot-style tests).

use crate::domain::{
    CategoryFilter, DATASET_LABEL, KpiSummary, Metric, MonthlyBucket, month_name,
};

/// Grouped number with at most two fraction digits (`1234.5` -> `1,234.5`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Header block: dataset, selection and month count.
pub fn format_header(filter: &CategoryFilter, metric: Metric, months: usize) -> String {
    let mut out = String::new();
    out.push_str("=== wrs - Warehouse & Retail Sales by Month ===\n");
    out.push_str(&format!("Dataset: {DATASET_LABEL}\n"));
    out.push_str(&format!("Item type: {}\n", filter.display_name()));
    out.push_str(&format!("Metric: {}\n", metric.display_name()));
    out.push_str(&format!("Months: {months}\n"));
    out
}

pub fn format_kpis(kpis: &KpiSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<28} {:>20}\n",
        format!("Total ({})", kpis.range_label),
        format_number(kpis.sum)
    ));
    out.push_str(&format!(
        "{:<28} {:>20}\n",
        "Monthly average",
        format_number(kpis.average)
    ));
    out.push_str(&format!(
        "{:<28} {:>20}\n",
        "Latest month",
        format_number(kpis.latest)
    ));
    out
}

/// Month-by-month table of both channels and their total.
pub fn format_monthly_table(buckets: &[MonthlyBucket]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<16} {:>14} {:>14} {:>14}\n",
            "month", "retail", "warehouse", "total"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<14} {:-<14} {:-<14}\n", "", "", "", "").trim_end());
    out.push('\n');

    for b in buckets {
        out.push_str(
            format!(
                "{:<16} {:>14} {:>14} {:>14}\n",
                truncate(&format!("{} {}", month_name(b.month), b.year), 16),
                format_number(b.retail_sales),
                format_number(b.warehouse_sales),
                format_number(b.total_sales()),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_groups_and_trims() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1500.0), "1,500");
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(999.999), "1,000");
    }

    #[test]
    fn kpi_block_labels() {
        let txt = format_kpis(&KpiSummary {
            sum: 1500.0,
            average: 750.0,
            latest: 1000.25,
            range_label: "Jan 2023 → Feb 2023".to_string(),
        });
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].starts_with("Total (Jan 2023 → Feb 2023)"));
        assert!(lines[0].ends_with("1,500"));
        assert!(lines[1].starts_with("Monthly average"));
        assert!(lines[2].ends_with("1,000.25"));
    }

    #[test]
    fn monthly_table_rows() {
        let mut b = MonthlyBucket::new(2023, 1);
        b.retail_sales = 120.0;
        b.warehouse_sales = 55.5;
        let txt = format_monthly_table(&[b]);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("month"));
        assert!(lines[2].starts_with("January 2023"));
        assert!(lines[2].ends_with("175.5"));
    }

    #[test]
    fn header_names_selection() {
        let txt = format_header(&CategoryFilter::from("WINE"), Metric::Retail, 12);
        assert!(txt.contains("Item type: WINE"));
        assert!(txt.contains("Months: 12"));
    }
}
