//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - recomputed cheaply on every filter/metric change
//! - persisted locally (identity, vote)
//! - exported to CSV or sent to the vote store

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sentinel category meaning "no filter".
pub const ALL_CATEGORIES: &str = "ALL";

/// Label attached to every remote vote document.
pub const DATASET_LABEL: &str = "Warehouse and Retail Sales (Montgomery County, MD)";

/// Public catalog page of the dataset.
pub const DATA_SOURCE_URL: &str = "https://catalog.data.gov/dataset/warehouse-and-retail-sales";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One server-aggregated row: sales for a (year, month, category) triple.
///
/// `year`/`month` are `None` when the source field did not parse; such rows are
/// skipped by the aggregator instead of failing the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub category: String,
    pub retail_sales: f64,
    pub warehouse_sales: f64,
}

/// Sales summed over every category that survived the filter for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    /// `YYYY-MM`, unique per (year, month).
    pub key: String,
    pub year: i32,
    pub month: i32,
    pub retail_sales: f64,
    pub warehouse_sales: f64,
}

impl MonthlyBucket {
    pub fn new(year: i32, month: i32) -> Self {
        Self {
            key: format!("{year}-{month:02}"),
            year,
            month,
            retail_sales: 0.0,
            warehouse_sales: 0.0,
        }
    }

    pub fn total_sales(&self) -> f64 {
        self.retail_sales + self.warehouse_sales
    }
}

/// A plotting-ready value with its display labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub key: String,
    /// Short axis label, e.g. `Jan '24`.
    pub label: String,
    /// Tooltip label, e.g. `January 2024`.
    pub full_label: String,
    pub value: f64,
}

/// Scalar summaries of the projected series.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub sum: f64,
    pub average: f64,
    pub latest: f64,
    pub range_label: String,
}

/// Which value channel is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Metric {
    /// Retail + warehouse.
    #[serde(rename = "totalSales")]
    Total,
    #[serde(rename = "retailSales")]
    Retail,
    #[serde(rename = "warehouseSales")]
    Warehouse,
}

impl Metric {
    /// Field name used in stored votes and remote documents.
    pub fn wire_name(self) -> &'static str {
        match self {
            Metric::Total => "totalSales",
            Metric::Retail => "retailSales",
            Metric::Warehouse => "warehouseSales",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Total => "Total Sales (Retail + Warehouse)",
            Metric::Retail => "Retail Sales",
            Metric::Warehouse => "Warehouse Sales",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Metric::Total => Metric::Retail,
            Metric::Retail => Metric::Warehouse,
            Metric::Warehouse => Metric::Total,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Metric::Total => Metric::Warehouse,
            Metric::Retail => Metric::Total,
            Metric::Warehouse => Metric::Retail,
        }
    }

    /// Pick this metric's value out of a bucket.
    pub fn select(self, bucket: &MonthlyBucket) -> f64 {
        match self {
            Metric::Total => bucket.total_sales(),
            Metric::Retail => bucket.retail_sales,
            Metric::Warehouse => bucket.warehouse_sales,
        }
    }
}

/// Category selection: everything, or one exact category name.
///
/// Serialized as a plain string, with `"ALL"` as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(name) => name,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CategoryFilter::All => "All item types".to_string(),
            CategoryFilter::Only(name) => name.clone(),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(trimmed.to_string())
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.as_str().to_string()
    }
}

/// A vote's position on the published statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Support,
    Against,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Stance::Support => "support",
            Stance::Against => "against",
        }
    }

    /// Acknowledgement shown once the vote is recorded.
    pub fn acknowledgement(self) -> &'static str {
        match self {
            Stance::Support => "Thank you for your support.",
            Stance::Against => "Thanks for participating.",
        }
    }
}

/// Signed-in identity (or the local demo identity when auth is disabled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    pub email: String,
    pub id_token: String,
    pub local_id: String,
}

/// The locally recorded vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub stance: Stance,
    pub at: DateTime<Utc>,
    #[serde(rename = "itemType")]
    pub category: CategoryFilter,
    pub metric: Metric,
}

/// Email/password pair submitted through the auth form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether the auth form registers a new account or signs into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignUp,
    SignIn,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            AuthMode::SignUp => AuthMode::SignIn,
            AuthMode::SignIn => AuthMode::SignUp,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AuthMode::SignUp => "Sign up (Register)",
            AuthMode::SignIn => "Sign in",
        }
    }
}

/// Full English month name; out-of-range months degrade to `Month {n}`.
pub fn month_name(month: i32) -> String {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|idx| MONTH_NAMES.get(idx))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Month {month}"))
}

/// First three letters of [`month_name`], so out-of-range months read `Mon`.
pub fn month_short(month: i32) -> String {
    month_name(month).chars().take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_cover_calendar_and_degrade() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_short(9), "Sep");
        assert_eq!(month_name(13), "Month 13");
        assert_eq!(month_short(0), "Mon");
        assert_eq!(month_short(13), "Mon");
        assert_eq!(month_name(-2), "Month -2");
    }

    #[test]
    fn category_filter_round_trips_sentinel() {
        assert_eq!(CategoryFilter::from("ALL"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(" WINE "), CategoryFilter::Only("WINE".into()));
        assert_eq!(String::from(CategoryFilter::All), "ALL");

        let json = serde_json::to_string(&CategoryFilter::Only("BEER".into())).unwrap();
        assert_eq!(json, "\"BEER\"");
    }

    #[test]
    fn metric_selects_channel() {
        let mut bucket = MonthlyBucket::new(2023, 1);
        bucket.retail_sales = 120.0;
        bucket.warehouse_sales = 55.0;
        assert_eq!(bucket.key, "2023-01");
        assert_eq!(Metric::Total.select(&bucket), 175.0);
        assert_eq!(Metric::Retail.select(&bucket), 120.0);
        assert_eq!(Metric::Warehouse.select(&bucket), 55.0);
        assert_eq!(Metric::Warehouse.next(), Metric::Total);
        assert_eq!(Metric::Total.prev(), Metric::Warehouse);
    }

    #[test]
    fn vote_record_uses_wire_field_names() {
        let vote = VoteRecord {
            stance: Stance::Support,
            at: DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            category: CategoryFilter::All,
            metric: Metric::Retail,
        };
        let value = serde_json::to_value(&vote).unwrap();
        assert_eq!(value["stance"], "support");
        assert_eq!(value["itemType"], "ALL");
        assert_eq!(value["metric"], "retailSales");
    }
}
