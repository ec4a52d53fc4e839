//! Socrata integration for the warehouse/retail sales dataset.
//!
//! We never download the raw records (hundreds of thousands of rows). The query
//! asks the service to group by (year, month, item type) and sum both sales
//! columns, which returns a few hundred rows.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Settings;
use crate::domain::RawRecord;
use crate::error::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://data.montgomerycountymd.gov/resource/v76h-r7br.json";
pub const DEFAULT_ROW_LIMIT: usize = 50_000;

const SELECT: &str = "calendar_year,cal_month_num,item_type,sum(rtl_sales) as retail_sales,sum(whs_sales) as warehouse_sales";
const GROUP: &str = "calendar_year,cal_month_num,item_type";
const ORDER: &str = "calendar_year asc, cal_month_num asc, item_type asc";

/// Category used when a row has no item type.
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

pub struct SalesClient {
    client: Client,
    endpoint: String,
    row_limit: usize,
}

impl SalesClient {
    pub fn new(endpoint: impl Into<String>, row_limit: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            row_limit,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.dataset_url.clone(), settings.row_limit)
    }

    /// Fetch the grouped monthly rows.
    ///
    /// Individual malformed fields are coerced (see [`parse_aggregates`]); only
    /// transport failures, non-2xx statuses and a non-array body are errors.
    pub fn fetch_aggregates(&self) -> Result<Vec<RawRecord>, AppError> {
        info!(endpoint = %self.endpoint, limit = self.row_limit, "fetching aggregated sales");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&query_params(self.row_limit))
            .send()
            .map_err(|e| AppError::network(format!("Data fetch failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::http(
                status.as_u16(),
                format!("Data fetch failed ({})", status.as_u16()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::network(format!("Failed to read dataset response: {e}")))?;

        let rows = parse_aggregates(&body)?;
        info!(rows = rows.len(), "dataset loaded");
        Ok(rows)
    }
}

/// SoQL query parameters for the grouped request.
pub fn query_params(row_limit: usize) -> Vec<(&'static str, String)> {
    vec![
        ("$select", SELECT.to_string()),
        ("$group", GROUP.to_string()),
        ("$order", ORDER.to_string()),
        ("$limit", row_limit.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct AggregateRow {
    calendar_year: Option<Value>,
    cal_month_num: Option<Value>,
    item_type: Option<Value>,
    retail_sales: Option<Value>,
    warehouse_sales: Option<Value>,
}

/// Parse a Socrata response body into raw records.
///
/// Socrata returns numbers as strings. Every field is parsed defensively:
/// sales fall back to `0.0`, year/month to `None`, a missing or non-text item
/// type to [`UNKNOWN_CATEGORY`].
pub fn parse_aggregates(body: &str) -> Result<Vec<RawRecord>, AppError> {
    let rows: Vec<AggregateRow> = serde_json::from_str(body)
        .map_err(|e| AppError::parse(format!("Failed to parse dataset response: {e}")))?;

    let records: Vec<RawRecord> = rows.into_iter().map(normalize_row).collect();
    let unparsed = records
        .iter()
        .filter(|r| r.year.is_none() || r.month.is_none())
        .count();
    if unparsed > 0 {
        debug!(unparsed, "rows with unparsable year/month will be skipped");
    }
    Ok(records)
}

fn normalize_row(row: AggregateRow) -> RawRecord {
    let category = parse_text(row.item_type.as_ref())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    RawRecord {
        year: parse_int(row.calendar_year.as_ref()),
        month: parse_int(row.cal_month_num.as_ref()),
        category,
        retail_sales: safe_number(row.retail_sales.as_ref()),
        warehouse_sales: safe_number(row.warehouse_sales.as_ref()),
    }
}

fn parse_text(raw: Option<&Value>) -> Option<String> {
    let text = match raw? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_int(raw: Option<&Value>) -> Option<i32> {
    let value = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return None;
    }
    Some(truncated as i32)
}

fn safe_number(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}
