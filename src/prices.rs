//! Loading historical closes from CSV files.
//!
//! Accepted layouts: a `timestamp` (or yfinance-style `Date`) column holding an
//! RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS±HH:MM` timestamp or a plain
//! `YYYY-MM-DD` date, and a `close` (or `Close`) column. Other columns are ignored.
//! Timestamps keep their own offset; plain dates are taken as midnight UTC.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate};
use core_types::PricePoint;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "Date", alias = "date", alias = "Datetime")]
    timestamp: String,
    #[serde(alias = "Close")]
    close: String,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

/// Reads every row of a price file, in file order.
pub fn load_prices(path: &Path) -> Result<Vec<PricePoint>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open price file {}", path.display()))?;

    let mut points = Vec::new();
    for (index, row) in reader.deserialize::<PriceRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row.with_context(|| format!("{}:{}: unreadable row", path.display(), line))?;

        let timestamp = parse_timestamp(&row.timestamp)
            .ok_or_else(|| anyhow!("{}:{}: unrecognised date '{}'", path.display(), line, row.timestamp))?;
        let close = Decimal::from_str(row.close.trim())
            .or_else(|_| Decimal::from_scientific(row.close.trim()))
            .with_context(|| format!("{}:{}: close '{}' is not a number", path.display(), line, row.close))?;

        points.push(
            PricePoint::new(timestamp, close)
                .with_context(|| format!("{}:{}: rejected price", path.display(), line))?,
        );
    }

    tracing::debug!(file = %path.display(), bars = points.len(), "Loaded price series");
    Ok(points)
}

/// The ticker a price file stands for: its file stem, upper-cased.
pub fn ticker_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| path.display().to_string())
}
