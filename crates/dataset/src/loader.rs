use crate::error::DatasetError;
use crate::table::TradeTable;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns a trade log must carry. Anything else in the header is ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Exchange",
    "Margin",
    "Entry time",
    "Entry balance",
    "Exit balance",
    "Trade type",
    "Pnl (incl fees)",
    "BTC Price",
];

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// A row exactly as it appears in the log, before timestamps are resolved.
#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "Number", default)]
    number: Option<u64>,
    #[serde(rename = "Exchange")]
    exchange: String,
    #[serde(rename = "Margin", deserialize_with = "leverage_from_str")]
    leverage: u32,
    #[serde(rename = "Entry time")]
    entry_time: String,
    #[serde(rename = "Trade type")]
    trade_type: String,
    #[serde(rename = "Exposure", default, with = "rust_decimal::serde::str_option")]
    exposure: Option<Decimal>,
    #[serde(rename = "Entry balance", with = "rust_decimal::serde::str")]
    entry_balance: Decimal,
    #[serde(rename = "Exit balance", with = "rust_decimal::serde::str")]
    exit_balance: Decimal,
    #[serde(rename = "Pnl (incl fees)", with = "rust_decimal::serde::str")]
    pnl: Decimal,
    #[serde(rename = "BTC Price", with = "rust_decimal::serde::str")]
    btc_price: Decimal,
}

/// Loads the trade log at `path` into an immutable [`TradeTable`].
///
/// This is the only place the process reads its input. Any schema or row error
/// is returned as-is; callers are expected to treat it as fatal.
pub fn load_csv(path: impl AsRef<Path>) -> Result<TradeTable, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = load_from_reader(file)?;
    tracing::info!(path = %path.display(), rows = table.len(), "Loaded trade log.");
    Ok(table)
}

/// Parses a trade log from any reader. Rows keep the order they appear in.
pub fn load_from_reader<R: Read>(reader: R) -> Result<TradeTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(DatasetError::Header)?.clone();
    validate_headers(&headers)?;

    let mut trades = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| DatasetError::Row {
            line: source.position().map(|p| p.line()).unwrap_or_default(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw: RawTradeRow = record
            .deserialize(Some(&headers))
            .map_err(|source| DatasetError::Row { line, source })?;
        let entry_time = parse_entry_time(&raw.entry_time).ok_or_else(|| DatasetError::EntryTime {
            line,
            value: raw.entry_time.clone(),
        })?;

        trades.push(TradeRecord {
            number: raw.number,
            exchange: raw.exchange,
            leverage: raw.leverage,
            entry_time,
            trade_type: raw.trade_type,
            exposure: raw.exposure,
            entry_balance: raw.entry_balance,
            exit_balance: raw.exit_balance,
            pnl: raw.pnl,
            btc_price: raw.btc_price,
        });
    }

    Ok(TradeTable::new(trades))
}

fn validate_headers(headers: &csv::StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::error!(?missing, "Trade log schema rejected.");
        Err(DatasetError::MissingColumns(missing))
    }
}

/// Accepts RFC 3339 as well as the naive layouts spreadsheet exports produce.
/// Naive timestamps are taken to be UTC.
fn parse_entry_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// Margins are categorical integers, but exports sometimes write them as `2.0`.
fn leverage_from_str<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value: Decimal = raw
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid margin '{raw}'")))?;
    if !value.fract().is_zero() {
        return Err(serde::de::Error::custom(format!("margin '{raw}' is not a whole number")));
    }
    value
        .to_u32()
        .ok_or_else(|| serde::de::Error::custom(format!("margin '{raw}' is out of range")))
}
