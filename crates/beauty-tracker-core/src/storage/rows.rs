//! Column codecs shared by the catalog and program queries.
//!
//! Timestamps are stored as RFC 3339 text; enums as their `as_str()` form.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use crate::error::DatabaseError;

pub(crate) fn format_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn corrupt(idx: usize, column: &'static str, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(DatabaseError::CorruptValue { column, value }),
    )
}

pub(crate) fn parse_ts(row: &Row, idx: usize, column: &'static str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupt(idx, column, raw))
}

pub(crate) fn parse_opt_ts(
    row: &Row,
    idx: usize,
    column: &'static str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| corrupt(idx, column, raw)),
    }
}

pub(crate) fn parse_enum<T: FromStr>(row: &Row, idx: usize, column: &'static str) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|_| corrupt(idx, column, raw))
}

/// Reads a non-negative integer column such as a day number or counter.
pub(crate) fn get_u32(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}
