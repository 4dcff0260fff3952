//! Raw event line parsing and validation.
//!
//! A line has four delimited fields: timestamp, company, order-type symbol and
//! quantity. A line either yields a [`ParsedRecord`] or is dropped; there is no
//! error path for malformed input.

use crate::domain::trade::{OrderType, Trade};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_DELIMITER: char = ',';

/// Naive date-time layouts accepted after RFC 3339. `%.f` also matches an absent fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub delimiter: char,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// A validated trade together with the company that placed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub company: String,
    pub trade: Trade,
}

/// Parses one raw line. Returns `None` for anything that fails validation.
pub fn parse_line(line: &str, options: &ParserOptions) -> Option<ParsedRecord> {
    let [timestamp, company, symbol, quantity] = split_fields(line, options.delimiter)?;

    let timestamp = parse_timestamp(timestamp)?;
    let order_type = OrderType::from_symbol(symbol)?;
    let quantity = parse_quantity(quantity)?;

    Some(ParsedRecord {
        company: company.to_string(),
        trade: Trade::new(timestamp, order_type, quantity),
    })
}

/// Filter stage: lazily maps raw lines to valid records, dropping the rest.
pub fn parse_lines<I>(lines: I, options: ParserOptions) -> impl Iterator<Item = ParsedRecord>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines.into_iter().filter_map(move |line| {
        let line = line.as_ref();
        let record = parse_line(line, &options);
        if record.is_none() {
            tracing::trace!(line, "dropping malformed record");
        }
        record
    })
}

/// Exactly four fields, none empty.
fn split_fields(line: &str, delimiter: char) -> Option<[&str; 4]> {
    let mut fields = line.split(delimiter);
    let parsed = [fields.next()?, fields.next()?, fields.next()?, fields.next()?];
    if fields.next().is_some() || parsed.iter().any(|f| f.is_empty()) {
        return None;
    }
    Some(parsed)
}

/// Parses a timestamp. Offset-bearing input is normalised to UTC; naive input is kept as-is.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Base-10 integer strictly greater than zero.
pub fn parse_quantity(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|q| *q > 0)
        .map(|q| q as u64)
}
