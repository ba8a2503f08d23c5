//! Stable, type-aware sort of a record set by one field.
//!
//! Each record's value for the sort field is turned into a [`SortKey`]; the
//! first matching rule wins:
//!
//! | Value                                           | Key                       |
//! |-------------------------------------------------|---------------------------|
//! | field absent                                    | `Text("")`                |
//! | JSON number or boolean                          | numeric, as is            |
//! | `^[0-9]+(\.[0-9]+)?$`                           | `Integer` or `Float`      |
//! | `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM:SS` | `Timestamp`             |
//! | anything else                                   | `Text`                    |
//!
//! Numeric, timestamp and text keys are not comparable with each other. A
//! column mixing them fails with [`CodecError::MixedSortKeys`] instead of
//! producing an arbitrary order.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{CodecError, CodecResult};

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Comparable key derived from a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl SortKey {
    /// Derive a key from a string value (rules 3 to 5).
    pub fn from_text(value: &str) -> Self {
        if NUMERIC.is_match(value) {
            if value.contains('.') {
                if let Ok(f) = value.parse::<f64>() {
                    return SortKey::Float(f);
                }
            } else if let Ok(i) = value.parse::<i64>() {
                return SortKey::Integer(i);
            } else if let Ok(f) = value.parse::<f64>() {
                // Too wide for i64
                return SortKey::Float(f);
            }
        }

        if let Some(ts) = parse_timestamp(value) {
            return SortKey::Timestamp(ts);
        }

        SortKey::Text(value.to_string())
    }

    /// Name of the key's comparison class.
    pub fn kind(&self) -> &'static str {
        match self {
            SortKey::Integer(_) | SortKey::Float(_) => "numeric",
            SortKey::Timestamp(_) => "timestamp",
            SortKey::Text(_) => "text",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            SortKey::Integer(i) => Some(*i as f64),
            SortKey::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compare two keys of the same kind.
    ///
    /// Keys of different kinds compare equal; [`sort`] rejects such columns
    /// before comparing.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        }
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .or_else(|| NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok())
}

/// A field value that can produce a [`SortKey`].
pub trait SortValue {
    fn sort_key(&self) -> SortKey;
}

impl SortValue for String {
    fn sort_key(&self) -> SortKey {
        SortKey::from_text(self)
    }
}

impl SortValue for Value {
    fn sort_key(&self) -> SortKey {
        match self {
            Value::Null => SortKey::Text(String::new()),
            Value::Bool(b) => SortKey::Integer(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SortKey::Integer(i),
                None => SortKey::Float(n.as_f64().unwrap_or(f64::MAX)),
            },
            Value::String(s) => SortKey::from_text(s),
            other => SortKey::Text(other.to_string()),
        }
    }
}

/// Sort records by `key`, ascending unless `descending`.
///
/// The sort is stable in both directions: records with equal keys keep
/// their input order. Records lacking the field sort as the empty string.
#[tracing::instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn sort<V>(
    records: &[IndexMap<String, V>],
    key: &str,
    descending: bool,
) -> CodecResult<Vec<IndexMap<String, V>>>
where
    V: SortValue + Clone,
{
    let keys: Vec<SortKey> = records
        .iter()
        .map(|record| {
            record
                .get(key)
                .map(|value| value.sort_key())
                .unwrap_or_else(|| SortKey::Text(String::new()))
        })
        .collect();

    if let Some(first) = keys.first() {
        if let Some((index, odd)) = keys
            .iter()
            .enumerate()
            .find(|(_, k)| k.kind() != first.kind())
        {
            return Err(CodecError::MixedSortKeys {
                field: key.to_string(),
                expected: first.kind(),
                found: odd.kind(),
                index,
            });
        }
        tracing::debug!(kind = first.kind(), "sort key kind");
    }

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = keys[a].compare(&keys[b]);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    Ok(order.into_iter().map(|i| records[i].clone()).collect())
}
