//! Id-keyed merge (upsert) of two record sets.
//!
//! ```text
//! base                     updates                  merged
//! ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//! │ id: 1, v: a  │        │ id: 2, v: c  │        │ id: 1, v: a  │
//! │ id: 2, v: b  │   +    │ id: 3, v: d  │   →    │ id: 2, v: c  │
//! └──────────────┘        └──────────────┘        │ id: 3, v: d  │
//!                                                 └──────────────┘
//! ```
//!
//! Replaced records keep the slot of the base record they replace; new ids
//! are appended in update order.

use indexmap::IndexMap;

use crate::error::{CodecError, CodecResult};
use crate::models::{Record, RecordSet};

/// Default identifier field.
pub const DEFAULT_ID_FIELD: &str = "id";

fn id_of<'a>(
    record: &'a Record,
    id_field: &str,
    set: &'static str,
    index: usize,
) -> CodecResult<&'a str> {
    record
        .get(id_field)
        .map(String::as_str)
        .ok_or_else(|| CodecError::MissingKeyField {
            field: id_field.to_string(),
            set,
            index,
        })
}

/// Merge `updates` into `base`, keyed on the raw string value of `id_field`.
///
/// Every record of both sets must carry `id_field`; the first one that does
/// not fails the call with [`CodecError::MissingKeyField`], naming the set
/// (`base` or `updates`) and the position in it. Duplicate ids
/// within one set collapse, last one wins.
#[tracing::instrument(level = "debug", skip(base, updates), fields(base = base.len(), updates = updates.len()))]
pub fn merge(base: &[Record], updates: &[Record], id_field: &str) -> CodecResult<RecordSet> {
    let mut merged: IndexMap<&str, &Record> = IndexMap::with_capacity(base.len() + updates.len());

    for (index, record) in base.iter().enumerate() {
        merged.insert(id_of(record, id_field, "base", index)?, record);
    }

    let before = merged.len();
    let mut replaced = 0usize;
    for (index, record) in updates.iter().enumerate() {
        if merged.insert(id_of(record, id_field, "updates", index)?, record).is_some() {
            replaced += 1;
        }
    }

    tracing::debug!(
        replaced,
        appended = merged.len() - before,
        "merged record sets"
    );

    Ok(merged.into_values().cloned().collect())
}

/// Next integer id after the last record's id.
///
/// Meant for record sets kept sorted by id, where a new record is appended
/// with `last + 1`.
pub fn next_id(records: &[Record], id_field: &str) -> CodecResult<String> {
    let index = records.len().checked_sub(1).ok_or(CodecError::EmptyRecordSet)?;
    let last = id_of(&records[index], id_field, "records", index)?;

    let value: i64 = last
        .trim()
        .parse()
        .map_err(|_| CodecError::NonNumericId(last.to_string()))?;

    value
        .checked_add(1)
        .map(|next| next.to_string())
        .ok_or_else(|| CodecError::NonNumericId(last.to_string()))
}
