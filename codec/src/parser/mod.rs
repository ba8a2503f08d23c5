//! Decoder: delimited text to header-keyed records.
//!
//! Composes the [`analyzer`] with a zip of each normalized row against the
//! header. The decoder is deliberately permissive and never rejects text.
//!
//! # Example
//! ```
//! use tabcodec::{decode, Delimiter};
//!
//! let records = decode("name;age\nAlice;30\nBob;25", Delimiter::Auto);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0]["name"], "Alice");
//! assert_eq!(records[1]["age"], "25");
//! ```

pub mod analyzer;
pub mod encoding;

pub use analyzer::{analyze, detect_delimiter, Analysis};
pub use encoding::{decode_content, detect_encoding};

use crate::error::CodecResult;
use crate::models::{Delimiter, Record, RecordSet, Table};

/// Zip rows with a header into records.
///
/// Cells past the end of a short row map to the empty string.
pub fn records_from_rows(rows: &[Vec<String>], header: &[String]) -> RecordSet {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect::<Record>()
        })
        .collect()
}

/// Decode text into records.
pub fn decode(text: &str, delimiter: Delimiter) -> RecordSet {
    decode_table(text, delimiter).records
}

/// Decode text, keeping the header and delimiter alongside the records.
pub fn decode_table(text: &str, delimiter: Delimiter) -> Table {
    let Analysis {
        rows,
        header,
        delimiter,
    } = analyze(text, delimiter);

    Table {
        records: records_from_rows(&rows, &header),
        header,
        delimiter,
    }
}

/// Decode raw bytes, detecting their charset first.
#[tracing::instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn decode_bytes(bytes: &[u8], delimiter: Delimiter) -> CodecResult<Table> {
    let encoding = detect_encoding(bytes);
    tracing::debug!(%encoding, "detected encoding");

    let content = decode_content(bytes, &encoding)?;
    Ok(decode_table(&content, delimiter))
}
