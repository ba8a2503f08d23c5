//! Encoder: records back to delimited text.
//!
//! Output is driven by an explicit header order, never by the records' own
//! keys. Missing keys become empty cells and extra keys are ignored, so every
//! emitted row has exactly `headers.len()` cells.
//!
//! # Example
//! ```
//! use tabcodec::{decode, encode, Delimiter, EncodeOptions};
//!
//! let records = decode("id,note\n1,plain", Delimiter::Auto);
//! let options = EncodeOptions { include_bom: false, ..EncodeOptions::default() };
//!
//! assert_eq!(encode(&records, &["id", "note"], &options), "id,note\n1,plain");
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{Record, Table};

/// Options for [`encode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Cell separator
    pub delimiter: char,

    /// Prefix the output with U+FEFF
    pub include_bom: bool,

    /// Row separator
    pub newline: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_bom: true,
            newline: "\n".to_string(),
        }
    }
}

/// Whether a cell must be wrapped in quotes to survive decoding.
pub fn needs_quote(cell: &str, delimiter: char) -> bool {
    cell.contains(delimiter)
        || cell.contains(['\n', '\r', '"'])
        || cell.trim() != cell
}

/// Quote a cell if needed, doubling embedded quotes.
pub fn escape_cell(cell: &str, delimiter: char) -> String {
    if needs_quote(cell, delimiter) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn emit_row<'a>(cells: impl Iterator<Item = &'a str>, delimiter: char) -> String {
    let mut sep = [0u8; 4];
    let sep: &str = delimiter.encode_utf8(&mut sep);

    cells
        .map(|cell| escape_cell(cell, delimiter))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Encode records as delimited text in the given header order.
#[tracing::instrument(level = "debug", skip_all, fields(records = records.len(), columns = headers.len()))]
pub fn encode<H: AsRef<str>>(records: &[Record], headers: &[H], options: &EncodeOptions) -> String {
    let delimiter = options.delimiter;

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(emit_row(headers.iter().map(AsRef::as_ref), delimiter));

    for record in records {
        let cells = headers
            .iter()
            .map(|h| record.get(h.as_ref()).map(String::as_str).unwrap_or(""));
        lines.push(emit_row(cells, delimiter));
    }

    let body = lines.join(&options.newline);
    if options.include_bom {
        format!("\u{feff}{}", body)
    } else {
        body
    }
}

/// Encode a decoded table with its own header.
pub fn encode_table(table: &Table, options: &EncodeOptions) -> String {
    encode(&table.records, &table.header, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Delimiter;
    use crate::parser::decode;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_bom() -> EncodeOptions {
        EncodeOptions {
            include_bom: false,
            ..EncodeOptions::default()
        }
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(
            escape_cell(r#"He said "hi", ok"#, ','),
            r#""He said ""hi"", ok""#
        );

        let text = encode(&[record(&[("v", r#"He said "hi", ok"#)])], &["v"], &no_bom());
        assert_eq!(decode(&text, Delimiter::Auto)[0]["v"], r#"He said "hi", ok"#);
    }

    #[test]
    fn test_needs_quote_rules() {
        assert!(!needs_quote("plain", ','));
        assert!(!needs_quote("a;b", ','));
        assert!(needs_quote("a;b", ';'));
        assert!(needs_quote("a\nb", ','));
        assert!(needs_quote("a\rb", ','));
        assert!(needs_quote("a\"b", ','));
        assert!(needs_quote(" lead", ','));
        assert!(needs_quote("trail\t", ','));
        assert!(!needs_quote("", ','));
        assert!(!needs_quote("in side", ','));
    }

    #[test]
    fn test_bom_emission() {
        let text = encode(&[], &["a"], &EncodeOptions::default());
        assert_eq!(text, "\u{feff}a");
    }

    #[test]
    fn test_missing_and_extra_keys() {
        let records = vec![record(&[("b", "2"), ("x", "ignored"), ("a", "1")])];
        let text = encode(&records, &["a", "b", "c"], &no_bom());
        assert_eq!(text, "a,b,c\n1,2,");
    }

    #[test]
    fn test_header_order_is_caller_order() {
        let records = vec![record(&[("a", "1"), ("b", "2")])];
        let text = encode(&records, &["b", "a"], &no_bom());
        assert_eq!(text, "b,a\n2,1");
    }

    #[test]
    fn test_header_cells_are_quoted() {
        let text = encode(&[], &["id", "full, name"], &no_bom());
        assert_eq!(text, "id,\"full, name\"");
    }

    #[test]
    fn test_custom_delimiter_and_newline() {
        let options = EncodeOptions {
            delimiter: '\t',
            include_bom: false,
            newline: "\r\n".to_string(),
        };
        let records = vec![
            record(&[("a", "1"), ("b", "x,y")]),
            record(&[("a", "2"), ("b", "t\tab")]),
        ];
        let text = encode(&records, &["a", "b"], &options);
        assert_eq!(text, "a\tb\r\n1\tx,y\r\n2\t\"t\tab\"");
    }

    #[test]
    fn test_no_records_no_headers() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&[], &empty, &no_bom()), "");
    }

    #[test]
    fn test_encode_table_uses_table_header() {
        let table = crate::parser::decode_table("id;name\n1;Alice", Delimiter::Auto);
        let options = EncodeOptions {
            delimiter: table.delimiter,
            include_bom: false,
            ..EncodeOptions::default()
        };
        assert_eq!(encode_table(&table, &options), "id;name\n1;Alice");
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let text = "id,note\n1,\"multi\nline\"\n2,\" padded \"\n3,\"quote \"\" inside\"\n";
        let first = decode(text, Delimiter::Auto);
        let again = decode(&encode(&first, &["id", "note"], &EncodeOptions::default()), Delimiter::Auto);
        assert_eq!(again, first);
    }
}
