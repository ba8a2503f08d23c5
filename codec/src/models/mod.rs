//! Domain models shared by the codec and the record-set transforms.
//!
//! - [`Record`] - Ordered field name to value map
//! - [`RecordSet`] - Ordered sequence of records
//! - [`Delimiter`] - Delimiter selector (`auto` or an explicit character)
//! - [`Table`] - A decoded record set with its header and delimiter
//!
//! [`records_from_json`] lives here too so callers can feed JSON documents to
//! the encoder. Records serialize directly with `serde_json`, keys in order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, CodecResult};

/// One row keyed by header name, in header order.
pub type Record = IndexMap<String, String>;

/// Ordered sequence of records.
pub type RecordSet = Vec<Record>;

/// Delimiters compared by auto-detection, in tie-break order.
pub const DELIMITER_CANDIDATES: [char; 3] = [',', '\t', ';'];

// =============================================================================
// Delimiter selector
// =============================================================================

/// How the decoder picks its delimiter.
///
/// Text forms go through [`FromStr`], and [`Delimiter::explicit`] checks a
/// single character. Both reject `"`, `\n` and `\r`. A `Char` built
/// directly skips that check; the tokenizer then reads `"` as a quote, never
/// as a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Delimiter {
    /// Detect from the first non-blank line.
    #[default]
    Auto,
    /// Use this character.
    Char(char),
}

impl Delimiter {
    /// Build an explicit delimiter, rejecting characters the tokenizer
    /// gives another meaning to.
    pub fn explicit(c: char) -> CodecResult<Self> {
        match c {
            '"' | '\n' | '\r' => Err(CodecError::UnsupportedDelimiter(c.to_string())),
            c => Ok(Delimiter::Char(c)),
        }
    }
}

impl FromStr for Delimiter {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => return Ok(Delimiter::Auto),
            "\\t" | "tab" => return Ok(Delimiter::Char('\t')),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Delimiter::explicit(c),
            _ => Err(CodecError::UnsupportedDelimiter(s.to_string())),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Delimiter> for String {
    fn from(d: Delimiter) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Auto => f.write_str("auto"),
            Delimiter::Char(c) => f.write_str(&display_char(*c)),
        }
    }
}

/// Printable form of a delimiter character (`\t` for tab).
pub fn display_char(c: char) -> String {
    match c {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

// =============================================================================
// Table
// =============================================================================

/// Result of decoding with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column headers, in file order
    pub header: Vec<String>,
    /// Delimiter used to tokenize the text
    pub delimiter: char,
    /// Records, one per non-blank data row
    pub records: RecordSet,
}

// =============================================================================
// JSON interop
// =============================================================================

/// Parse a JSON array of objects into records.
///
/// Key order is taken from the JSON text, nested objects included. Scalars are stringified:
/// `null` becomes `""`, numbers and booleans keep their JSON spelling,
/// nested arrays and objects are kept as compact JSON.
pub fn records_from_json(json: &str) -> CodecResult<RecordSet> {
    let rows: Vec<IndexMap<String, Value>> =
        serde_json::from_str(json).map_err(|e| CodecError::InvalidJson(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(k, v)| (k, json_to_cell(v)))
                .collect()
        })
        .collect())
}

/// Stringify one JSON value for use as a cell.
pub fn json_to_cell(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("auto".parse::<Delimiter>().unwrap(), Delimiter::Auto);
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Char(';'));
        assert_eq!("\\t".parse::<Delimiter>().unwrap(), Delimiter::Char('\t'));
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Char('\t'));
        assert_eq!("|".parse::<Delimiter>().unwrap(), Delimiter::Char('|'));
    }

    #[test]
    fn test_delimiter_rejects_multi_char() {
        let err = "::".parse::<Delimiter>().unwrap_err();
        assert_eq!(err, CodecError::UnsupportedDelimiter("::".into()));
        assert!("".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_delimiter_rejects_quote_and_newline() {
        assert!("\"".parse::<Delimiter>().is_err());
        assert!(Delimiter::explicit('\n').is_err());
        assert!(Delimiter::explicit('\r').is_err());
    }

    #[test]
    fn test_delimiter_serde() {
        let d: Delimiter = serde_json::from_value(json!("tab")).unwrap();
        assert_eq!(d, Delimiter::Char('\t'));
        assert_eq!(serde_json::to_value(Delimiter::Auto).unwrap(), json!("auto"));
        assert!(serde_json::from_value::<Delimiter>(json!("ab")).is_err());
    }

    #[test]
    fn test_records_from_json_stringifies() {
        let json = r#"[{"id": 1, "name": "Alice", "active": true, "note": null, "tags": ["a"]}]"#;
        let records = records_from_json(json).unwrap();

        assert_eq!(records.len(), 1);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "active", "note", "tags"]);
        assert_eq!(records[0]["id"], "1");
        assert_eq!(records[0]["active"], "true");
        assert_eq!(records[0]["note"], "");
        assert_eq!(records[0]["tags"], r#"["a"]"#);
    }

    #[test]
    fn test_records_from_json_keeps_nested_key_order() {
        let json = r#"[{"id": "1", "meta": {"zeta": 1, "alpha": {"y": 2, "b": 3}}}]"#;
        let records = records_from_json(json).unwrap();
        assert_eq!(records[0]["meta"], r#"{"zeta":1,"alpha":{"y":2,"b":3}}"#);
    }

    #[test]
    fn test_records_from_json_rejects_non_array() {
        assert!(matches!(
            records_from_json(r#"{"id": "1"}"#),
            Err(CodecError::InvalidJson(_))
        ));
    }
}
