//! Charset detection for byte input.
//!
//! Exports pulled from object storage or report endpoints are usually UTF-8,
//! but spreadsheet tools still emit Latin-1 or Windows-1252 now and then.

use crate::error::{CodecError, CodecResult};

/// Detect the encoding of raw bytes using chardet.
///
/// Valid UTF-8 is always reported as `utf-8`, whatever chardet guesses.
/// Guesses `encoding_rs` has no decoder for fall back to `windows-1252`,
/// which maps every byte.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_some() => other.to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels are looked up with `encoding_rs`; anything it does not
/// know is an error rather than a silent lossy decode.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CodecResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        // Windows-1252 agrees with Latin-1 on 0xA0..=0xFF; ISO-8859-15 does not.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        other => {
            let codec = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| CodecError::Encoding(format!("unknown encoding '{}'", other)))?;
            Ok(codec.decode(bytes).0.into_owned())
        }
    }
}
