//! # Tabcodec - delimited tabular-text codec
//!
//! Tabcodec decodes messy CSV/TSV exports into header-keyed records, encodes
//! records back into text that decodes to the same values, and merges or
//! sorts record sets in between.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Text/Bytes │────▶│   Decoder   │────▶│ Merge/Sort  │────▶│   Encoder   │
//! │ (CSV, TSV)  │     │ (auto-delim)│     │ (RecordSet) │     │ (+ header)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tabcodec::{decode, encode, merge, sort, Delimiter, EncodeOptions};
//!
//! let base = decode("id,votes\n2,10\n1,7\n", Delimiter::Auto);
//! let updates = decode("id;votes\n2;12\n3;1\n", Delimiter::Auto);
//!
//! let merged = merge(&base, &updates, "id").unwrap();
//! let sorted = sort(&merged, "id", false).unwrap();
//!
//! let options = EncodeOptions { include_bom: false, ..EncodeOptions::default() };
//! let text = encode(&sorted, &["id", "votes"], &options);
//! assert_eq!(text, "id,votes\n1,7\n2,12\n3,1");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Record, RecordSet, Delimiter, Table
//! - [`parser`] - Decoder with delimiter auto-detection
//! - [`writer`] - Encoder
//! - [`transform`] - Merge and sort
//! - [`config`] - Environment configuration

// Core modules
pub mod error;
pub mod models;

// Codec
pub mod parser;
pub mod writer;

// Record-set transforms
pub mod transform;

// Configuration
pub mod config;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CliError, CodecError, CodecResult, ConfigError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{records_from_json, Delimiter, Record, RecordSet, Table};

// =============================================================================
// Re-exports - Codec
// =============================================================================

pub use parser::{
    analyze,
    decode,
    decode_bytes,
    decode_table,
    detect_delimiter,
    records_from_rows,
    Analysis,
};

pub use writer::{encode, encode_table, EncodeOptions};

// =============================================================================
// Re-exports - Transforms
// =============================================================================

pub use transform::{merge, next_id, sort, SortKey, SortValue, DEFAULT_ID_FIELD};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{CodecConfig, Newline};
