//! Environment configuration.
//!
//! Defaults for the command line front-end come from the process
//! environment (a `.env` file is loaded by the binary through `dotenvy`).
//! Command line flags override every value read here.
//!
//! | Variable             | Values                          | Default |
//! |----------------------|---------------------------------|---------|
//! | `TABCODEC_DELIMITER` | `auto`, a character, `\t`/`tab` | `auto`  |
//! | `TABCODEC_BOM`       | `true`/`false`/`1`/`0`/`yes`/`no` | `true` |
//! | `TABCODEC_NEWLINE`   | `lf`, `crlf`                    | `lf`    |
//! | `TABCODEC_ID_FIELD`  | any field name                  | `id`    |

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::models::Delimiter;
use crate::transform::DEFAULT_ID_FIELD;
use crate::writer::EncodeOptions;

pub const ENV_DELIMITER: &str = "TABCODEC_DELIMITER";
pub const ENV_BOM: &str = "TABCODEC_BOM";
pub const ENV_NEWLINE: &str = "TABCODEC_NEWLINE";
pub const ENV_ID_FIELD: &str = "TABCODEC_ID_FIELD";

/// Row separator written by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    #[default]
    Lf,
    Crlf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Crlf => "\r\n",
        }
    }
}

/// Codec defaults shared by all commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Delimiter used when decoding; also the encoding delimiter unless auto
    pub delimiter: Delimiter,

    /// Write a byte-order mark when encoding
    pub include_bom: bool,

    /// Row separator when encoding
    pub newline: Newline,

    /// Identifier field for merges
    pub id_field: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            include_bom: true,
            newline: Newline::Lf,
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl CodecConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DELIMITER) {
            config.delimiter = value.parse()?;
        }

        if let Some(value) = lookup(ENV_BOM) {
            config.include_bom = parse_bool(ENV_BOM, &value)?;
        }

        if let Some(value) = lookup(ENV_NEWLINE) {
            config.newline = match value.to_lowercase().as_str() {
                "lf" | "\\n" => Newline::Lf,
                "crlf" | "\\r\\n" => Newline::Crlf,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_NEWLINE,
                        value,
                        message: "expected 'lf' or 'crlf'".into(),
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_ID_FIELD) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: ENV_ID_FIELD,
                    value,
                    message: "field name must not be empty".into(),
                });
            }
            config.id_field = trimmed.to_string();
        }

        Ok(config)
    }

    /// Encoder options for this configuration.
    ///
    /// An auto delimiter encodes with `,`.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            delimiter: match self.delimiter {
                Delimiter::Auto => ',',
                Delimiter::Char(c) => c,
            },
            include_bom: self.include_bom,
            newline: self.newline.as_str().to_string(),
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            message: "expected a boolean".into(),
        }),
    }
}
