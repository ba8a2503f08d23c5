//! Low-level text analysis: delimiter detection, tokenization and row
//! normalization.
//!
//! ```text
//! raw text ──▶ newline normalization ──▶ delimiter detection (auto only)
//!          ──▶ tokenizer (quote-aware FSM) ──▶ header extraction
//!          ──▶ column normalization ──▶ blank-row elision
//! ```
//!
//! Nothing in here knows about records. The analysis never fails: unterminated
//! quotes, ragged rows and missing trailing newlines are all normalized.

use crate::models::{Delimiter, DELIMITER_CANDIDATES};

const BOM: char = '\u{feff}';

/// Output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Data rows, each exactly `header.len()` cells wide
    pub rows: Vec<Vec<String>>,
    /// Trimmed header names
    pub header: Vec<String>,
    /// Delimiter used for tokenization
    pub delimiter: char,
}

/// Replace `\r\n` and lone `\r` with `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Pick the delimiter producing the most fields on the first non-blank line.
///
/// Candidates are `,`, `\t` and `;`. Ties (including a line where no
/// candidate splits anything) resolve to `,`.
pub fn detect_delimiter(text: &str) -> char {
    let first_line = text
        .split('\n')
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0;

    for &candidate in &DELIMITER_CANDIDATES {
        let count = split_line(first_line, candidate).len();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}

/// Quote-aware split of a single line.
///
/// Used for detection only: newlines are not special here.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);

    fields
}

// =============================================================================
// Tokenizer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Character-level state machine splitting text into rows of raw cells.
struct Tokenizer {
    delimiter: char,
    state: State,
    field: String,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Tokenizer {
    fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            state: State::Unquoted,
            field: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn end_field(&mut self) {
        self.row.push(std::mem::take(&mut self.field));
    }

    fn end_row(&mut self) {
        self.end_field();
        self.rows.push(std::mem::take(&mut self.row));
    }

    fn run(mut self, text: &str) -> Vec<Vec<String>> {
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match self.state {
                State::Quoted => match c {
                    '"' if chars.peek() == Some(&'"') => {
                        self.field.push('"');
                        chars.next();
                    }
                    '"' => self.state = State::Unquoted,
                    c => self.field.push(c),
                },
                State::Unquoted => match c {
                    '"' => self.state = State::Quoted,
                    '\n' => self.end_row(),
                    c if c == self.delimiter => self.end_field(),
                    c => self.field.push(c),
                },
            }
        }

        // Last row has no terminator, or is the empty row after a trailing newline.
        self.end_row();
        self.rows
    }
}

/// Tokenize normalized text into raw rows.
///
/// Rows keep whatever width the text gives them; see [`analyze`] for the
/// normalized form.
pub fn tokenize(text: &str, delimiter: char) -> Vec<Vec<String>> {
    Tokenizer::new(delimiter).run(text)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Full analysis of a text blob into header and normalized rows.
#[tracing::instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn analyze(text: &str, delimiter: Delimiter) -> Analysis {
    let text = normalize_newlines(text);

    let delimiter = match delimiter {
        Delimiter::Auto => detect_delimiter(&text),
        Delimiter::Char(c) => c,
    };

    if text.is_empty() {
        return Analysis {
            rows: Vec::new(),
            header: Vec::new(),
            delimiter,
        };
    }

    let mut rows = tokenize(&text, delimiter).into_iter();

    // The first row is the header, even when blank.
    let header: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let name: &str = if i == 0 {
                cell.strip_prefix(BOM).unwrap_or(&cell)
            } else {
                &cell
            };
            name.trim().to_string()
        })
        .collect();

    let width = header.len();
    let mut dropped = 0usize;
    let rows: Vec<Vec<String>> = rows
        .filter_map(|mut row| {
            row.resize(width, String::new());
            if is_blank(&row) {
                dropped += 1;
                None
            } else {
                Some(row)
            }
        })
        .collect();

    tracing::debug!(
        delimiter = %crate::models::display_char(delimiter),
        columns = width,
        rows = rows.len(),
        blank_rows = dropped,
        "analyzed text"
    );

    Analysis {
        rows,
        header,
        delimiter,
    }
}
