//! Delimited text to polars tables.
//!
//! Every column produced here is a `String` column. Typing is left to the
//! normalizer so that unparseable values can be coerced to null instead of
//! failing the read.

use crate::constants::{NULL_PLACEHOLDERS, kla};
use crate::encoding::TextEncoding;
use crate::error::{CultureError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Delimiter, decimal mark and byte encoding of a text table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    pub decimal: char,
    pub encoding: TextEncoding,
}

impl TableFormat {
    pub fn new(delimiter: u8, decimal: char, encoding: TextEncoding) -> Self {
        Self {
            delimiter,
            decimal,
            encoding,
        }
    }

    /// Semicolon-delimited, comma-decimal layout of kLa exports
    pub fn kla(encoding: TextEncoding) -> Self {
        Self::new(kla::DELIMITER, kla::DECIMAL, encoding)
    }
}

/// Split a header line into trimmed, non-empty column names
pub fn split_header(line: &str, delimiter: u8) -> Vec<String> {
    line.split(delimiter as char)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a header line keeping every position
///
/// Blank names inside the header become `Unnamed: {index}` so that data
/// fields stay aligned with their labels. Trailing blank names are dropped.
pub fn positional_header(line: &str, delimiter: u8) -> Vec<String> {
    let tokens: Vec<&str> = line.split(delimiter as char).map(str::trim).collect();
    let named = tokens
        .iter()
        .rposition(|token| !token.is_empty())
        .map_or(0, |last| last + 1);

    tokens[..named]
        .iter()
        .enumerate()
        .map(|(index, token)| {
            if token.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Parse delimited text into a table with exactly `columns`, in order
///
/// Fields past the declared column count are ignored. A record with fewer
/// fields than declared is a parse error.
pub fn parse_table(
    text: &str,
    columns: &[String],
    format: &TableFormat,
    source: &Path,
) -> Result<DataFrame> {
    parse_lines(text, columns, format, source, 0)
}

/// Read a file whose first non-blank line is the header
pub fn read_table(file_path: &Path, format: &TableFormat) -> Result<DataFrame> {
    let text = format.encoding.read_to_string(file_path)?;
    let lines: Vec<&str> = text.lines().collect();

    let Some(header_index) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Err(CultureError::Parse {
            path: file_path.to_path_buf(),
            line: 1,
            reason: "file contains no header line".to_string(),
        });
    };

    let columns = positional_header(lines[header_index], format.delimiter);
    debug!(
        "Header of {} has {} columns: {:?}",
        file_path.display(),
        columns.len(),
        columns
    );

    let body = lines[header_index + 1..].join("\n");
    parse_lines(&body, &columns, format, file_path, header_index as u64 + 1)
}

/// Read a file after skipping `skip` lines, using the given column names
pub fn read_table_after(
    file_path: &Path,
    skip: usize,
    columns: &[String],
    format: &TableFormat,
) -> Result<DataFrame> {
    let text = format.encoding.read_to_string(file_path)?;
    let body = text.lines().skip(skip).collect::<Vec<_>>().join("\n");
    parse_lines(&body, columns, format, file_path, skip as u64)
}

fn parse_lines(
    text: &str,
    columns: &[String],
    format: &TableFormat,
    source: &Path,
    line_offset: u64,
) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); columns.len()];
    let mut rows = 0usize;

    for record in reader.records() {
        let record = record.map_err(|source_error| CultureError::Csv {
            path: source.to_path_buf(),
            source: source_error,
        })?;

        // Whitespace-only lines come through as a single blank field
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if record.len() < columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0) + line_offset;
            return Err(CultureError::Parse {
                path: source.to_path_buf(),
                line,
                reason: format!(
                    "expected {} fields with delimiter {:?}, found {}",
                    columns.len(),
                    format.delimiter as char,
                    record.len()
                ),
            });
        }

        for (column_values, field) in values.iter_mut().zip(record.iter()) {
            column_values.push(normalize_field(field, format.decimal));
        }
        rows += 1;
    }

    debug!(
        "Parsed {} rows x {} columns from {}",
        rows,
        columns.len(),
        source.display()
    );

    let frame_columns: Vec<Column> = columns
        .iter()
        .zip(values)
        .map(|(name, column_values)| Column::new(name.as_str().into(), column_values))
        .collect();

    Ok(DataFrame::new(frame_columns)?)
}

/// Trim a raw field, map blanks and placeholders to null, and rewrite a
/// locale decimal mark to `.` for fields that are numbers
fn normalize_field(field: &str, decimal: char) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() || NULL_PLACEHOLDERS.contains(&trimmed) {
        return None;
    }

    if decimal != '.' && trimmed.contains(decimal) && !trimmed.contains('.') {
        let candidate = trimmed.replacen(decimal, ".", 1);
        if candidate.parse::<f64>().is_ok() {
            return Some(candidate);
        }
    }

    Some(trimmed.to_string())
}
