//! Spreadsheet exports as header-keyed rows.
//!
//! Two shapes are accepted: delimited text with a header row (comma or
//! semicolon separated, as spreadsheet tools export it) and a JSON array of
//! row objects.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;
use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;

/// One data row, keyed by normalized header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<(String, String)>,
}

impl SheetRow {
    pub fn new<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(header, value)| (normalize_header(header.as_ref()), value.into()))
                .collect(),
        }
    }

    /// First non-blank cell among `aliases` (already normalized), in alias order.
    pub fn first(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| {
            self.cells
                .iter()
                .find(|(header, value)| header == alias && !value.trim().is_empty())
                .map(|(_, value)| value.trim())
        })
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.trim().is_empty())
    }
}

/// Lowercase, strip accents and drop separators so "Última_Compra",
/// "ultima compra" and "ULTIMACOMPRA" all compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.' | '\u{feff}'))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Parse delimited text. The delimiter is taken from the header line:
/// semicolon when it dominates, comma otherwise.
pub fn parse_delimited(bytes: &[u8]) -> Result<Vec<SheetRow>, IngestError> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let text = decode_text(bytes);
    let bytes = text.as_bytes();
    let header_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = header_line.iter().filter(|b| **b == b';').count();
    let commas = header_line.iter().filter(|b| **b == b',').count();
    let delimiter = if semicolons > commas { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = SheetRow::new(headers.iter().zip(record.iter()));
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// UTF-8 when valid, otherwise Windows-1252, the code page spreadsheet tools
/// use for "CSV" exports in Western European locales.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("upload is not UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

/// Parse a JSON array of flat objects, e.g. a sheet converted row by row.
pub fn parse_json_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, IngestError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Array(items) = value else {
        return Err(IngestError::NotRowArray);
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(fields) = item else {
            return Err(IngestError::NotRowArray);
        };
        let row = SheetRow::new(
            fields
                .into_iter()
                .filter_map(|(header, value)| cell_text(value).map(|text| (header, text))),
        );
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}
