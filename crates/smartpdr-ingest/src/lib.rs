//! Upload parsing: spreadsheet exports into canonical inventory records.

pub mod error;
pub mod mapping;
pub mod sheet;
pub mod workbook;

use chrono::NaiveDate;
use smartpdr_core::RawInventoryRecord;
use tracing::info;

pub use error::{IngestError, IngestResult};
pub use mapping::{map_row, map_rows, parse_criticality, parse_quantity};
pub use sheet::{SheetRow, normalize_header, parse_delimited, parse_json_rows};
pub use workbook::{looks_like_workbook, parse_workbook};

const WORKBOOK_CONTENT_TYPES: [&str; 3] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/vnd.oasis.opendocument.spreadsheet",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Delimited,
    Json,
    Workbook,
}

impl UploadFormat {
    /// JSON for `application/json` (and `+json` types), a workbook for the
    /// spreadsheet media types, delimited text otherwise.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if WORKBOOK_CONTENT_TYPES.contains(&essence.as_str()) {
            Self::Workbook
        } else {
            Self::Delimited
        }
    }

    /// Like `from_content_type`, but a body carrying a workbook signature is
    /// read as a workbook whatever its declared type.
    pub fn detect(content_type: Option<&str>, bytes: &[u8]) -> Self {
        if looks_like_workbook(bytes) {
            Self::Workbook
        } else {
            Self::from_content_type(content_type)
        }
    }
}

/// Parse an upload body into records. Rejects uploads without data rows.
pub fn parse_upload(
    bytes: &[u8],
    format: UploadFormat,
    today: NaiveDate,
) -> IngestResult<Vec<RawInventoryRecord>> {
    let rows = match format {
        UploadFormat::Delimited => parse_delimited(bytes)?,
        UploadFormat::Json => parse_json_rows(bytes)?,
        UploadFormat::Workbook => parse_workbook(bytes)?,
    };
    if rows.is_empty() {
        return Err(IngestError::Empty);
    }

    let records = map_rows(&rows, today);
    info!(records = records.len(), ?format, "parsed inventory upload");
    Ok(records)
}
