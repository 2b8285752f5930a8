//! Spreadsheet workbooks (xlsx, xls, ods): the first worksheet, header row first.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::error::IngestError;
use crate::sheet::SheetRow;

/// Leading bytes of a ZIP container, which is what an xlsx file is.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Leading bytes of an OLE compound file (legacy xls).
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

pub fn looks_like_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Err(IngestError::MissingHeader);
    };
    let headers: Vec<String> = header_cells.iter().map(cell_text).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    Ok(rows
        .map(|cells| SheetRow::new(headers.iter().zip(cells.iter().map(cell_text))))
        .filter(|row| !row.is_blank())
        .collect())
}

/// Cell contents as the text a delimited export would carry. Date cells
/// become day serials so they share the serial-date handling of the mapper.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::DateTime(date) => (date.as_f64().trunc() as i64).to_string(),
        other => other.to_string(),
    }
}
