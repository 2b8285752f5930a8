use thiserror::Error;

/// Why an upload was rejected. A rejected upload never replaces the
/// current record set.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed spreadsheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet has no header row")]
    MissingHeader,

    #[error("unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheet")]
    NoWorksheet,

    #[error("invalid JSON upload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON upload must be an array of row objects")]
    NotRowArray,

    #[error("upload contains no data rows")]
    Empty,
}

pub type IngestResult<T> = Result<T, IngestError>;
