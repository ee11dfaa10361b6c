use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BelgeError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("master list not found (searched: {})", display_paths(.searched))]
    StoreNotFound { searched: Vec<PathBuf> },

    #[error("master list schema error: {0}")]
    Schema(String),

    #[error("no files uploaded")]
    NoFiles,

    #[error("none of the uploaded files yielded a document code")]
    NoValidRecords,

    #[error("failed to load config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to write xlsx: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
