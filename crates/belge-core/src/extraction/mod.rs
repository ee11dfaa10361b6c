pub mod docx;
pub mod pdftotext;
pub mod spreadsheet;

use crate::error::BelgeError;
use std::path::Path;

/// Trait for text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from the file at `path`.
    fn extract_text(&self, path: &Path) -> Result<String, BelgeError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Upload formats the pipeline knows how to read text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
    Spreadsheet,
    DelimitedText,
    Unknown,
}

impl DocumentFormat {
    /// Detect the format from the extension of an upload path.
    /// Both `/` and `\` are treated as separators.
    pub fn from_path(path: &str) -> DocumentFormat {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
            _ => return DocumentFormat::Unknown,
        };
        match ext.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" | "doc" => DocumentFormat::Word,
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => DocumentFormat::Spreadsheet,
            "csv" | "txt" => DocumentFormat::DelimitedText,
            _ => DocumentFormat::Unknown,
        }
    }
}

/// Reads delimited text uploads as-is.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, BelgeError> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn backend_name(&self) -> &str {
        "plain"
    }
}

/// One backend per format.
pub struct ExtractorSet {
    pub pdf: Box<dyn TextExtractor>,
    pub word: Box<dyn TextExtractor>,
    pub spreadsheet: Box<dyn TextExtractor>,
    pub delimited: Box<dyn TextExtractor>,
}

impl Default for ExtractorSet {
    fn default() -> Self {
        ExtractorSet {
            pdf: Box::new(pdftotext::PdftotextExtractor::new()),
            word: Box::new(docx::DocxExtractor),
            spreadsheet: Box::new(spreadsheet::SpreadsheetExtractor),
            delimited: Box::new(PlainTextExtractor),
        }
    }
}

impl ExtractorSet {
    pub fn for_format(&self, format: DocumentFormat) -> Option<&dyn TextExtractor> {
        match format {
            DocumentFormat::Pdf => Some(self.pdf.as_ref()),
            DocumentFormat::Word => Some(self.word.as_ref()),
            DocumentFormat::Spreadsheet => Some(self.spreadsheet.as_ref()),
            DocumentFormat::DelimitedText => Some(self.delimited.as_ref()),
            DocumentFormat::Unknown => None,
        }
    }

    /// Extract text for an upload, degrading to an empty string on failure.
    ///
    /// `relative_path` decides the format; `path` is where the bytes live.
    pub fn extract_text_lossy(&self, relative_path: &str, path: &Path) -> String {
        let format = DocumentFormat::from_path(relative_path);
        let Some(extractor) = self.for_format(format) else {
            tracing::debug!(file = relative_path, "no text extractor for file type");
            return String::new();
        };
        match extractor.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    file = relative_path,
                    backend = extractor.backend_name(),
                    error = %e,
                    "text extraction failed, content fields left empty"
                );
                String::new()
            }
        }
    }
}
