use calamine::{Data, Reader};
use std::path::Path;

use crate::error::BelgeError;
use crate::extraction::TextExtractor;

/// Spreadsheet extraction backend: every sheet, one text line per row.
pub struct SpreadsheetExtractor;

impl TextExtractor for SpreadsheetExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, BelgeError> {
        let mut workbook = calamine::open_workbook_auto(path)?;
        let mut out = String::new();
        for (_, range) in workbook.worksheets() {
            for row in range.rows() {
                let cells: Vec<String> = row.iter().filter_map(cell_as_string).collect();
                if !cells.is_empty() {
                    out.push_str(&cells.join(" "));
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

/// Render a cell as trimmed text; dates become `dd.mm.yyyy`.
///
/// Returns `None` for empty and whitespace-only cells.
pub(crate) fn cell_as_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => d.format("%d.%m.%Y").to_string(),
            None => dt.to_string(),
        },
        Data::Empty => return None,
        _ => format!("{cell}"),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
