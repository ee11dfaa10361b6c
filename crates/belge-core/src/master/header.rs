use std::collections::BTreeMap;

use crate::error::BelgeError;
use crate::model::Field;
use crate::parsing::normalize::to_nfc;

/// Backing format of the master list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Xlsx,
    Csv,
}

/// A worksheet of the master workbook other than the list itself.
/// Cell values are carried as text and written back in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Layout of a master list table as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub format: StoreFormat,
    /// Worksheet the list was read from (xlsx only).
    pub sheet_name: Option<String>,
    /// Rows above the header row, written back unchanged.
    pub preamble: Vec<Vec<String>>,
    /// Header cells verbatim.
    pub headers: Vec<String>,
    /// Column index of each field the extractor knows about.
    pub columns: BTreeMap<Field, usize>,
    /// Sheets following the list sheet in the workbook (xlsx only).
    pub carried_sheets: Vec<CarriedSheet>,
}

impl Schema {
    /// Build a schema from a located header row.
    ///
    /// Fails when the marker column (the document code) is not present.
    pub fn from_rows(
        format: StoreFormat,
        rows: &[Vec<String>],
        header_index: usize,
    ) -> Result<Schema, BelgeError> {
        let headers = rows
            .get(header_index)
            .cloned()
            .ok_or_else(|| BelgeError::Schema(format!("no row at index {header_index}")))?;
        let columns = map_columns(&headers);
        if !columns.contains_key(&Field::Code) {
            return Err(BelgeError::Schema(format!(
                "header row has no '{}' column",
                Field::Code.master_label()
            )));
        }
        Ok(Schema {
            format,
            sheet_name: None,
            preamble: rows[..header_index].to_vec(),
            headers,
            columns,
            carried_sheets: Vec::new(),
        })
    }

    /// Schema for a master list that does not exist yet: one column per field.
    pub fn fresh(format: StoreFormat) -> Schema {
        let headers: Vec<String> = Field::ALL
            .iter()
            .map(|f| f.master_label().to_string())
            .collect();
        let columns = map_columns(&headers);
        Schema {
            format,
            sheet_name: None,
            preamble: Vec::new(),
            headers,
            columns,
            carried_sheets: Vec::new(),
        }
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Header names not mapped to any field.
    pub fn extra_headers(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.columns.values().any(|c| c == i))
            .map(|(i, h)| (i, h.as_str()))
    }
}

/// Index of the first row within `window` rows holding a cell equal to
/// `marker`, compared after trimming and NFC composition.
pub fn locate_header(
    rows: &[Vec<String>],
    marker: &str,
    window: usize,
) -> Result<usize, BelgeError> {
    let marker = to_nfc(marker.trim());
    rows.iter()
        .take(window)
        .position(|row| row.iter().any(|cell| to_nfc(cell.trim()) == marker))
        .ok_or_else(|| {
            BelgeError::Schema(format!(
                "no header row containing '{marker}' within the first {window} rows"
            ))
        })
}

/// Map known master-list labels to column indices. First occurrence wins.
fn map_columns(headers: &[String]) -> BTreeMap<Field, usize> {
    let mut columns = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        let header = to_nfc(header.trim());
        if let Some(field) = Field::ALL.into_iter().find(|f| f.master_label() == header) {
            columns.entry(field).or_insert(i);
        }
    }
    columns
}
