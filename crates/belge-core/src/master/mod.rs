pub mod header;
pub mod merge;
pub mod store;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{DocumentRecord, Field};
use header::Schema;

/// One row of the master list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterEntry {
    pub record: DocumentRecord,
    /// Values of columns the extractor does not know, keyed by column index.
    /// Header text is not unique (repeated or blank headers are common).
    pub extra: BTreeMap<usize, String>,
}

impl MasterEntry {
    pub fn new(record: DocumentRecord) -> Self {
        MasterEntry {
            record,
            extra: BTreeMap::new(),
        }
    }
}

/// Known documents keyed by document code. One entry per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterList {
    entries: BTreeMap<String, MasterEntry>,
}

impl MasterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&MasterEntry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MasterEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Insert an entry unless its code is already present.
    ///
    /// Returns `false` when the code was taken; the existing entry is kept.
    pub fn insert_new(&mut self, entry: MasterEntry) -> bool {
        match self.entries.entry(entry.record.code.clone()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub(crate) fn entry_mut(&mut self, code: &str) -> Option<&mut MasterEntry> {
        self.entries.get_mut(code)
    }

    /// Lay out every entry as a row of `schema`, in code order.
    /// Columns with no value are empty strings.
    pub fn to_rows(&self, schema: &Schema) -> Vec<Vec<String>> {
        self.entries
            .values()
            .map(|entry| {
                let mut row = vec![String::new(); schema.headers.len()];
                for field in Field::ALL {
                    if let Some(col) = schema.column(field) {
                        row[col] = entry.record.get(field).to_string();
                    }
                }
                for (col, _) in schema.extra_headers() {
                    if let Some(value) = entry.extra.get(&col) {
                        row[col] = value.clone();
                    }
                }
                row
            })
            .collect()
    }

    /// Build a list from data rows laid out per `schema`.
    ///
    /// Rows with an empty code cell are skipped; a repeated code keeps its
    /// first row.
    pub fn from_rows(schema: &Schema, rows: &[Vec<String>]) -> MasterList {
        let mut list = MasterList::new();
        let cell = |row: &[String], col: usize| {
            row.get(col).map(|s| s.trim().to_string()).unwrap_or_default()
        };

        for row in rows {
            let mut entry = MasterEntry::default();
            for field in Field::ALL {
                if let Some(col) = schema.column(field) {
                    entry.record.set(field, cell(row, col));
                }
            }
            if entry.record.code.is_empty() {
                continue;
            }
            for (col, _) in schema.extra_headers() {
                let value = cell(row, col);
                if !value.is_empty() {
                    entry.extra.insert(col, value);
                }
            }

            let code = entry.record.code.clone();
            if !list.insert_new(entry) {
                tracing::warn!(code = %code, "duplicate code in master list, keeping first row");
            }
        }

        list
    }
}
