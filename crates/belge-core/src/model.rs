use serde::{Deserialize, Serialize};
use std::fmt;

/// Default revision number when a filename carries no `_N` token.
pub const DEFAULT_REVISION: &str = "0";

/// Canonical metadata for one document, keyed by `code` in the master list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub code: String,
    pub display_name: String,
    pub responsible_unit: String,
    pub prepared_date: String,
    pub revision_date: String,
    pub revision_number: String,
}

impl DocumentRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Code => &self.code,
            Field::DisplayName => &self.display_name,
            Field::ResponsibleUnit => &self.responsible_unit,
            Field::PreparedDate => &self.prepared_date,
            Field::RevisionDate => &self.revision_date,
            Field::RevisionNumber => &self.revision_number,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Code => &mut self.code,
            Field::DisplayName => &mut self.display_name,
            Field::ResponsibleUnit => &mut self.responsible_unit,
            Field::PreparedDate => &mut self.prepared_date,
            Field::RevisionDate => &mut self.revision_date,
            Field::RevisionNumber => &mut self.revision_number,
        };
        *slot = value.into();
    }

    /// Numeric revision, `None` when the field is empty or not a number.
    pub fn revision(&self) -> Option<u64> {
        self.revision_number.trim().parse().ok()
    }
}

/// A single metadata field of a [`DocumentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Code,
    DisplayName,
    ResponsibleUnit,
    PreparedDate,
    RevisionDate,
    RevisionNumber,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Code,
        Field::DisplayName,
        Field::ResponsibleUnit,
        Field::PreparedDate,
        Field::RevisionDate,
        Field::RevisionNumber,
    ];

    /// Column order of the outbound report.
    pub const REPORT_ORDER: [Field; 6] = [
        Field::Code,
        Field::PreparedDate,
        Field::RevisionDate,
        Field::RevisionNumber,
        Field::ResponsibleUnit,
        Field::DisplayName,
    ];

    /// Column header used by the persisted master list.
    pub fn master_label(self) -> &'static str {
        match self {
            Field::Code => "Doküman Kodu",
            Field::DisplayName => "Doküman Adı",
            Field::ResponsibleUnit => "Sorumlu Kısım",
            Field::PreparedDate => "Hazırlama Tarihi",
            Field::RevisionDate => "Revizyon Tarihi",
            Field::RevisionNumber => "Revizyon No",
        }
    }

    /// Column header used by the generated report.
    pub fn report_label(self) -> &'static str {
        match self {
            Field::Code => "Döküman No",
            Field::DisplayName => "Dosya İsmi",
            Field::ResponsibleUnit => "Sorumlu Departman",
            Field::PreparedDate => "Tarih",
            Field::RevisionDate => "Revizyon Tarihi",
            Field::RevisionNumber => "Revizyon Sayısı",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.master_label())
    }
}

/// A discrepancy between an uploaded record and the master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub code: String,
    pub kind: MismatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MismatchKind {
    NotInMaster,
    FieldDiffers {
        field: Field,
        master: String,
        upload: String,
    },
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::NotInMaster => write!(f, "not found in master list"),
            MismatchKind::FieldDiffers {
                field,
                master,
                upload,
            } => write!(f, "{field}: master '{master}', upload '{upload}'"),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.kind)
    }
}
