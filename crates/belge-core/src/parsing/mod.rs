pub mod content;
pub mod filename;
pub mod normalize;

use crate::model::DocumentRecord;
use content::find_dates;
use filename::{file_stem, parse_filename, responsible_unit};
use normalize::to_nfc;

/// Build a candidate record from an upload path and its extracted text.
///
/// Code, display name and revision come from the filename, the responsible
/// unit from the containing folder, and both dates from the body text.
/// `raw_text` may be empty when extraction failed; the date fields then stay
/// empty and everything else is still filled.
pub fn extract(relative_path: &str, raw_text: &str, root_unit: &str) -> DocumentRecord {
    let parts = parse_filename(file_stem(relative_path));
    let dates = find_dates(&to_nfc(raw_text));

    DocumentRecord {
        code: parts.code,
        display_name: parts.display_name,
        responsible_unit: responsible_unit(relative_path, root_unit),
        prepared_date: dates.prepared_date,
        revision_date: dates.revision_date,
        revision_number: parts.revision_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "Ana Klasör";

    #[test]
    fn test_extract_full_record() {
        let record = extract(
            "Kalite/FR.01-BS.TL.02_0-Cevap Şablonu.pdf",
            "Yayın Tarihi: 01.02.2019\nRevizyon Tarihi: 30.03.2020",
            ROOT,
        );
        assert_eq!(
            record,
            DocumentRecord {
                code: "FR.01-BS.TL.02".into(),
                display_name: "Cevap Şablonu".into(),
                responsible_unit: "Kalite".into(),
                prepared_date: "01.02.2019".into(),
                revision_date: "30.03.2020".into(),
                revision_number: "0".into(),
            }
        );
    }

    #[test]
    fn test_extract_without_text() {
        let record = extract("PR.05-Prosedür_2.docx", "", ROOT);
        assert_eq!(record.code, "PR.05");
        assert_eq!(record.display_name, "Prosedür");
        assert_eq!(record.revision_number, "2");
        assert_eq!(record.responsible_unit, ROOT);
        assert!(record.prepared_date.is_empty());
        assert!(record.revision_date.is_empty());
    }

    #[test]
    fn test_unparsable_stem_keeps_code_only() {
        let record = extract("Arşiv/RAPOR.xlsx", "Revizyon Tarihi: 30.03.2020", ROOT);
        assert_eq!(record.code, "RAPOR");
        assert_eq!(record.display_name, "");
        assert_eq!(record.responsible_unit, "Arşiv");
        assert_eq!(record.revision_date, "30.03.2020");
    }
}
