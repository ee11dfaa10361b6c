use rust_xlsxwriter::{Format, Workbook};

use crate::error::BelgeError;
use crate::model::{DocumentRecord, Field, Mismatch};

/// Attachment name of the generated report.
pub const REPORT_FILE_NAME: &str = "Belge_Bilgileri.xlsx";

pub const REPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const RECORDS_SHEET: &str = "Belge Bilgileri";
const MISMATCH_SHEET: &str = "Uyumsuzluklar";
const MISMATCH_HEADERS: [&str; 2] = ["Döküman No", "Açıklama"];

/// Render the batch report workbook.
///
/// The first sheet lists one row per accepted file; the mismatch sheet is
/// only added when there is something to report.
pub fn render_report(
    records: &[DocumentRecord],
    mismatches: &[Mismatch],
) -> Result<Vec<u8>, BelgeError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(RECORDS_SHEET)?;
    for (c, field) in (0u16..).zip(Field::REPORT_ORDER) {
        sheet.write_string_with_format(0, c, field.report_label(), &bold)?;
    }
    for (r, record) in (1u32..).zip(records) {
        for (c, field) in (0u16..).zip(Field::REPORT_ORDER) {
            sheet.write_string(r, c, record.get(field))?;
        }
    }

    if !mismatches.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(MISMATCH_SHEET)?;
        for (c, header) in (0u16..).zip(MISMATCH_HEADERS) {
            sheet.write_string_with_format(0, c, header, &bold)?;
        }
        for (r, mismatch) in (1u32..).zip(mismatches) {
            sheet.write_string(r, 0, &mismatch.code)?;
            sheet.write_string(r, 1, mismatch.kind.to_string())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MismatchKind;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn record() -> DocumentRecord {
        DocumentRecord {
            code: "FR.01".into(),
            display_name: "Form".into(),
            responsible_unit: "Kalite".into(),
            prepared_date: "01.02.2019".into(),
            revision_date: "30.03.2020".into(),
            revision_number: "2".into(),
        }
    }

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_records_sheet_only_without_mismatches() {
        let mut workbook = open(render_report(&[record()], &[]).unwrap());
        assert_eq!(workbook.sheet_names(), vec![RECORDS_SHEET.to_string()]);

        let range = workbook.worksheet_range(RECORDS_SHEET).unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Döküman No".into()))
        );
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("FR.01".into())));
        assert_eq!(range.get_value((1, 3)), Some(&Data::String("2".into())));
        assert_eq!(range.get_value((1, 5)), Some(&Data::String("Form".into())));
    }

    #[test]
    fn test_mismatch_sheet_added() {
        let mismatches = vec![Mismatch {
            code: "FR.01".into(),
            kind: MismatchKind::NotInMaster,
        }];
        let mut workbook = open(render_report(&[record()], &mismatches).unwrap());
        assert_eq!(workbook.sheet_names().len(), 2);

        let range = workbook.worksheet_range(MISMATCH_SHEET).unwrap();
        assert_eq!(
            range.get_value((1, 1)),
            Some(&Data::String("not found in master list".into()))
        );
    }
}
