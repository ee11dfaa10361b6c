use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader};

use crate::config::ReconcileConfig;
use crate::error::BelgeError;
use crate::extraction::spreadsheet::cell_as_string;
use crate::master::header::{locate_header, CarriedSheet, Schema, StoreFormat};
use crate::master::MasterList;

const DEFAULT_SHEET_NAME: &str = "Liste";
const CSV_DELIMITER: u8 = b';';
const UTF8_BOM: &str = "\u{feff}";

/// A master list together with the layout it was read from.
#[derive(Debug, Clone)]
pub struct LoadedMaster {
    pub list: MasterList,
    pub schema: Schema,
}

/// The on-disk master list. The spreadsheet takes priority over the
/// delimited-text file when both exist.
#[derive(Debug, Clone)]
pub struct MasterStore {
    pub xlsx_path: PathBuf,
    pub csv_path: PathBuf,
    pub header_marker: String,
    pub header_scan_rows: usize,
}

impl MasterStore {
    pub fn from_config(config: &ReconcileConfig) -> MasterStore {
        MasterStore {
            xlsx_path: config.master_xlsx_path(),
            csv_path: config.master_csv_path(),
            header_marker: config.header_marker.clone(),
            header_scan_rows: config.header_scan_rows,
        }
    }

    /// The existing backing file and its format, if any.
    pub fn locate(&self) -> Option<(&Path, StoreFormat)> {
        if self.xlsx_path.is_file() {
            Some((self.xlsx_path.as_path(), StoreFormat::Xlsx))
        } else if self.csv_path.is_file() {
            Some((self.csv_path.as_path(), StoreFormat::Csv))
        } else {
            None
        }
    }

    pub fn path_for(&self, format: StoreFormat) -> &Path {
        match format {
            StoreFormat::Xlsx => self.xlsx_path.as_path(),
            StoreFormat::Csv => self.csv_path.as_path(),
        }
    }

    pub fn load(&self) -> Result<LoadedMaster, BelgeError> {
        let (path, format) = self.locate().ok_or_else(|| BelgeError::StoreNotFound {
            searched: vec![self.xlsx_path.clone(), self.csv_path.clone()],
        })?;

        let sheets = match format {
            StoreFormat::Xlsx => read_xlsx(path)?,
            StoreFormat::Csv => StoreSheets {
                name: None,
                rows: read_csv_rows(path)?,
                carried: Vec::new(),
            },
        };
        let rows = sheets.rows;

        let header_index = locate_header(&rows, &self.header_marker, self.header_scan_rows)?;
        let mut schema = Schema::from_rows(format, &rows, header_index)?;
        schema.sheet_name = sheets.name;
        schema.carried_sheets = sheets.carried;
        let list = MasterList::from_rows(&schema, &rows[header_index + 1..]);

        tracing::info!(
            path = %path.display(),
            entries = list.len(),
            header_row = header_index + 1,
            "loaded master list"
        );
        Ok(LoadedMaster { list, schema })
    }

    /// Write the whole list back in the schema's format.
    ///
    /// The file is written next to its destination and renamed over it, so a
    /// reader never sees a half-written master list. Other worksheets of an
    /// xlsx store are rewritten after the list sheet with their cell values.
    pub fn persist(&self, list: &MasterList, schema: &Schema) -> Result<PathBuf, BelgeError> {
        let mut rows = schema.preamble.clone();
        rows.push(schema.headers.clone());
        rows.extend(list.to_rows(schema));

        let bytes = match schema.format {
            StoreFormat::Xlsx => {
                let sheet = schema.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET_NAME);
                xlsx_bytes(sheet, &rows, &schema.carried_sheets)?
            }
            StoreFormat::Csv => csv_bytes(&rows)?,
        };

        let path = self.path_for(schema.format);
        write_atomically(path, &bytes)?;
        tracing::info!(path = %path.display(), entries = list.len(), "persisted master list");
        Ok(path.to_path_buf())
    }
}

/// Rows read from a store file. The list is always on the first sheet.
struct StoreSheets {
    name: Option<String>,
    rows: Vec<Vec<String>>,
    carried: Vec<CarriedSheet>,
}

fn read_xlsx(path: &Path) -> Result<StoreSheets, BelgeError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let mut sheets = workbook.worksheets().into_iter();
    let (name, range) = sheets
        .next()
        .ok_or_else(|| BelgeError::Schema(format!("{} has no worksheets", path.display())))?;
    let carried = sheets
        .map(|(name, range)| CarriedSheet {
            name,
            rows: range_rows(&range),
        })
        .collect();
    Ok(StoreSheets {
        name: Some(name),
        rows: range_rows(&range),
        carried,
    })
}

/// Cell text of a worksheet, padded so indices match sheet positions.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells: Vec<String> = (0..start_col).map(|_| String::new()).collect();
        cells.extend(row.iter().map(|c| cell_as_string(c).unwrap_or_default()));
        rows.push(cells);
    }
    rows
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, BelgeError> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }
    Ok(rows)
}

fn xlsx_bytes(
    sheet_name: &str,
    rows: &[Vec<String>],
    carried: &[CarriedSheet],
) -> Result<Vec<u8>, BelgeError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    write_sheet(&mut workbook, sheet_name, rows)?;
    for sheet in carried {
        write_sheet(&mut workbook, &sheet.name, &sheet.rows)?;
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    workbook: &mut rust_xlsxwriter::Workbook,
    name: &str,
    rows: &[Vec<String>],
) -> Result<(), BelgeError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;
    for (r, row) in (0u32..).zip(rows) {
        for (c, value) in (0u16..).zip(row) {
            if !value.is_empty() {
                worksheet.write_string(r, c, value)?;
            }
        }
    }
    Ok(())
}

fn csv_bytes(rows: &[Vec<String>]) -> Result<Vec<u8>, BelgeError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .quote_style(csv::QuoteStyle::Always)
        .flexible(true)
        .from_writer(UTF8_BOM.as_bytes().to_vec());
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| BelgeError::Io(e.into_error()))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), BelgeError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmpfile = tempfile::NamedTempFile::new_in(dir)?;
    // Temp files are created owner-only; keep the store's existing mode.
    if let Ok(meta) = std::fs::metadata(path) {
        tmpfile.as_file().set_permissions(meta.permissions())?;
    }
    tmpfile.write_all(bytes)?;
    tmpfile.as_file().sync_all()?;
    tmpfile.persist(path).map_err(|e| BelgeError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn store_in(dir: &Path) -> MasterStore {
        MasterStore::from_config(&ReconcileConfig {
            store_dir: dir.to_path_buf(),
            ..ReconcileConfig::default()
        })
    }

    const CSV: &str = "\u{feff}DOKÜMAN ÖZET LİSTESİ;;;\n\
        \"Sıra\";\"Doküman Kodu\";\"Doküman Adı\";\"Sorumlu Kısım\";\"Revizyon No\";\"Notlar\"\n\
        1;FR.01;\"Form; ek\";Kalite;2;arşiv\n\
        2;;Kodsuz;;;\n\
        3;PR.05;Prosedür;Satış;0;\n";

    #[test]
    fn test_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_in(dir.path()).load().unwrap_err();
        match err {
            BelgeError::StoreNotFound { searched } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_csv_with_title_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, CSV).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.schema.format, StoreFormat::Csv);
        assert_eq!(loaded.schema.preamble.len(), 1);
        assert_eq!(loaded.schema.column(Field::Code), Some(1));
        assert_eq!(loaded.list.len(), 2);
        let fr = loaded.list.get("FR.01").unwrap();
        assert_eq!(fr.record.display_name, "Form; ek");
        assert_eq!(fr.record.responsible_unit, "Kalite");
        assert_eq!(fr.extra.get(&5).map(String::as_str), Some("arşiv"));
    }

    #[test]
    fn test_csv_without_marker_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, "a;b\n1;2\n").unwrap();
        assert!(matches!(store.load(), Err(BelgeError::Schema(_))));
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, CSV).unwrap();

        let first = store.load().unwrap();
        let written = store.persist(&first.list, &first.schema).unwrap();
        assert_eq!(written, store.csv_path);

        let second = store.load().unwrap();
        assert_eq!(second.list, first.list);
        assert_eq!(second.schema.headers, first.schema.headers);
    }

    #[test]
    fn test_xlsx_takes_priority_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, CSV).unwrap();

        let rows = vec![
            vec!["Doküman Özet Listesi".to_string()],
            vec![
                "Doküman Kodu".to_string(),
                "Doküman Adı".to_string(),
                "Revizyon Tarihi".to_string(),
            ],
            vec!["TL.03".into(), "Talimat".into(), "30.03.2020".into()],
        ];
        std::fs::write(&store.xlsx_path, xlsx_bytes("Özet", &rows, &[]).unwrap()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.schema.format, StoreFormat::Xlsx);
        assert_eq!(loaded.schema.sheet_name.as_deref(), Some("Özet"));
        assert_eq!(loaded.list.codes().collect::<Vec<_>>(), vec!["TL.03"]);

        store.persist(&loaded.list, &loaded.schema).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.list, loaded.list);
        assert_eq!(reloaded.schema.preamble, loaded.schema.preamble);
    }

    #[test]
    fn test_csv_repeated_and_blank_headers_survive_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, "Doküman Kodu;Not;Not;;\nFR.01;first;second;x;y\n").unwrap();

        let loaded = store.load().unwrap();
        store.persist(&loaded.list, &loaded.schema).unwrap();

        let rows = read_csv_rows(&store.csv_path).unwrap();
        assert_eq!(rows[1], vec!["FR.01", "first", "second", "x", "y"]);
    }

    #[test]
    fn test_xlsx_other_sheets_survive_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let list_rows = vec![
            vec!["Doküman Kodu".to_string(), "Doküman Adı".to_string()],
            vec!["FR.01".to_string(), "Form".to_string()],
        ];
        let history = CarriedSheet {
            name: "Revizyon Geçmişi".into(),
            rows: vec![
                vec!["Tarih".to_string(), "Açıklama".to_string()],
                vec!["01.02.2019".to_string(), "İlk yayın".to_string()],
            ],
        };
        let bytes = xlsx_bytes("Liste", &list_rows, std::slice::from_ref(&history)).unwrap();
        std::fs::write(&store.xlsx_path, bytes).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.schema.carried_sheets, vec![history.clone()]);
        store.persist(&loaded.list, &loaded.schema).unwrap();

        let mut workbook = calamine::open_workbook_auto(&store.xlsx_path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Liste".to_string(), "Revizyon Geçmişi".to_string()]
        );
        let range = workbook.worksheet_range("Revizyon Geçmişi").unwrap();
        assert_eq!(range_rows(&range), history.rows);
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_keeps_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(&store.csv_path, CSV).unwrap();
        std::fs::set_permissions(&store.csv_path, std::fs::Permissions::from_mode(0o664)).unwrap();

        let loaded = store.load().unwrap();
        store.persist(&loaded.list, &loaded.schema).unwrap();

        let mode = std::fs::metadata(&store.csv_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
    }
}
