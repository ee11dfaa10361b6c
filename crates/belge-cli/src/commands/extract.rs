use belge_core::config::ReconcileConfig;
use belge_core::error::BelgeError;
use belge_core::extraction::ExtractorSet;
use belge_core::model::DocumentRecord;
use belge_core::staging::Upload;
use std::path::PathBuf;

use super::resolve_config;
use crate::output;
use crate::{OutputFormat, StoreArgs};

pub fn run(
    input_file: PathBuf,
    as_path: Option<String>,
    store_args: &StoreArgs,
    output_format: OutputFormat,
) -> Result<(), BelgeError> {
    let config = resolve_config(store_args)?;
    let record = record_for(input_file, as_path, &config)?;

    match output_format {
        OutputFormat::Json => output::json::print(&record)?,
        OutputFormat::Table => output::table::print_records(std::slice::from_ref(&record)),
    }
    Ok(())
}

fn record_for(
    input_file: PathBuf,
    as_path: Option<String>,
    config: &ReconcileConfig,
) -> Result<DocumentRecord, BelgeError> {
    if !input_file.is_file() {
        return Err(BelgeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a file", input_file.display()),
        )));
    }

    let relative = as_path.unwrap_or_else(|| {
        input_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let upload = Upload::on_disk(relative, &input_file);
    let extractors = ExtractorSet::default();
    Ok(belge_core::extract_upload(&upload, &extractors, &config.root_unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unit_comes_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("TL.07-Talimat_2.txt");
        std::fs::write(&input, "Revizyon Tarihi: 30.03.2020").unwrap();
        let config_path = dir.path().join("belge.json");
        std::fs::write(&config_path, r#"{ "root_unit": "Genel Müdürlük" }"#).unwrap();

        let args = StoreArgs {
            config: Some(config_path),
            store_dir: None,
        };
        let config = resolve_config(&args).unwrap();
        let record = record_for(input, None, &config).unwrap();
        assert_eq!(record.responsible_unit, "Genel Müdürlük");
        assert_eq!(record.revision_number, "2");
        assert_eq!(record.revision_date, "30.03.2020");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = record_for(dir.path().join("yok.pdf"), None, &ReconcileConfig::default());
        assert!(matches!(result, Err(BelgeError::Io(_))));
    }
}
