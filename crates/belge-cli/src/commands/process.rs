use belge_core::config::{DuplicatePolicy, MissingStorePolicy};
use belge_core::error::BelgeError;
use belge_core::extraction::ExtractorSet;
use belge_core::master::store::MasterStore;
use belge_core::render::render_report;
use belge_core::staging::Upload;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::resolve_config;
use crate::output;
use crate::{DuplicatesArg, MissingStoreArg, OutputFormat, StoreArgs};

pub fn run(
    inputs: Vec<PathBuf>,
    store_args: &StoreArgs,
    out: PathBuf,
    on_missing_store: Option<MissingStoreArg>,
    duplicates: Option<DuplicatesArg>,
    output_format: OutputFormat,
) -> Result<(), BelgeError> {
    let mut config = resolve_config(store_args)?;
    if let Some(policy) = on_missing_store {
        config.missing_store = match policy {
            MissingStoreArg::Fresh => MissingStorePolicy::Fresh,
            MissingStoreArg::Fail => MissingStorePolicy::Fail,
        };
    }
    if let Some(policy) = duplicates {
        config.duplicates = match policy {
            DuplicatesArg::First => DuplicatePolicy::First,
            DuplicatesArg::HighestRevision => DuplicatePolicy::HighestRevision,
        };
    }

    let mut uploads = Vec::new();
    for input in &inputs {
        collect_uploads(input, &mut uploads)?;
    }
    tracing::info!(files = uploads.len(), "collected uploads");

    let store = MasterStore::from_config(&config);
    let extractors = ExtractorSet::default();
    let outcome = belge_core::process_batch(uploads, &extractors, &store, &config)?;

    let report = render_report(&outcome.records, &outcome.mismatches)?;
    std::fs::write(&out, report)?;

    match output_format {
        OutputFormat::Json => output::json::print(&outcome)?,
        OutputFormat::Table => output::table::print_outcome(&outcome),
    }
    eprintln!(
        "Report written to {}, master list updated at {}",
        out.display(),
        outcome.master_path.display()
    );

    Ok(())
}

/// Turn a command-line input into uploads.
///
/// A file is uploaded under its bare name. A folder is walked recursively and
/// each file is uploaded under `<folder name>/<path inside folder>`, the way
/// a browser folder upload names its files. A folder without a name (the
/// filesystem root) contributes no leading segment.
fn collect_uploads(input: &Path, uploads: &mut Vec<Upload>) -> Result<(), BelgeError> {
    if input.is_file() {
        uploads.push(Upload::on_disk(file_name(input), input));
        return Ok(());
    }

    let root_name = folder_name(input);
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| BelgeError::Io(e.into()))?;
        if !entry.file_type().is_file() || is_hidden(entry.path()) {
            continue;
        }
        let inner = entry.path().strip_prefix(input).unwrap_or(entry.path());
        let relative: Vec<String> = root_name
            .iter()
            .cloned()
            .chain(inner.iter().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        uploads.push(Upload::on_disk(relative.join("/"), entry.path()));
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Name of a folder as the user sees it; `.` and `..` resolve to the real
/// directory name.
fn folder_name(path: &Path) -> Option<String> {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
