pub mod batch;
pub mod config;
pub mod error;
pub mod extraction;
pub mod master;
pub mod model;
pub mod parsing;
pub mod render;
pub mod staging;

use batch::{select_per_code, BatchOutcome, BatchStats};
use config::{MissingStorePolicy, ReconcileConfig};
use error::BelgeError;
use extraction::ExtractorSet;
use master::header::{Schema, StoreFormat};
use master::merge::{merge, MergeRules};
use master::store::{LoadedMaster, MasterStore};
use master::MasterList;
use model::DocumentRecord;
use staging::Upload;

/// Build the candidate record for a single upload.
///
/// Never fails: unreadable files produce a record with empty date fields.
pub fn extract_upload(
    upload: &Upload,
    extractors: &ExtractorSet,
    root_unit: &str,
) -> DocumentRecord {
    let text = extractors.extract_text_lossy(&upload.relative_path, upload.path());
    let record = parsing::extract(&upload.relative_path, &text, root_unit);
    tracing::debug!(
        file = %upload.relative_path,
        code = %record.code,
        revision = %record.revision_number,
        text_len = text.len(),
        "extracted record"
    );
    record
}

/// Main API entry point: process one upload batch against the master list.
///
/// Uploads are handled strictly in order and each one is dropped (removing
/// any staged temp file) as soon as its record is built. The master list is
/// loaded once, every accepted record is merged into it, and the result is
/// written back in full. Nothing is written when no upload yields a code.
pub fn process_batch(
    uploads: Vec<Upload>,
    extractors: &ExtractorSet,
    store: &MasterStore,
    config: &ReconcileConfig,
) -> Result<BatchOutcome, BelgeError> {
    if uploads.is_empty() {
        return Err(BelgeError::NoFiles);
    }

    let mut stats = BatchStats {
        uploaded: uploads.len(),
        ..Default::default()
    };

    let mut candidates = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let record = extract_upload(&upload, extractors, &config.root_unit);
        if record.code.is_empty() {
            tracing::warn!(file = %upload.relative_path, "no document code in filename, skipped");
            stats.without_code += 1;
            continue;
        }
        candidates.push(record);
    }

    let (accepted, dropped) = select_per_code(candidates, config.duplicates);
    stats.duplicates_dropped = dropped;
    if accepted.is_empty() {
        return Err(BelgeError::NoValidRecords);
    }

    let LoadedMaster { list, schema } = load_master(store, config.missing_store)?;

    let rules = if config.keep_master_unit_for_root_uploads {
        MergeRules {
            root_unit: Some(&config.root_unit),
        }
    } else {
        MergeRules::STRICT
    };
    let mut master = list;
    let mut mismatches = Vec::new();
    for record in &accepted {
        if master.contains(&record.code) {
            stats.updated += 1;
        } else {
            stats.inserted += 1;
        }
        let (merged, found) = merge(master, record, rules);
        master = merged;
        mismatches.extend(found);
    }

    let master_path = store.persist(&master, &schema)?;

    let records = accepted
        .into_iter()
        .map(|r| match master.get(&r.code) {
            Some(entry) => entry.record.clone(),
            None => r,
        })
        .collect();

    tracing::info!(
        uploaded = stats.uploaded,
        inserted = stats.inserted,
        updated = stats.updated,
        mismatches = mismatches.len(),
        "batch processed"
    );

    Ok(BatchOutcome {
        records,
        mismatches,
        master,
        schema,
        master_path,
        stats,
    })
}

/// Load the master list, applying the missing-store policy.
fn load_master(
    store: &MasterStore,
    policy: MissingStorePolicy,
) -> Result<LoadedMaster, BelgeError> {
    match store.load() {
        Err(BelgeError::StoreNotFound { searched }) if policy == MissingStorePolicy::Fresh => {
            tracing::warn!(
                searched = ?searched,
                "master list not found, starting a new one"
            );
            Ok(LoadedMaster {
                list: MasterList::new(),
                schema: Schema::fresh(StoreFormat::Xlsx),
            })
        }
        other => other,
    }
}
