use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::DuplicatePolicy;
use crate::master::header::Schema;
use crate::master::MasterList;
use crate::model::{DocumentRecord, Mismatch};

/// Counters describing one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub uploaded: usize,
    pub without_code: usize,
    pub duplicates_dropped: usize,
    pub inserted: usize,
    pub updated: usize,
}

/// Result of a processed upload batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Accepted records in upload order, with empty fields filled from the
    /// master list.
    pub records: Vec<DocumentRecord>,
    pub mismatches: Vec<Mismatch>,
    #[serde(skip)]
    pub master: MasterList,
    #[serde(skip)]
    pub schema: Schema,
    /// Where the updated master list was written.
    pub master_path: PathBuf,
    pub stats: BatchStats,
}

/// Keep one record per code.
///
/// Survivors sit where their code first appeared in the batch. Returns the
/// kept records and how many were dropped.
pub fn select_per_code(
    candidates: Vec<DocumentRecord>,
    policy: DuplicatePolicy,
) -> (Vec<DocumentRecord>, usize) {
    let mut kept: Vec<DocumentRecord> = Vec::with_capacity(candidates.len());
    let mut slot_by_code: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for record in candidates {
        let Some(&slot) = slot_by_code.get(&record.code) else {
            slot_by_code.insert(record.code.clone(), kept.len());
            kept.push(record);
            continue;
        };

        dropped += 1;
        let replace = match policy {
            DuplicatePolicy::First => false,
            DuplicatePolicy::HighestRevision => record.revision() > kept[slot].revision(),
        };
        let winner = if replace { &record } else { &kept[slot] };
        tracing::info!(
            code = %record.code,
            kept_revision = %winner.revision_number,
            "duplicate code in batch"
        );
        if replace {
            kept[slot] = record;
        }
    }

    (kept, dropped)
}
