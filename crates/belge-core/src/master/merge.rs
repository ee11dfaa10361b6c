//! Field-level merge of an uploaded record into the master list.
//!
//! A non-empty candidate field overwrites the master field, an empty one
//! leaves it alone. Codes missing from the master list are inserted whole.
//! Differing non-empty values are reported as mismatches but never block the
//! merge.

use crate::master::{MasterEntry, MasterList};
use crate::model::{DocumentRecord, Field, Mismatch, MismatchKind};

/// A single field write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatch {
    pub field: Field,
    pub value: String,
}

/// What merging one candidate would change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    Insert(DocumentRecord),
    Update(Vec<FieldPatch>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub code: String,
    pub action: MergeAction,
    pub mismatches: Vec<Mismatch>,
}

/// Rules that decide which candidate values count as "known".
#[derive(Debug, Clone, Copy)]
pub struct MergeRules<'a> {
    /// When set, this responsible unit ("uploaded without a folder") is
    /// written for new entries but never overwrites an existing unit.
    pub root_unit: Option<&'a str>,
}

impl MergeRules<'static> {
    /// Every non-empty value counts.
    pub const STRICT: MergeRules<'static> = MergeRules { root_unit: None };
}

impl MergeRules<'_> {
    fn is_known(&self, field: Field, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        !(field == Field::ResponsibleUnit && self.root_unit == Some(value))
    }
}

/// Work out how `candidate` would combine with `master`, without changing it.
pub fn plan(master: &MasterList, candidate: &DocumentRecord, rules: MergeRules<'_>) -> MergePlan {
    let code = candidate.code.clone();

    let Some(existing) = master.get(&code) else {
        return MergePlan {
            mismatches: vec![Mismatch {
                code: code.clone(),
                kind: MismatchKind::NotInMaster,
            }],
            code,
            action: MergeAction::Insert(candidate.clone()),
        };
    };

    let mut patches = Vec::new();
    let mut mismatches = Vec::new();
    for field in Field::ALL {
        if field == Field::Code {
            continue;
        }
        let upload = candidate.get(field);
        let current = existing.record.get(field);
        if !rules.is_known(field, upload) || upload == current {
            continue;
        }
        if !current.is_empty() {
            mismatches.push(Mismatch {
                code: code.clone(),
                kind: MismatchKind::FieldDiffers {
                    field,
                    master: current.to_string(),
                    upload: upload.to_string(),
                },
            });
        }
        patches.push(FieldPatch {
            field,
            value: upload.to_string(),
        });
    }

    MergePlan {
        code,
        action: MergeAction::Update(patches),
        mismatches,
    }
}

impl MasterList {
    /// Apply a plan produced by [`plan`] against this list.
    pub fn apply(mut self, plan: MergePlan) -> MasterList {
        match plan.action {
            MergeAction::Insert(record) => {
                self.insert_new(MasterEntry::new(record));
            }
            MergeAction::Update(patches) => {
                if let Some(entry) = self.entry_mut(&plan.code) {
                    for patch in patches {
                        entry.record.set(patch.field, patch.value);
                    }
                }
            }
        }
        self
    }
}

/// Merge one candidate, returning the updated list and the mismatches found.
pub fn merge(
    master: MasterList,
    candidate: &DocumentRecord,
    rules: MergeRules<'_>,
) -> (MasterList, Vec<Mismatch>) {
    let mut plan = plan(&master, candidate, rules);
    let mismatches = std::mem::take(&mut plan.mismatches);
    (master.apply(plan), mismatches)
}
