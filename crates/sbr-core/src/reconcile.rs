//! Set difference between two record sets keyed on `rel`

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{Delta, Record, RecordSet};

/// What turns a source set into a target set.
///
/// Every list is ordered by `rel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    /// In the target but not the source.
    pub insertions: RecordSet,
    /// In the source but not the target.
    pub deletions: RecordSet,
    /// In both with differing remote or branch.
    pub updates: Vec<Delta>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.deletions.is_empty() && self.updates.is_empty()
    }

    /// Total number of changes.
    pub fn len(&self) -> usize {
        self.insertions.len() + self.deletions.len() + self.updates.len()
    }
}

/// Compute the changes that turn `source` into `target`.
pub fn diff(source: &[Record], target: &[Record]) -> Diff {
    let sources = index(source);
    let targets = index(target);

    let insertions = targets
        .iter()
        .filter(|(rel, _)| !sources.contains_key(*rel))
        .map(|(_, record)| (*record).clone())
        .collect();

    let deletions = sources
        .iter()
        .filter(|(rel, _)| !targets.contains_key(*rel))
        .map(|(_, record)| (*record).clone())
        .collect();

    let updates = sources
        .iter()
        .filter_map(|(rel, old)| {
            let new = targets.get(rel)?;
            (old != new).then(|| Delta::new((*old).clone(), (*new).clone()))
        })
        .collect();

    Diff {
        insertions,
        deletions,
        updates,
    }
}

fn index(records: &[Record]) -> BTreeMap<&str, &Record> {
    records.iter().map(|record| (record.rel(), record)).collect()
}
