//! Apply a diff to a record set

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::reconcile::Diff;
use crate::record::{Delta, Record, RecordSet};

/// Apply `diff` to `records`, failing on any change that no longer matches.
///
/// Deletions and updates must find the exact old record; insertions must not
/// collide with a surviving record.
pub fn patch(records: &[Record], diff: &Diff) -> Result<RecordSet> {
    let by_rel: HashMap<&str, &Record> = records.iter().map(|r| (r.rel(), r)).collect();

    for deleted in &diff.deletions {
        match by_rel.get(deleted.rel()) {
            Some(current) if *current == deleted => {}
            Some(current) => return Err(conflict(deleted.rel(), deleted, current)),
            None => {
                return Err(Error::PatchConflict {
                    rel: deleted.rel().to_string(),
                    message: "deleted record is not present".to_string(),
                });
            }
        }
    }

    let updates: HashMap<&str, &Delta> = diff.updates.iter().map(|d| (d.rel(), d)).collect();
    for delta in &diff.updates {
        match by_rel.get(delta.rel()) {
            Some(current) if *current == &delta.old => {}
            Some(current) => return Err(conflict(delta.rel(), &delta.old, current)),
            None => {
                return Err(Error::PatchConflict {
                    rel: delta.rel().to_string(),
                    message: "updated record is not present".to_string(),
                });
            }
        }
    }

    let deleted: HashSet<&str> = diff.deletions.iter().map(Record::rel).collect();
    for inserted in &diff.insertions {
        if by_rel.contains_key(inserted.rel()) && !deleted.contains(inserted.rel()) {
            return Err(Error::PatchConflict {
                rel: inserted.rel().to_string(),
                message: "inserted record already exists".to_string(),
            });
        }
    }

    let mut patched: RecordSet = records
        .iter()
        .filter(|r| !deleted.contains(r.rel()))
        .map(|r| match updates.get(r.rel()) {
            Some(delta) => delta.new.clone(),
            None => r.clone(),
        })
        .collect();
    patched.extend(diff.insertions.iter().cloned());
    Ok(patched)
}

fn conflict(rel: &str, expected: &Record, found: &Record) -> Error {
    Error::PatchConflict {
        rel: rel.to_string(),
        message: format!("expected '{expected}', found '{found}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::diff;
    use pretty_assertions::assert_eq;

    fn rec(rel: &str, remote: &str, branch: &str) -> Record {
        Record::new(rel, remote, branch)
    }

    #[test]
    fn patching_source_with_its_diff_yields_target() {
        let source = vec![rec("a", "r", "master"), rec("b", "r", "dev"), rec("c", "r", "master")];
        let target = vec![rec("a", "r", "master"), rec("b", "r2", "dev"), rec("d", "r", "x")];

        let mut patched = patch(&source, &diff(&source, &target)).unwrap();
        patched.sort();
        let mut expected = target.clone();
        expected.sort();
        assert_eq!(patched, expected);
    }

    #[test]
    fn stale_update_is_rejected() {
        let source = vec![rec("a", "r", "master")];
        let target = vec![rec("a", "r", "dev")];
        let changes = diff(&source, &target);

        let moved_on = vec![rec("a", "r", "feature")];
        let err = patch(&moved_on, &changes).unwrap_err();
        assert!(matches!(err, Error::PatchConflict { ref rel, .. } if rel == "a"));
    }

    #[test]
    fn missing_deletion_is_rejected() {
        let changes = diff(&[rec("a", "r", "master")], &[]);
        assert!(patch(&[], &changes).is_err());
    }

    #[test]
    fn colliding_insertion_is_rejected() {
        let changes = diff(&[], &[rec("a", "r", "master")]);
        assert!(patch(&[rec("a", "other", "master")], &changes).is_err());
    }
}
