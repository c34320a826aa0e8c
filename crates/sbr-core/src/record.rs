//! Subrepository records and deltas

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An unordered collection of records, unique by `rel`.
///
/// Uniqueness is guaranteed by whoever produces the set (the scanner or the
/// manifest reader); it is not checked here.
pub type RecordSet = Vec<Record>;

/// One subrepository: where it lives, where it comes from, which branch.
///
/// `rel` is relative to the workspace root and identifies the record within a
/// set. Two records are equal when all three fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    rel: String,
    remote: String,
    branch: String,
}

impl Record {
    pub fn new(rel: impl Into<String>, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Path relative to the workspace root.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Natural order: by branch, then by path.
///
/// The remote is the last tie-breaker so that the order agrees with `Eq`.
impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.branch
            .cmp(&other.branch)
            .then_with(|| self.rel.cmp(&other.rel))
            .then_with(|| self.remote.cmp(&other.remote))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rel, self.remote, self.branch)
    }
}

/// An in-place change to one subrepository: same `rel`, new remote and/or branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub old: Record,
    pub new: Record,
}

impl Delta {
    pub fn new(old: Record, new: Record) -> Self {
        Self { old, new }
    }

    /// True when applying the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.old == self.new
    }

    pub fn rel(&self) -> &str {
        self.old.rel()
    }

    pub fn branch_changed(&self) -> bool {
        self.old.branch != self.new.branch
    }

    pub fn remote_changed(&self) -> bool {
        self.old.remote != self.new.remote
    }
}

/// Renders each field as `value` or `old→new`, tab separated.
impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            change(&self.old.rel, &self.new.rel),
            change(&self.old.remote, &self.new.remote),
            change(&self.old.branch, &self.new.branch)
        )
    }
}

fn change(old: &str, new: &str) -> String {
    if old == new {
        old.to_string()
    } else {
        format!("{old}→{new}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn natural_order_is_branch_then_rel() {
        let mut records = vec![
            Record::new("b", "r", "master"),
            Record::new("z", "r", "dev"),
            Record::new("a", "r", "master"),
            Record::new("c", "r", "dev"),
        ];
        records.sort();

        let rels: Vec<_> = records.iter().map(Record::rel).collect();
        assert_eq!(rels, vec!["c", "z", "a", "b"]);
    }

    #[test]
    fn equality_covers_all_fields() {
        let base = Record::new("p", "r1", "b1");
        assert_eq!(base, Record::new("p", "r1", "b1"));
        assert_ne!(base, Record::new("p", "r2", "b1"));
        assert_ne!(base, Record::new("p", "r1", "b2"));
        assert_ne!(base, Record::new("q", "r1", "b1"));
    }

    #[test]
    fn record_display() {
        let record = Record::new("libs/a", "git@h:a.git", "dev");
        assert_eq!(record.to_string(), "libs/a git@h:a.git dev");
    }

    #[test]
    fn delta_empty_iff_equal() {
        let a = Record::new("p", "r1", "b1");
        assert!(Delta::new(a.clone(), a.clone()).is_empty());
        assert!(!Delta::new(a, Record::new("p", "r1", "b2")).is_empty());
    }

    #[test]
    fn delta_display_marks_changed_fields() {
        let delta = Delta::new(
            Record::new("libs/a", "git@h:a.git", "dev"),
            Record::new("libs/a", "git@h:a.git", "master"),
        );
        assert_eq!(delta.to_string(), "libs/a\tgit@h:a.git\tdev→master");
        assert!(delta.branch_changed());
        assert!(!delta.remote_changed());
    }
}
