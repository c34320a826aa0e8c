use pretty_assertions::assert_eq;
use rstest::rstest;
use sbr_core::{Record, diff, manifest};

const CANONICAL: &str = r#""libs/a" "git@h:a.git"
"libs/c" "git@h:c.git"
"dev"
"libs/b" "git@h:b.git"
"#;

const MIXED: &str = r#"# explicit branch overrides
"libs/c" "git@h:c.git"
"libs/b" "git@h:b.git" "dev"
libs/a   git@h:a.git
"#;

const LEGACY: &str = "\
git libs/b git@h:b.git dev
git libs/a git@h:a.git master
git libs/c git@h:c.git master
";

#[rstest]
#[case::canonical(CANONICAL)]
#[case::mixed(MIXED)]
#[case::legacy(LEGACY)]
fn every_shape_canonicalizes_to_the_same_text(#[case] text: &str) {
    let records = manifest::parse(text).unwrap();
    insta::allow_duplicates! {
        insta::assert_snapshot!(manifest::serialize(&records), @r#"
        "dev"
        "libs/b" "git@h:b.git"
        "master"
        "libs/a" "git@h:a.git"
        "libs/c" "git@h:c.git"
        "#);
    }
}

#[test]
fn canonical_text_is_a_fixed_point() {
    let once = manifest::serialize(&manifest::parse(LEGACY).unwrap());
    let twice = manifest::serialize(&manifest::parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn disjoint_sets_partition_into_insertions_and_deletions() {
    let a = vec![Record::new("x", "r", "master"), Record::new("y", "r", "dev")];
    let b = vec![Record::new("z", "r", "master")];

    let result = diff(&a, &b);
    assert_eq!(result.insertions, b);
    assert_eq!(result.deletions, a);
    assert!(result.updates.is_empty());
}

#[test]
fn branch_only_change_is_a_single_update() {
    let result = diff(
        &[Record::new("p", "r1", "b1")],
        &[Record::new("p", "r1", "b2")],
    );
    assert!(result.insertions.is_empty());
    assert!(result.deletions.is_empty());
    assert_eq!(result.updates.len(), 1);
    assert_eq!(result.updates[0].old.branch(), "b1");
    assert_eq!(result.updates[0].new.branch(), "b2");
}
