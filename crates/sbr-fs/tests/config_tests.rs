use pretty_assertions::assert_eq;
use sbr_fs::{ConfigStore, Error};
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, Deserialize)]
struct Sample {
    name: String,
    #[serde(default)]
    enabled: bool,
}

#[test]
fn load_reads_toml_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sbr.toml");
    std::fs::write(&path, "name = \"workspace\"\nenabled = true\n").unwrap();

    let loaded: Sample = ConfigStore::new().load(&path).unwrap();
    assert_eq!(
        loaded,
        Sample {
            name: "workspace".into(),
            enabled: true,
        }
    );
}

#[test]
fn load_or_default_without_file() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();

    let loaded: Sample = store
        .load_or_default(&temp.path().join("absent.toml"))
        .unwrap();
    assert_eq!(loaded, Sample::default());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    std::fs::write(&path, "name = [unclosed").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    match result {
        Err(Error::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
