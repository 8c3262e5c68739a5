use pipeline_health::{PipelineModel, Snapshot};
use pretty_assertions::assert_eq;
use std::io::Write;

const FIXTURE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/eventids.json");

#[test]
fn load_reads_fixture_file() {
    let snapshot = Snapshot::load(FIXTURE_PATH).unwrap();

    assert_eq!(snapshot.version.as_deref(), Some("1"));
    let names: Vec<&str> = snapshot.pipelines.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["eventids", "misconfigured", "billing"]);

    let out = PipelineModel::from_definitions(&snapshot.pipelines);
    assert_eq!(
        out.snapshot("eventids").map(|s| s.root_node.subtree_stats.lost),
        Some(21)
    );
}

#[test]
fn load_matches_from_json_str() {
    let text = std::fs::read_to_string(FIXTURE_PATH).unwrap();
    assert_eq!(
        Snapshot::load(FIXTURE_PATH).unwrap(),
        Snapshot::from_json_str(&text).unwrap()
    );
}

#[test]
fn missing_file_error_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let path = path.to_string_lossy().to_string();

    let err = Snapshot::load(&path).unwrap_err();
    assert_eq!(err.to_string(), format!("read snapshot file {}", path));
    assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn malformed_file_error_names_the_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"pipelines": [{{"name": "p", "max_seconds_to_reach_end": 0, "root": "a"}}]}}"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let err = Snapshot::load(&path).unwrap_err();
    assert_eq!(err.to_string(), format!("invalid snapshot in {}", path));
    assert!(format!("{:#}", err).contains("positive number of seconds"));
}
