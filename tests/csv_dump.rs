//! Integration tests for CSV snapshot export.

use serde_json::json;
use wsh::device::mock::MockSession;
use wsh::export::dump_csv;

#[tokio::test]
async fn test_first_dump_writes_header_and_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charger.csv");
    let mock = MockSession::seeded();

    dump_csv(&mock, &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "header plus exactly one data row");

    let header: Vec<&str> = lines[0].split(',').collect();
    let row: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(header.len(), row.len());

    let mut sorted = header.clone();
    sorted.sort_unstable();
    assert_eq!(header, sorted, "columns are sorted by alias");
}

#[tokio::test]
async fn test_second_dump_appends_without_rewriting_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charger.csv");
    let mock = MockSession::seeded();

    dump_csv(&mock, &path).await.unwrap();
    dump_csv(&mock, &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "one header, two data rows");
    assert_eq!(
        lines.iter().filter(|l| **l == lines[0]).count(),
        1,
        "header appears exactly once"
    );
}

#[tokio::test]
async fn test_bookkeeping_property_is_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charger.csv");
    let mock = MockSession::seeded();

    dump_csv(&mock, &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let header = content.lines().next().unwrap();
    assert!(!header.split(',').any(|col| col == "heartbeat"));
    assert!(header.split(',').any(|col| col == "frequency"));
}

#[tokio::test]
async fn test_dump_renders_scalars_plainly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charger.csv");
    let mock = MockSession::new()
        .with_property("volt", json!(230.1))
        .with_property("cableLock", json!(true))
        .with_property("carState", json!("ready"));

    dump_csv(&mock, &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "cableLock,carState,volt");
    assert_eq!(lines[1], "true,ready,230.1");
}
