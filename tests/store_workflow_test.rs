//! Store Workflow Integration Tests
//!
//! End-to-end behavior of a single store over a real file:
//! - Creating the file and directory on first write
//! - Round trips, overwrites and deletes
//! - Section isolation
//! - Clear and status

mod common;

use common::{TestFixture, sorted};
use rcini::{ConfigStore, Error};

// =============================================================================
// Write
// =============================================================================

#[test]
fn test_first_write_creates_directory_and_file() {
    let fixture = TestFixture::new();
    assert!(!fixture.exists());

    fixture.store.write("Initialize", "DefaultPath", "True").unwrap();

    assert!(fixture.exists());
    assert!(fixture.path().ends_with("config/fixture.ini"));
    let raw = fixture.read_raw();
    assert!(raw.contains("[Initialize]"));
    assert!(raw.contains("DefaultPath=True"));
}

#[test]
fn test_write_then_find() {
    let fixture = TestFixture::new();
    fixture.store.write("Print", "Hello", "World").unwrap();
    assert_eq!(fixture.store.find("Print", "Hello"), "World");
}

#[test]
fn test_overwrite_keeps_single_entry() {
    let fixture = TestFixture::new();
    fixture.store.write("Net", "port", "80").unwrap();
    fixture.store.write("Net", "port", "8080").unwrap();

    assert_eq!(fixture.store.find("Net", "port"), "8080");
    assert_eq!(fixture.store.key_list("Net"), vec!["port"]);
    assert_eq!(fixture.read_raw().matches("port=").count(), 1);
}

#[test]
fn test_write_preserves_values_with_spaces() {
    let fixture = TestFixture::new();
    fixture
        .store
        .write("Paths", "log dir", "/var/log/my app")
        .unwrap();
    assert_eq!(fixture.store.find("Paths", "log dir"), "/var/log/my app");
}

#[test]
fn test_unrelated_writes_keep_other_values_intact() {
    let fixture = TestFixture::new();
    let store = &fixture.store;
    store.write("Odd", "quoted", "\"quoted\"").unwrap();
    store.write("Odd", "eq=key", "v").unwrap();
    store.write("Odd", "note", "a;b#c").unwrap();

    // Each write rewrites the whole file
    store.write("Other", "k", "v").unwrap();
    store.write("Other", "k", "v2").unwrap();

    assert_eq!(store.find("Odd", "quoted"), "\"quoted\"");
    assert_eq!(store.find("Odd", "eq=key"), "v");
    assert_eq!(store.find("Odd", "note"), "a;b#c");
    assert_eq!(store.find("Odd", "eq"), "");
}

#[test]
fn test_write_rejects_unrepresentable_entries() {
    let fixture = TestFixture::new();

    for (section, key, value) in [("A", "k", "  padded "), ("A", " k", "v"), ("A]", "k", "v")] {
        let err = fixture.store.write(section, key, value).unwrap_err();
        assert!(
            matches!(err, Error::InvalidParameter { op: "write", .. }),
            "unexpected error {err:?}"
        );
    }
    assert!(!fixture.exists());
}

#[test]
fn test_write_empty_argument_creates_nothing() {
    let fixture = TestFixture::new();

    for (section, key, value) in [("", "k", "v"), ("s", "", "v"), ("s", "k", "")] {
        let err = fixture.store.write(section, key, value).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));
    }

    assert!(!fixture.exists());
    assert!(!fixture.temp_dir.path().join("config").exists());
}

#[test]
fn test_write_empty_argument_leaves_file_unchanged() {
    let fixture = TestFixture::new();
    fixture.store.write("A", "k", "v").unwrap();
    let before = fixture.read_raw();

    assert!(fixture.store.write("A", "k", "").is_err());
    assert_eq!(fixture.read_raw(), before);
}

#[test]
fn test_write_to_directory_fails() {
    // "//" cleans down to the base directory itself
    let fixture = TestFixture::with_file("//");
    assert_eq!(fixture.path(), fixture.temp_dir.path());

    let err = fixture.store.write("Initialize", "WrongPath", "True").unwrap_err();
    assert!(matches!(err, Error::TargetIsDirectory { op: "write", .. }));
}

#[test]
fn test_write_to_explicit_nested_path() {
    let fixture = TestFixture::with_file("config/master.ini");
    fixture.store.write("Initialize", "OtherPath", "True").unwrap();

    assert!(fixture.temp_dir.path().join("config/master.ini").is_file());
    fixture.store.clear().unwrap();
    assert!(fixture.store.section_list().is_empty());
}

#[test]
fn test_write_unparseable_file() {
    let fixture = TestFixture::seeded("[Broken\nkey=value\n");
    let err = fixture.store.write("A", "k", "v").unwrap_err();
    assert!(matches!(err, Error::Parse { op: "write", .. }));
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn test_sections_are_isolated() {
    let fixture = TestFixture::new();
    fixture.store.write("B", "keep", "me").unwrap();
    fixture.store.write("A", "k1", "v1").unwrap();

    assert_eq!(fixture.store.key_list("B"), vec!["keep"]);

    fixture.store.delete_section("A").unwrap();
    assert_eq!(fixture.store.section_list(), vec!["B"]);
    assert_eq!(fixture.store.find("B", "keep"), "me");
}

#[test]
fn test_implicit_section_survives_rewrites() {
    let fixture = TestFixture::seeded("top=level\n[A]\nk=v\n");
    fixture.store.write("A", "k2", "v2").unwrap();

    assert_eq!(fixture.store.section_list(), vec!["A"]);
    assert!(fixture.read_raw().contains("top=level"));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_value_round_trip() {
    let fixture = TestFixture::new();
    fixture.store.write("S", "K", "V").unwrap();
    fixture.store.delete_value("S", "K").unwrap();

    assert_eq!(fixture.store.find("S", "K"), "");
    // The section itself remains
    assert_eq!(fixture.store.section_list(), vec!["S"]);
}

#[test]
fn test_delete_missing_section_is_noop() {
    let fixture = TestFixture::new();
    fixture.store.write("A", "k", "v").unwrap();
    let before = fixture.read_raw();

    fixture.store.delete_section("Ghost").unwrap();
    assert_eq!(fixture.read_raw(), before);
}

#[test]
fn test_delete_missing_value_is_noop() {
    let fixture = TestFixture::new();
    fixture.store.write("A", "k", "v").unwrap();
    let before = fixture.read_raw();

    fixture.store.delete_value("A", "ghost").unwrap();
    assert_eq!(fixture.read_raw(), before);
}

#[test]
fn test_delete_value_in_missing_section_fails() {
    let fixture = TestFixture::new();
    fixture.store.write("A", "k", "v").unwrap();

    let err = fixture.store.delete_value("Ghost", "k").unwrap_err();
    assert!(matches!(err, Error::SectionNotFound { op: "delete_value", .. }));
    assert!(err.is_not_found());
}

#[test]
fn test_delete_without_file() {
    let fixture = TestFixture::new();
    let err = fixture.store.delete_section("A").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { op: "delete_section", .. }));
    assert!(!fixture.exists());
}

#[test]
fn test_delete_argument_checks() {
    let fixture = TestFixture::new();
    assert!(matches!(
        fixture.store.delete_section(""),
        Err(Error::MissingArgument { field: "section", .. })
    ));
    assert!(matches!(
        fixture.store.delete_value("A", ""),
        Err(Error::MissingArgument { field: "key", .. })
    ));
}

// =============================================================================
// Full Scenario
// =============================================================================

#[test]
fn test_section_lifecycle_scenario() {
    let fixture = TestFixture::new();
    let store = &fixture.store;

    store.write("Section001", "Key001", "Value001").unwrap();
    let raw = fixture.read_raw();
    assert!(raw.contains("[Section001]"));
    assert!(raw.contains("Key001=Value001"));

    store.write("Section001", "Key002", "Value002").unwrap();
    assert_eq!(
        sorted(store.key_list("Section001")),
        vec!["Key001".to_string(), "Key002".to_string()]
    );
    assert_eq!(store.exist_section("Section001").unwrap().len(), 2);
    assert_eq!(store.exist_value("Section001", "Key002").unwrap(), "Value002");

    store.delete_section("Section001").unwrap();
    assert!(!fixture.read_raw().contains("[Section001]"));
    assert!(store.section_list().is_empty());
    assert!(store.exist_section("Section001").unwrap_err().is_not_found());
}

// =============================================================================
// Clear / Status / Snapshot
// =============================================================================

#[test]
fn test_clear_removes_every_section() {
    let fixture = TestFixture::new();
    for section in ["One", "Two", "Three"] {
        fixture.store.write(section, "k", "v").unwrap();
    }

    fixture.store.clear().unwrap();
    assert!(fixture.store.section_list().is_empty());
    assert!(fixture.exists());
}

#[test]
fn test_clear_without_file() {
    let fixture = TestFixture::new();
    assert!(matches!(
        fixture.store.clear(),
        Err(Error::FileNotFound { op: "clear", .. })
    ));
}

#[test]
fn test_status_tracks_file() {
    let fixture = TestFixture::new();
    assert!(fixture.store.status().unwrap_err().is_not_found());

    fixture.store.write("A", "k", "v").unwrap();
    fixture.store.status().unwrap();

    std::fs::remove_file(fixture.path()).unwrap();
    assert!(fixture.store.status().is_err());
}

#[test]
fn test_read_reports_parse_errors() {
    let fixture = TestFixture::seeded("[Unclosed\n");
    let err = fixture.store.read().unwrap_err();
    assert!(matches!(err, Error::Parse { op: "read", .. }));
    assert!(fixture.store.section_list().is_empty());
}

#[test]
fn test_snapshot_matches_file() {
    let fixture = TestFixture::seeded("[A]\nx=1\n[B]\ny=2\nz=3\n");
    let snapshot = fixture.store.snapshot();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["A"].get("x"), Some("1"));
    assert_eq!(snapshot["B"].len(), 2);
    assert!(snapshot["B"].contains_key("z"));
}

// =============================================================================
// Uninitialized Store
// =============================================================================

#[test]
fn test_uninitialized_store_never_touches_disk() {
    let store = ConfigStore::new();

    assert!(matches!(store.read(), Err(Error::MissingPath { op: "read" })));
    assert!(matches!(store.status(), Err(Error::MissingPath { op: "status" })));
    assert!(matches!(
        store.current_path(),
        Err(Error::MissingPath { op: "current_path" })
    ));
    assert!(matches!(
        store.write("A", "k", "v"),
        Err(Error::MissingPath { op: "write" })
    ));
    assert!(matches!(store.clear(), Err(Error::MissingPath { .. })));
    assert!(store.read().unwrap_err().is_argument_error());
}
