use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r##"{
  "folders": [
    { "key": "f1", "color": "#E10051", "name": "My Trips" },
    { "key": "f2", "color": "#1EC38B", "name": "Code Bits" }
  ],
  "version": "1.0"
}"##;

const TRIP_NOTE: &str = r#"createdAt: "2019-04-02T10:00:00.000Z"
updatedAt: "2019-04-02T10:05:00.000Z"
type: "MARKDOWN_NOTE"
folder: "f1"
title: "Trip"
tags: [
  "travel"
]
content: '''
  ![beach](:storage/abc/pic.png)
'''
linesHighlighted: []
isStarred: false
isTrashed: false
"#;

const SNIPPET_NOTE: &str = r#"type: "SNIPPET_NOTE"
folder: "f2"
title: "Deploy: prod"
description: "top level description"
content: "top level content"
snippets: [
  {
    linesHighlighted: []
    name: "deploy.sh"
    mode: "sh"
    content: '''
      ./deploy.sh --prod
    '''
  }
]
isStarred: false
"#;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn boostnote_source() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "boostnote.json", MANIFEST.as_bytes());
    write(dir.path(), "notes/aaa.cson", TRIP_NOTE.as_bytes());
    write(dir.path(), "notes/bbb.cson", SNIPPET_NOTE.as_bytes());
    write(dir.path(), "notes/.DS_Store", b"junk");
    write(dir.path(), "attachments/abc/pic.png", PNG_BYTES);
    dir
}

fn cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("boost2obsidian").unwrap();
    cmd.env("BOOST2OBSIDIAN_CONFIG_DIR", config_home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_migrate_end_to_end() {
    let source = boostnote_source();
    let vault = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let report = home.path().join("report.json");

    cmd(home.path())
        .arg("migrate")
        .arg(source.path())
        .arg(vault.path())
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 2 note(s) and 1 attachment(s)"));

    // Trip note: reference rewritten, bytes copied under a UUID name
    let trip = fs::read_to_string(vault.path().join("My_Trips/Trip.md")).unwrap();
    let link = trip
        .strip_prefix("![beach](")
        .and_then(|rest| rest.strip_suffix(')'))
        .expect("rewritten image link");
    assert!(link.starts_with("My_Trips/attachments/"));
    assert!(link.ends_with(".png"));
    let copied = fs::read(vault.path().join(link)).unwrap();
    assert_eq!(copied, PNG_BYTES);

    // Snippet note: first snippet content, ':' in title replaced
    let snippet = fs::read_to_string(vault.path().join("Code_Bits/Deploy  prod.md")).unwrap();
    assert_eq!(snippet, "./deploy.sh --prod");

    assert!(vault.path().join(".obsidian/app.json").is_file());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(report["stage"], "Done");
    assert_eq!(report["notes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_attachment_fails_with_message() {
    let source = boostnote_source();
    fs::remove_file(source.path().join("attachments/abc/pic.png")).unwrap();
    let vault = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("migrate")
        .arg(source.path())
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Attachment not found"));

    assert!(!vault.path().join("My_Trips/Trip.md").exists());
}

#[test]
fn test_missing_attachment_can_be_skipped() {
    let source = boostnote_source();
    fs::remove_file(source.path().join("attachments/abc/pic.png")).unwrap();
    let vault = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("migrate")
        .arg(source.path())
        .arg(vault.path())
        .arg("--skip-missing-attachments")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, left unchanged"));

    let trip = fs::read_to_string(vault.path().join("My_Trips/Trip.md")).unwrap();
    assert_eq!(trip, "![beach](:storage/abc/pic.png)");
}

#[test]
fn test_unknown_folder_aborts() {
    let source = boostnote_source();
    write(
        source.path(),
        "notes/ccc.cson",
        b"type: \"MARKDOWN_NOTE\"\nfolder: \"missing\"\ntitle: \"Lost\"\ncontent: \"x\"\n",
    );
    let vault = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("migrate")
        .arg(source.path())
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown folder 'missing'"));
}

#[test]
fn test_config_dir_supplies_paths_and_policies() {
    let source = boostnote_source();
    write(
        source.path(),
        "notes/ccc.cson",
        b"type: \"TODO_NOTE\"\nfolder: \"f1\"\ntitle: \"Todo\"\n",
    );
    let vault = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let config = serde_json::json!({
        "source": source.path(),
        "destination": vault.path(),
        "on_unknown_kind": "skip"
    });
    fs::write(
        home.path().join("boost2obsidian.json"),
        serde_json::to_string(&config).unwrap(),
    )
    .unwrap();

    cmd(home.path())
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 1 note(s)"));

    assert!(vault.path().join("My_Trips/Trip.md").is_file());
}

#[test]
fn test_folders_lists_mapping() {
    let source = boostnote_source();
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("folders")
        .arg(source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My Trips"))
        .stdout(predicate::str::contains("Code_Bits"));
}

#[test]
fn test_inspect_writes_nothing() {
    let source = boostnote_source();
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("inspect")
        .arg(source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My_Trips/Trip.md"))
        .stdout(predicate::str::contains("abc/pic.png"))
        .stdout(predicate::str::contains("2 note(s), 1 attachment reference(s)"));
}

#[test]
fn test_migrate_without_paths_fails() {
    let home = TempDir::new().unwrap();

    cmd(home.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no source folder given"));
}
