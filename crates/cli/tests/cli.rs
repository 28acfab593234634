use assert_cmd::Command;

fn bookshelf() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env_remove("BOOKSHELF_ENV")
        .env("BOOKSHELF_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env("BOOKSHELF_DATABASE__URL", "sqlite::memory:");
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn validate_accepts_complete_book() {
    let output = bookshelf()
        .args(["validate", &fixture("valid_book.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid"));
}

#[test]
fn validate_reports_each_violation() {
    let output = bookshelf()
        .args(["validate", &fixture("missing_title.json")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("book"));
}

#[test]
fn validate_missing_file_fails() {
    bookshelf()
        .args(["validate", &fixture("does_not_exist.json")])
        .assert()
        .failure();
}

#[test]
fn migrate_applies_books_table() {
    let output = bookshelf()
        .env("BOOKSHELF_TELEMETRY__FILTER", "off")
        .arg("migrate")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("applied 1 migrations"));
}
