use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("shelf")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "migrate", "modules"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn modules_prints_registry() {
    let output = Command::cargo_bin("shelf")
        .unwrap()
        .arg("modules")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("sellers\n  001_init"));
    assert!(stdout.contains("books\n  001_init\n  002_seller_index"));
}

#[test]
fn migrate_applies_schema_to_fresh_database() {
    let output = Command::cargo_bin("shelf")
        .unwrap()
        .args(["migrate", "--database-url", "sqlite::memory:"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .contains("applied 3 migration(s)"));
}
