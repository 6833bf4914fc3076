use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn sailor(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sailor").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn opens_a_module_and_signs_out() {
    let dir = tempfile::tempdir().unwrap();
    let entitlements = dir.path().join("entitlements.json");
    fs::write(
        &entitlements,
        r#"{ "modules": [ { "name": "dashboard", "is_enabled": true },
                          { "name": "boats", "is_enabled": true },
                          { "name": "admin", "is_enabled": true } ] }"#,
    )
    .unwrap();

    sailor(&dir)
        .arg("--entitlements")
        .arg(&entitlements)
        .args(["--username", "skipper"])
        .write_stdin("boats\nlogout\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, skipper!"))
        .stdout(predicate::str::contains("> ⛵ Fleet Management (boats)"))
        .stdout(predicate::str::contains("Admin Panel").not())
        .stdout(predicate::str::ends_with("Signed out.\n"));
}

#[test]
fn admin_sees_the_admin_panel() {
    let dir = tempfile::tempdir().unwrap();
    let user = dir.path().join("user.json");
    fs::write(&user, r#"{ "username": "captain", "first_name": "Grace", "is_admin": true }"#)
        .unwrap();

    sailor(&dir)
        .arg("--user")
        .arg(&user)
        .write_stdin("admin\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Grace [admin]"))
        .stdout(predicate::str::contains("# Admin Panel"))
        .stdout(predicate::str::ends_with("Goodbye.\n"));
}

#[test]
fn config_file_sets_title_and_collapsed_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[shell]\ntitle = \"Harbor\"\ncollapsed = true\nicons = false\n").unwrap();

    sailor(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("== Harbor =="))
        .stdout(predicate::str::contains("> dashboard\n"));
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    sailor(&dir)
        .args(["--config", "nowhere.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
}

#[test]
fn unreadable_entitlements_start_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();

    sailor(&dir)
        .args(["--entitlements", "absent.json"])
        .write_stdin("boats\nlogout\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no modules available)"))
        .stdout(predicate::str::contains("! Entitlements unavailable"))
        .stdout(predicate::str::contains("Access denied to this module"));
}
