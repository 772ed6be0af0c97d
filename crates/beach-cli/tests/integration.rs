#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PRIVATE_KEY: &str = include_str!("../../beach-core/tests/fixtures/service_account_key.pem");

fn account() -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "beachsafe-demo",
        "private_key_id": "abc123",
        "private_key": PRIVATE_KEY,
        "client_email": "svc@beachsafe-demo.iam.gserviceaccount.com",
    })
    .to_string()
}

/// `beachsafe` pointed at a config and a file store inside `dir`, isolated
/// from any variables set in the calling environment.
fn beachsafe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("beachsafe").unwrap();
    cmd.current_dir(dir.path())
        .env("BEACHSAFE_CONFIG", dir.path().join("beachsafe.yaml"))
        .env("BEACH_STORE", "file")
        .env("BEACH_DATA_FILE", dir.path().join("beaches.json"));
    for var in [
        "PORT",
        "FIREBASE_DATABASE_URL",
        "FIREBASE_AUTH_TOKEN",
        "FIREBASE_SERVICE_ACCOUNT",
        "BEACH_SEED_FILE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// setup
// ---------------------------------------------------------------------------

#[test]
fn setup_writes_service_account_to_config() {
    let dir = TempDir::new().unwrap();
    let account_file = dir.path().join("account.json");
    std::fs::write(&account_file, account()).unwrap();

    beachsafe(&dir)
        .args(["setup", "--service-account"])
        .arg(&account_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("beachsafe-demo"))
        .stdout(predicate::str::contains(
            "https://beachsafe-demo-default-rtdb.firebaseio.com",
        ))
        .stdout(predicate::str::contains(
            "authenticate as svc@beachsafe-demo.iam.gserviceaccount.com",
        ));

    let saved = std::fs::read_to_string(dir.path().join("beachsafe.yaml")).unwrap();
    let yaml: serde_yaml::Value = serde_yaml::from_str(&saved).unwrap();
    assert_eq!(yaml["service_account"]["project_id"], "beachsafe-demo");
    assert_eq!(yaml["port"], 3000);
}

#[test]
fn setup_preserves_existing_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("beachsafe.yaml"), "port: 8080\n").unwrap();

    beachsafe(&dir)
        .args(["setup", "--database-url", "https://custom.firebaseio.com"])
        .write_stdin(account())
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("beachsafe.yaml")).unwrap();
    let yaml: serde_yaml::Value = serde_yaml::from_str(&saved).unwrap();
    assert_eq!(yaml["port"], 8080);
    assert_eq!(yaml["store"]["database_url"], "https://custom.firebaseio.com");
}

#[test]
fn setup_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .arg("setup")
        .write_stdin("{ definitely not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid service account JSON"));
    assert!(!dir.path().join("beachsafe.yaml").exists());
}

#[test]
fn setup_rejects_account_without_private_key() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .arg("setup")
        .write_stdin(
            r#"{"type":"service_account","project_id":"beachsafe-demo","client_email":"svc@beachsafe-demo.iam.gserviceaccount.com"}"#,
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("not usable for signing"));
    assert!(!dir.path().join("beachsafe.yaml").exists());
}

#[test]
fn setup_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .args(["setup", "--service-account", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read file at nope.json"));
}

// ---------------------------------------------------------------------------
// bootstrap / list / show / search / sync-check
// ---------------------------------------------------------------------------

#[test]
fn bootstrap_then_query_file_store() {
    let dir = TempDir::new().unwrap();

    beachsafe(&dir)
        .arg("bootstrap")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 18 beaches."));
    beachsafe(&dir)
        .arg("bootstrap")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing written"));

    let all = stdout_json(beachsafe(&dir).args(["--json", "list"]));
    assert_eq!(all.as_array().unwrap().len(), 18);

    let marina = stdout_json(beachsafe(&dir).args(["--json", "show", "1"]));
    assert_eq!(marina["name"], "Marina Beach");

    let hits = stdout_json(beachsafe(&dir).args(["--json", "search", "kerala"]));
    assert_eq!(hits.as_array().unwrap().len(), 4);
}

#[test]
fn show_unknown_beach_fails() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir).arg("bootstrap").assert().success();
    beachsafe(&dir)
        .args(["show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("beach not found: 99"));
}

#[test]
fn sync_check_fixes_then_reports_nothing() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir).arg("bootstrap").assert().success();

    let report = stdout_json(beachsafe(&dir).args(["--json", "sync-check"]));
    assert_eq!(report["checked"], 18);
    assert_eq!(report["updated"], 1);
    assert_eq!(report["updatedBeaches"][0]["name"], "Juhu Beach");

    beachsafe(&dir)
        .arg("sync-check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 18 beaches, updated 0 safety values."));
}

#[test]
fn sync_check_on_empty_store_fails() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .arg("sync-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no beaches found in database"));
}

#[test]
fn firebase_without_credentials_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .args(["--store", "firebase", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("beachsafe setup"));
}

#[test]
fn unknown_store_backend_is_rejected() {
    let dir = TempDir::new().unwrap();
    beachsafe(&dir)
        .args(["--store", "postgres", "list"])
        .assert()
        .failure();
}
