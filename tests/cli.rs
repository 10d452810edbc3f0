use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const LEDGER: &str = "Id,Date,Transaction\n0,7/15,+60.5\n1,7/28,-10.3\n2,8/2,-20.46\n3,8/13,+10\n";

fn txsummary(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("txsummary").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("TXSUMMARY_LOG");
    cmd
}

fn write_ledger(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("txns.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn eml_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|rd| rd.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

#[test]
fn run_writes_summary_email_to_outbox() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), LEDGER);
    let outbox = home.path().join("outbox");
    let db = home.path().join("data").join("ledger.db");

    txsummary(home.path())
        .arg("run")
        .arg(&ledger)
        .args(["--email-to", "ana@example.com"])
        .arg("--db")
        .arg(&db)
        .arg("--outbox")
        .arg(&outbox)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 transactions imported"))
        .stdout(predicate::str::contains("July"))
        .stdout(predicate::str::contains("August"));

    let files = eml_files(&outbox);
    assert_eq!(files.len(), 1);
    let email = std::fs::read_to_string(&files[0]).unwrap();
    assert!(email.contains("To: ana@example.com"));
    assert!(email.contains("Subject: Transaction Summary"));
    assert!(email.contains("Total balance:   $39.74"));
    assert!(db.exists());
}

#[test]
fn run_in_memory_prints_email() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), LEDGER);
    let db = home.path().join("never.db");

    txsummary(home.path())
        .arg("run")
        .arg(&ledger)
        .args(["--email-to", "ana@example.com", "--in-memory", "--stdout"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject: Transaction Summary"))
        .stdout(predicate::str::contains("4 (2 credit, 2 debit)"));

    assert!(!db.exists());
}

#[test]
fn step_by_step_commands_share_the_database() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), LEDGER);
    let db = home.path().join("ledger.db");
    let db_arg = db.to_str().unwrap();

    txsummary(home.path())
        .args(["accounts", "create", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account 1"));

    txsummary(home.path())
        .args(["show", "--account", "1", "--db", db_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));

    txsummary(home.path())
        .arg("import")
        .arg(&ledger)
        .args(["--account", "1", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 transactions imported into account 1"));

    txsummary(home.path())
        .args(["summarize", "--account", "1", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account 1 summary"));

    txsummary(home.path())
        .args(["show", "--account", "1", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("August"));

    txsummary(home.path())
        .args(["status", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:        4"))
        .stdout(predicate::str::contains("Month summaries:     2"));
}

#[test]
fn summarize_empty_account_fails() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("ledger.db");
    let db_arg = db.to_str().unwrap();

    txsummary(home.path()).args(["accounts", "create", "--db", db_arg]).assert().success();
    txsummary(home.path())
        .args(["summarize", "--account", "1", "--db", db_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn import_into_unknown_account_fails() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), LEDGER);
    let db = home.path().join("ledger.db");

    txsummary(home.path())
        .arg("import")
        .arg(&ledger)
        .args(["--account", "5", "--db", db.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("account 5"));
}

#[test]
fn malformed_ledger_is_a_parse_error() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), "Id,Date,Transaction\n0,7/15,+60.5\n1,July 28,-10.3\n");
    let outbox = home.path().join("outbox");

    txsummary(home.path())
        .arg("run")
        .arg(&ledger)
        .args(["--email-to", "ana@example.com", "--in-memory"])
        .arg("--outbox")
        .arg(&outbox)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("line 3"));

    assert!(eml_files(&outbox).is_empty());
}

#[test]
fn bad_recipient_is_rejected_before_import() {
    let home = tempfile::tempdir().unwrap();
    let ledger = write_ledger(home.path(), LEDGER);
    let db = home.path().join("ledger.db");

    txsummary(home.path())
        .arg("run")
        .arg(&ledger)
        .args(["--email-to", "nobody", "--db", db.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Delivery error"));

    assert!(!db.exists());
}

#[test]
fn init_writes_settings_under_home() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("books");

    txsummary(home.path())
        .args(["init", "--data-dir", data.to_str().unwrap(), "--reference-year", "2023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized txsummary"));

    let settings = std::fs::read_to_string(home.path().join(".config/txsummary/settings.json")).unwrap();
    assert!(settings.contains("\"reference_year\": 2023"));
    assert!(data.join("txsummary.db").exists());
    assert!(data.join("outbox").is_dir());
}

#[test]
fn broken_settings_block_commands_but_not_init() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join(".config/txsummary");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(config.join("settings.json"), "{ not json").unwrap();

    txsummary(home.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Settings error"))
        .stderr(predicate::str::contains("settings.json"));

    let data = home.path().join("books");
    txsummary(home.path())
        .args(["init", "--data-dir", data.to_str().unwrap()])
        .assert()
        .success();

    let settings = std::fs::read_to_string(config.join("settings.json")).unwrap();
    assert!(settings.contains("\"reference_year\": 2000"));
    txsummary(home.path()).arg("status").assert().success();
}
