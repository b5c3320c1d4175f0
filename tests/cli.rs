use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use std::time::Duration;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("gecon").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gecon"));
}

fn cfg_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    std::fs::write(p.join("credentials.yml"), "credentials:\n  uid: 1\n  uidc: abc\n").unwrap();
    std::fs::write(p.join("country-code.csv"), "code,id\nIND,100\nCHN,47\n").unwrap();
    std::fs::write(
        p.join("indicator-annual.csv"),
        "index,name\n2,\"Exports, percent of GDP\"\n",
    )
    .unwrap();
    std::fs::write(p.join("indicator-monthly.csv"), "index,name\n5,Retail sales\n").unwrap();
    dir
}

#[test]
fn cli_prints_uri_offline() {
    let dir = cfg_dir();
    let mut cmd = Command::cargo_bin("gecon").unwrap();
    cmd.args(["--cfg"])
        .arg(dir.path())
        .args([
            "uri",
            "--countries",
            "IN;CN",
            "--frequency",
            "quarterly",
            "--indicators",
            "Retail sales",
            "--period",
            "latest",
        ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tp=2&ind=5&cnt=100,47&prd=latest&uid=1&uidc=abc"));
}

#[test]
fn cli_lists_indicators() {
    let dir = cfg_dir();
    let mut cmd = Command::cargo_bin("gecon").unwrap();
    cmd.arg("--cfg")
        .arg(dir.path())
        .args(["indicators", "--filter", "exports"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2\tExports, percent of GDP"));
}

#[test]
fn cli_rejects_unresolvable_query() {
    let dir = cfg_dir();
    let mut cmd = Command::cargo_bin("gecon").unwrap();
    cmd.arg("--cfg")
        .arg(dir.path())
        .args(["uri", "--countries", "XX", "--indexes", "1"]);
    cmd.assert().failure();
}

#[test]
fn cli_bootstrap_stays_within_max_index() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    std::fs::write(p.join("credentials.yml"), "credentials:\n  uid: 1\n  uidc: abc\n").unwrap();
    std::fs::write(p.join("country-code.csv"), "code,id\nIND,100\n").unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("gecon").unwrap();
    cmd.arg("--cfg")
        .arg(p)
        .args(["--root", "http://127.0.0.1:9/export"])
        .args(["bootstrap", "--frequency", "annual", "--max-index", "2"])
        .timeout(Duration::from_secs(30));
    cmd.assert().success();
    assert!(p.join("indicator-annual.csv").exists());
    assert!(!p.join("indicator-monthly.csv").exists());
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_latest() {
    let mut cmd = Command::cargo_bin("gecon").unwrap();
    cmd.args([
        "get",
        "--countries",
        "IND,CHN",
        "--indicators",
        "Exports, percent of GDP",
        "--period",
        "latest",
    ]);
    cmd.assert().success();
}
