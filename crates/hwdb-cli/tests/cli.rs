// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! End-to-end runs of the `hwdb` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DB: &str = "\
---
wafer: 33
setuptype: facetswafer
fpgas:
  - fpga: 0
    ip: 192.168.33.1
reticles:
  - reticle: 0
    to_be_powered: false
---
dls_setup: '07_20'
fpga_name: '07'
board_name: 'Gaston'
";

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.yaml");
    fs::write(&path, DB).unwrap();
    (dir, path)
}

fn hwdb() -> Command {
    let mut cmd = Command::cargo_bin("hwdb").unwrap();
    cmd.env_remove("HWDB_PATH");
    cmd
}

#[test]
fn get_prints_property() {
    let (_dir, path) = setup();
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .args(["get", "W33D0", "to_be_powered"])
        .assert()
        .success()
        .stdout("false\n");
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .args(["get", "W33F0", "ip"])
        .assert()
        .success()
        .stdout("192.168.33.1\n");
}

#[test]
fn get_unknown_property_fails_with_alternatives() {
    let (_dir, path) = setup();
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .args(["get", "W33D0", "voltage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("available properties are: to_be_powered"));
}

#[test]
fn database_path_comes_from_environment() {
    let (_dir, path) = setup();
    hwdb()
        .env("HWDB_PATH", &path)
        .args(["get", "W33", "setup_type"])
        .assert()
        .success()
        .stdout("facetswafer\n");
}

#[test]
fn query_prints_raw_document() {
    let (_dir, path) = setup();
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .args(["query", "dls_setup", "07_20"])
        .assert()
        .success()
        .stdout("dls_setup: '07_20'\nfpga_name: '07'\nboard_name: 'Gaston'\n");
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .args(["query", "dls_setup", "none"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn dump_normalises_and_reloads() {
    let (dir, path) = setup();
    let out = dir.path().join("normal.yaml");
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .arg("dump")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("---\nwafer: 33\n"), "{text}");

    hwdb()
        .arg("--hwdb")
        .arg(&out)
        .arg("dump")
        .assert()
        .success()
        .stdout(text);
}

#[test]
fn licenses_writes_both_files() {
    let (dir, path) = setup();
    let licenses = dir.path().join("licenses");
    let tres = dir.path().join("tres");
    hwdb()
        .arg("--hwdb")
        .arg(&path)
        .arg("licenses")
        .arg("--license-file")
        .arg(&licenses)
        .arg("--tres-file")
        .arg(&tres)
        .assert()
        .success();
    let text = fs::read_to_string(&licenses).unwrap();
    assert!(text.starts_with("# file generated on: "));
    assert!(text.ends_with("Licenses=W33F0,W33T8"), "{text}");
    assert!(fs::read_to_string(&tres)
        .unwrap()
        .ends_with("AccountingStorageTRES=License/W33F0,License/W33T8"));
}

#[test]
fn missing_database_fails() {
    hwdb()
        .args(["--hwdb", "/nonexistent/hwdb.yaml", "get", "W1", "macu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading /nonexistent/hwdb.yaml"));
}
