// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Raw document lookup against the reference file.

mod common;

use common::{write_temp, FIXTURE};
use hwdb_core::get_yaml_entries;

#[test]
fn dls_setup_is_returned_as_written() {
    let file = write_temp(FIXTURE);
    let out = get_yaml_entries(file.path(), "dls_setup", "07_20").unwrap();
    let expected = "\
dls_setup: '07_20'
fpga_name: '07'
board_name: 'Gaston'
board_version: 2
chip_id: '20'
chip_version: 2
ntpwr_ip: '192.168.200.54'
ntpwr_slot: 1
";
    assert_eq!(out, expected);
}

#[test]
fn numeric_ids_match_by_text() {
    let file = write_temp(FIXTURE);
    let out = get_yaml_entries(file.path(), "hxcube_id", "6").unwrap();
    assert!(out.starts_with("hxcube_id: 6\n"));
    assert!(out.ends_with("xilinx_hw_server: 'abc.de:1234'\n"));
    let out = get_yaml_entries(file.path(), "wafer", "5").unwrap();
    assert!(out.contains("macu: 192.168.200.165"));
}

#[test]
fn no_match_is_empty_not_an_error() {
    let file = write_temp(FIXTURE);
    assert_eq!(get_yaml_entries(file.path(), "dls_setup", "07_21").unwrap(), "");
    assert_eq!(get_yaml_entries(file.path(), "no_such_key", "x").unwrap(), "");
}

#[test]
fn every_match_is_returned() {
    let file = write_temp("---\nrack: 1\nrow: a\n---\nrack: 2\n---\nrack: 1\nrow: b\n");
    let out = get_yaml_entries(file.path(), "rack", "1").unwrap();
    assert_eq!(out, "rack: 1\nrow: a\nrack: 1\nrow: b\n");
}
