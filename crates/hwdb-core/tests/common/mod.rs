// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use std::io::Write;

use hwdb_core::coord::{
    AnalogOnHicann, Coordinate, FpgaGlobal, FpgaOnWafer, HicannGlobal, HicannOnWafer, Wafer,
};
use hwdb_core::Database;
use tempfile::NamedTempFile;

/// A wafer system, two DLS setups, a cube and a jBOA.
pub const FIXTURE: &str = "\
---
wafer: 5
setuptype: bsswafer
macu: 192.168.200.165
macuversion: 1
fpgas:
  - fpga: 0
    ip: 192.168.5.1
  - fpga: 3
    ip: 192.168.5.4
reticles:
  - reticle: 0
    to_be_powered: true
  - reticle: 1
    to_be_powered: false
ananas:
  - ananas: 0
    ip: 192.168.5.190
    baseport_data: 0xafe0
    baseport_reset: 0x2570
adcs:
  - fpga: 0
    analog: 0
    adc: B201331
    channel: 0
    trigger: 1
  - fpga: 0
    analog: 1
    adc: B201331
    channel: 1
    trigger: 1
  - fpga: 3
    analog: 0
    adc: B201259
    channel: 0
    trigger: 1
    remote_ip: 192.168.200.44
    remote_port: 44489
hicanns:
  - hicann: 88
    version: 4
  - hicann: 116
    version: 4
    label: v4-26
  - hicann: 144
    version: 4
    label: v4-15
---
dls_setup: '07_20'
fpga_name: '07'
board_name: 'Gaston'
board_version: 2
chip_id: '20'
chip_version: 2
ntpwr_ip: '192.168.200.54'
ntpwr_slot: 1
---
dls_setup: 'B123456_42'
fpga_name: 'B123456'
board_name: 'Herbert'
board_version: 5
chip_id: '42'
chip_version: 4
ntpwr_ip: '192.168.200.108'
ntpwr_slot: 3
---
hxcube_id: 6
fpgas:
  - fpga: 0
    ip: 192.168.66.1
    ci_test_node: true
    extoll_node_id: 2
    handwritten_chip_serial: 12
    chip_revision: 42
    eeprom_chip_serial: 0x1234ABCD
    synram_timing_pcconf: [[1, 2], [1, 2]]
    synram_timing_wconf: [[3, 4], [3, 4]]
    fuse_dna: 0x3A0E92C402882A33
  - fpga: 3
    ip: 192.168.66.4
    handwritten_chip_serial: 69
    chip_revision: 1
  - fpga: 7
    ip: 192.168.66.8
usb_host: 'AMTHost11'
usb_serial: 'AFEABC1230456789'
xilinx_hw_server: 'abc.de:1234'
---
jboa_id: 7
fpgas:
  - fpga: 12
    ip: 192.168.87.33
    handwritten_chip_serial: 13
    chip_revision: 43
  - fpga: 13
    ip: 192.168.87.34
    fuse_dna: 0x123456789
    handwritten_chip_serial: 14
    chip_revision: 44
aggregators:
  - aggregator: 0
    ip: 192.168.87.13
    ci_test_node: true
  - aggregator: 1
    ip: 192.168.87.45
xilinx_hw_server: 'abc.yz:4321'
";

/// Writes `text` to a temporary file that lives as long as the handle.
pub fn write_temp(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Database loaded from [`FIXTURE`] through a file.
pub fn fixture_db() -> Database {
    let file = write_temp(FIXTURE);
    let mut db = Database::new();
    db.load(file.path()).expect("load fixture");
    db
}

pub fn wafer(id: usize) -> Wafer {
    Wafer::from_index(id).expect("wafer")
}

pub fn fpga(w: usize, f: usize) -> FpgaGlobal {
    FpgaGlobal::new(FpgaOnWafer::from_index(f).expect("fpga"), wafer(w))
}

pub fn hicann(w: usize, h: usize) -> HicannGlobal {
    HicannGlobal::new(HicannOnWafer::from_index(h).expect("hicann"), wafer(w))
}

pub fn analog(a: usize) -> AnalogOnHicann {
    AnalogOnHicann::from_index(a).expect("analog")
}
