// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Emits the document stream read by [`super::reader`].

use std::collections::BTreeMap;
use std::io;

use hwdb_coord::{HicannOnWafer, Wafer};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::database::Database;
use crate::entries::{
    CalibrationMode, DlsSetupEntry, HicannEntry, HxCubeFpgaEntry, HxCubeSetupEntry,
    JboaSetupEntry, SynramTiming, WaferEntry,
};
use crate::error::{HwdbError, Result};

/// Insertion-ordered mapping under construction.
#[derive(Default)]
struct Doc(Mapping);

impl Doc {
    fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(Value::from(key), value.into());
        self
    }

    fn put_if(&mut self, cond: bool, key: &str, value: impl Into<Value>) -> &mut Self {
        if cond {
            self.put(key, value);
        }
        self
    }

    fn put_list(&mut self, key: &str, items: Vec<Value>) -> &mut Self {
        self.put_if(!items.is_empty(), key, items)
    }

    fn done(&mut self) -> Value {
        Value::Mapping(std::mem::take(&mut self.0))
    }
}

fn hex(value: u64) -> Value {
    Value::from(format!("{value:#X}"))
}

fn timing(table: &SynramTiming) -> Value {
    Value::from(table.iter().map(|row| Value::from(row.to_vec())).collect::<Vec<_>>())
}

pub(crate) fn dump(db: &Database, out: &mut impl io::Write) -> Result<()> {
    let documents = db
        .wafers
        .iter()
        .map(|(wafer, entry)| wafer_document(*wafer, entry))
        .chain(db.dls_setups.iter().map(|(id, e)| dls_document(id, e)))
        .chain(db.hxcubes.values().map(hxcube_document))
        .chain(db.jboas.values().map(jboa_document));
    let mut count = 0_usize;
    for document in documents {
        let text = serde_yaml::to_string(&document)?;
        out.write_all(b"---\n").map_err(HwdbError::Write)?;
        out.write_all(text.as_bytes()).map_err(HwdbError::Write)?;
        count += 1;
    }
    out.flush().map_err(HwdbError::Write)?;
    debug!(documents = count, "dumped database");
    Ok(())
}

fn wafer_document(wafer: Wafer, entry: &WaferEntry) -> Value {
    let mut doc = Doc::default();
    doc.put("wafer", wafer.value())
        .put("setuptype", entry.setup_type.name());
    let macu = entry.setup_type.requires_macu() || entry.has_macu();
    doc.put_if(macu, "macu", entry.macu.to_string())
        .put_if(macu, "macuversion", entry.macu_version);

    let fpgas = entry
        .fpgas
        .iter()
        .map(|(fpga, e)| {
            Doc::default()
                .put("fpga", fpga.local().value())
                .put("ip", e.ip.to_string())
                .put_if(!e.highspeed, "highspeed", false)
                .done()
        })
        .collect();
    let reticles = entry
        .reticles
        .iter()
        .map(|(reticle, e)| {
            Doc::default()
                .put("reticle", reticle.local().value())
                .put_if(!e.to_be_powered, "to_be_powered", false)
                .done()
        })
        .collect();
    let ananas = entry
        .ananas
        .iter()
        .map(|(ananas, e)| {
            Doc::default()
                .put("ananas", ananas.local().value())
                .put("ip", e.ip.to_string())
                .put("baseport_data", e.baseport_data)
                .put("baseport_reset", e.baseport_reset)
                .done()
        })
        .collect();
    let adcs = entry
        .adcs
        .iter()
        .map(|((fpga, analog), e)| {
            Doc::default()
                .put("fpga", fpga.local().value())
                .put("analog", analog.value())
                .put("adc", e.coord.as_str())
                .put("channel", e.channel.value())
                .put("trigger", e.trigger.value())
                .put_if(
                    e.calibration != CalibrationMode::default(),
                    "calibration",
                    e.calibration.name(),
                )
                .put_if(e.is_remote(), "remote_ip", e.remote_ip.to_string())
                .put_if(e.is_remote(), "remote_port", e.remote_port)
                .done()
        })
        .collect();

    doc.put_list("fpgas", fpgas)
        .put_list("reticles", reticles)
        .put_list("ananas", ananas)
        .put_list("adcs", adcs);

    if let Some(common) = uniform_hicann(&entry.hicanns) {
        doc.put("hicanns", hicann_fields(&mut Doc::default(), common).done());
    } else {
        let hicanns = entry
            .hicanns
            .iter()
            .map(|(hicann, e)| {
                let mut item = Doc::default();
                item.put("hicann", hicann.local().value());
                hicann_fields(&mut item, e).done()
            })
            .collect();
        doc.put_list("hicanns", hicanns);
    }
    doc.done()
}

/// The shared entry if every HICANN of the wafer is present and identical.
fn uniform_hicann<K>(hicanns: &BTreeMap<K, HicannEntry>) -> Option<&HicannEntry> {
    if hicanns.len() != HicannOnWafer::SIZE {
        return None;
    }
    let mut entries = hicanns.values();
    let first = entries.next()?;
    entries.all(|e| e == first).then_some(first)
}

fn hicann_fields<'d>(doc: &'d mut Doc, entry: &HicannEntry) -> &'d mut Doc {
    doc.put("version", entry.version)
        .put_if(!entry.label.is_empty(), "label", entry.label.as_str())
}

fn dls_document(id: &str, entry: &DlsSetupEntry) -> Value {
    let mut doc = Doc::default();
    doc.put("dls_setup", id)
        .put("fpga_name", entry.fpga_name.as_str())
        .put("board_name", entry.board_name.as_str())
        .put("board_version", entry.board_version)
        .put("chip_id", entry.chip_id)
        .put("chip_version", entry.chip_version);
    if let Some(ip) = &entry.ntpwr_ip {
        doc.put("ntpwr_ip", ip.as_str());
    }
    if let Some(slot) = entry.ntpwr_slot {
        doc.put("ntpwr_slot", slot);
    }
    doc.done()
}

fn setup_fpgas(fpgas: &BTreeMap<usize, HxCubeFpgaEntry>) -> Vec<Value> {
    fpgas
        .iter()
        .map(|(id, e)| {
            let mut doc = Doc::default();
            doc.put("fpga", *id).put("ip", e.ip.to_string());
            if let Some(dna) = e.fuse_dna {
                doc.put("fuse_dna", hex(dna));
            }
            if let Some(node) = e.extoll_node_id {
                doc.put("extoll_node_id", node);
            }
            doc.put_if(e.ci_test_node, "ci_test_node", true);
            if let Some(wing) = &e.wing {
                doc.put("handwritten_chip_serial", wing.handwritten_chip_serial)
                    .put("chip_revision", wing.chip_revision);
                if let Some(serial) = wing.eeprom_chip_serial {
                    doc.put("eeprom_chip_serial", hex(serial));
                }
                if let Some(table) = &wing.synram_timing_pcconf {
                    doc.put("synram_timing_pcconf", timing(table));
                }
                if let Some(table) = &wing.synram_timing_wconf {
                    doc.put("synram_timing_wconf", timing(table));
                }
            }
            doc.done()
        })
        .collect()
}

fn hxcube_document(entry: &HxCubeSetupEntry) -> Value {
    let mut doc = Doc::default();
    doc.put("hxcube_id", entry.hxcube_id)
        .put_list("fpgas", setup_fpgas(&entry.fpgas))
        .put_if(!entry.usb_host.is_empty(), "usb_host", entry.usb_host.as_str())
        .put_if(
            !entry.usb_serial.is_empty(),
            "usb_serial",
            entry.usb_serial.as_str(),
        );
    if let Some(server) = &entry.xilinx_hw_server {
        doc.put("xilinx_hw_server", server.as_str());
    }
    doc.done()
}

fn jboa_document(entry: &JboaSetupEntry) -> Value {
    let aggregators = entry
        .aggregators
        .iter()
        .map(|(id, e)| {
            Doc::default()
                .put("aggregator", *id)
                .put("ip", e.ip.to_string())
                .put_if(e.ci_test_node, "ci_test_node", true)
                .done()
        })
        .collect();
    let mut doc = Doc::default();
    doc.put("jboa_id", entry.jboa_id)
        .put_list("fpgas", setup_fpgas(&entry.fpgas))
        .put_list("aggregators", aggregators);
    if let Some(server) = &entry.xilinx_hw_server {
        doc.put("xilinx_hw_server", server.as_str());
    }
    doc.done()
}
