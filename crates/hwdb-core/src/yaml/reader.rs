// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Multi-document reader that fills a [`Database`].

use std::collections::BTreeMap;

use hwdb_coord::{
    AnalogOnHicann, AnanasGlobal, AnanasOnWafer, ChannelOnAdc, Coordinate, DncGlobal, DncOnWafer,
    FpgaGlobal, FpgaOnWafer, HicannGlobal, HicannOnWafer, TriggerOnAdc, Wafer,
};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, warn};

use super::fields::{describe, Fields};
use crate::database::Database;
use crate::entries::{
    AdcEntry, AnanasEntry, CalibrationMode, DlsSetupEntry, FpgaEntry, HicannEntry,
    HxCubeFpgaEntry, HxCubeSetupEntry, HxCubeWingEntry, JboaAggregatorEntry, JboaSetupEntry,
    ReticleEntry, WaferEntry,
};
use crate::error::{HwdbError, Result};

/// Kind of a top-level document, decided by which key it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Wafer system (`wafer`).
    Wafer,
    /// DLS lab setup (`dls_setup`).
    Dls,
    /// Cube setup (`hxcube_id`).
    HxCube,
    /// jBOA setup (`jboa_id`).
    Jboa,
}

impl DocumentKind {
    /// Classification order: the first kind whose key is present wins.
    pub const PRIORITY: [Self; 4] = [Self::Wafer, Self::Dls, Self::HxCube, Self::Jboa];

    /// Top-level key identifying this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Wafer => "wafer",
            Self::Dls => "dls_setup",
            Self::HxCube => "hxcube_id",
            Self::Jboa => "jboa_id",
        }
    }

    /// Kind of `document`, or `None` if it carries none of the identifying keys.
    pub fn classify(document: &Value) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| document.get(kind.key()).is_some())
    }
}

/// A document that was ignored during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Position in the file, counting from 0.
    pub index: usize,
    /// Top-level keys it carried.
    pub keys: Vec<String>,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Non-empty documents seen.
    pub documents: usize,
    /// Documents ignored because their kind is unknown.
    pub skipped: Vec<SkippedDocument>,
}

pub(crate) fn load_str(db: &mut Database, text: &str) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        report.documents += 1;
        match DocumentKind::classify(&value) {
            Some(DocumentKind::Wafer) => read_wafer(db, &value)?,
            Some(DocumentKind::Dls) => read_dls(db, &value)?,
            Some(DocumentKind::HxCube) => read_hxcube(db, &value)?,
            Some(DocumentKind::Jboa) => read_jboa(db, &value)?,
            None => {
                let keys = top_level_keys(&value);
                warn!(
                    index,
                    ?keys,
                    "document is neither wafer, dls, hxcube nor jboa setup; ignored"
                );
                report.skipped.push(SkippedDocument { index, keys });
            }
        }
    }
    Ok(report)
}

fn top_level_keys(value: &Value) -> Vec<String> {
    value
        .as_mapping()
        .map(|m| {
            m.keys()
                .map(|k| k.as_str().map_or_else(|| describe(k), str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

fn sequence<'a>(fields: &mut Fields<'a>, key: &'static str) -> Result<&'a [Value]> {
    match fields.raw(key) {
        None => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items),
        Some(other) => Err(HwdbError::InvalidFormat(format!(
            "{}: `{key}` must be a sequence, got {}",
            fields.context(),
            describe(other)
        ))),
    }
}

fn read_wafer(db: &mut Database, doc: &Value) -> Result<()> {
    let mut f = Fields::new("wafer document", doc)?;
    let wafer = Wafer::from_index(f.required("wafer")?)?;
    let mut f = f.with_context(wafer.to_string());

    let mut entry = WaferEntry::new(f.required("setuptype")?);
    if entry.setup_type.requires_macu() {
        entry.macu = f.required("macu")?;
        entry.macu_version = f.required("macuversion")?;
    } else {
        entry.macu = f.or_default("macu", entry.macu)?;
        entry.macu_version = f.or_default("macuversion", 0)?;
    }
    db.add_wafer_entry(wafer, entry);

    for (i, item) in sequence(&mut f, "fpgas")?.iter().enumerate() {
        let mut e = Fields::new(format!("{wafer}: fpgas[{i}]"), item)?;
        let fpga = FpgaGlobal::new(FpgaOnWafer::from_index(e.required("fpga")?)?, wafer);
        let entry = FpgaEntry {
            ip: e.required("ip")?,
            highspeed: e.or_default("highspeed", true)?,
        };
        e.finish()?;
        db.add_fpga_entry(fpga, entry)?;
    }

    for (i, item) in sequence(&mut f, "reticles")?.iter().enumerate() {
        let mut e = Fields::new(format!("{wafer}: reticles[{i}]"), item)?;
        let reticle = DncGlobal::new(DncOnWafer::from_index(e.required("reticle")?)?, wafer);
        let entry = ReticleEntry {
            to_be_powered: e.or_default("to_be_powered", true)?,
        };
        e.finish()?;
        db.add_reticle_entry(reticle, entry)?;
    }

    for (i, item) in sequence(&mut f, "ananas")?.iter().enumerate() {
        let mut e = Fields::new(format!("{wafer}: ananas[{i}]"), item)?;
        let ananas = AnanasGlobal::new(AnanasOnWafer::from_index(e.required("ananas")?)?, wafer);
        let entry = AnanasEntry {
            ip: e.required("ip")?,
            baseport_data: e.required("baseport_data")?,
            baseport_reset: e.required("baseport_reset")?,
        };
        e.finish()?;
        db.add_ananas_entry(ananas, entry)?;
    }

    for (i, item) in sequence(&mut f, "adcs")?.iter().enumerate() {
        let mut e = Fields::new(format!("{wafer}: adcs[{i}]"), item)?;
        let fpga = FpgaGlobal::new(FpgaOnWafer::from_index(e.required("fpga")?)?, wafer);
        let analog = AnalogOnHicann::from_index(e.required("analog")?)?;
        let mut entry = AdcEntry::new(
            e.required::<String>("adc")?,
            ChannelOnAdc::from_index(e.required("channel")?)?,
            TriggerOnAdc::from_index(e.required("trigger")?)?,
        );
        entry.calibration = e.or_default("calibration", CalibrationMode::default())?;
        entry.remote_ip = e.or_default("remote_ip", entry.remote_ip)?;
        entry.remote_port = e.or_default("remote_port", 0)?;
        e.finish()?;
        db.add_adc_entry((fpga, analog), entry)?;
    }

    match f.raw("hicanns") {
        None => {}
        Some(Value::Sequence(items)) => {
            for (i, item) in items.iter().enumerate() {
                let mut e = Fields::new(format!("{wafer}: hicanns[{i}]"), item)?;
                let hicann =
                    HicannGlobal::new(HicannOnWafer::from_index(e.required("hicann")?)?, wafer);
                let entry = read_hicann(&mut e)?;
                e.finish()?;
                db.add_hicann_entry(hicann, entry)?;
            }
        }
        Some(template @ Value::Mapping(_)) => {
            let mut e = Fields::new(format!("{wafer}: hicanns"), template)?;
            if e.raw("hicann").is_some() {
                return Err(HwdbError::InvalidFormat(format!(
                    "{wafer}: a `hicanns` template applies to every HICANN and takes no `hicann`"
                )));
            }
            let entry = read_hicann(&mut e)?;
            e.finish()?;
            // Expand to every HICANN whose FPGA is present.
            let mut added = 0_usize;
            for hicann in HicannOnWafer::iter_all().map(|h| HicannGlobal::new(h, wafer)) {
                if db.has_fpga_entry(hicann.to_fpga_global()) {
                    db.add_hicann_entry(hicann, entry.clone())?;
                    added += 1;
                }
            }
            debug!(%wafer, added, "expanded hicann template");
        }
        Some(other) => {
            return Err(HwdbError::InvalidFormat(format!(
                "{wafer}: `hicanns` must be a sequence or a mapping, got {}",
                describe(other)
            )))
        }
    }

    f.finish()?;
    debug!(%wafer, "loaded wafer document");
    Ok(())
}

fn read_hicann(e: &mut Fields<'_>) -> Result<HicannEntry> {
    let entry = HicannEntry {
        version: e.required("version")?,
        label: e.or_default("label", String::new())?,
    };
    Ok(entry)
}

fn read_dls(db: &mut Database, doc: &Value) -> Result<()> {
    let mut f = Fields::new("dls document", doc)?;
    let id: String = f.required("dls_setup")?;
    let mut f = f.with_context(format!("dls setup {id:?}"));
    let mut entry = DlsSetupEntry::default();
    // Each field is independently optional.
    if let Some(v) = f.optional("fpga_name")? {
        entry.fpga_name = v;
    }
    if let Some(v) = f.optional("board_name")? {
        entry.board_name = v;
    }
    if let Some(v) = f.optional("board_version")? {
        entry.board_version = v;
    }
    if let Some(v) = f.optional("chip_id")? {
        entry.chip_id = v;
    }
    if let Some(v) = f.optional("chip_version")? {
        entry.chip_version = v;
    }
    entry.ntpwr_ip = f.optional("ntpwr_ip")?;
    entry.ntpwr_slot = f.optional("ntpwr_slot")?;
    f.finish()?;
    debug!(dls_setup = %id, "loaded dls document");
    db.add_dls_entry(id, entry);
    Ok(())
}

fn read_setup_fpgas(f: &mut Fields<'_>) -> Result<BTreeMap<usize, HxCubeFpgaEntry>> {
    let context = f.context().to_owned();
    let mut fpgas = BTreeMap::new();
    for (i, item) in sequence(f, "fpgas")?.iter().enumerate() {
        let mut e = Fields::new(format!("{context}: fpgas[{i}]"), item)?;
        let id = e.required("fpga")?;
        let entry = read_setup_fpga(&mut e)?;
        e.finish()?;
        fpgas.insert(id, entry);
    }
    Ok(fpgas)
}

fn read_setup_fpga(e: &mut Fields<'_>) -> Result<HxCubeFpgaEntry> {
    let mut entry = HxCubeFpgaEntry {
        ip: e.required("ip")?,
        fuse_dna: e.optional("fuse_dna")?,
        extoll_node_id: e.optional("extoll_node_id")?,
        ci_test_node: e.or_default("ci_test_node", false)?,
        ..HxCubeFpgaEntry::default()
    };
    let serial = e.optional("handwritten_chip_serial")?;
    let revision = e.optional("chip_revision")?;
    let eeprom = e.optional("eeprom_chip_serial")?;
    let pcconf = e.optional("synram_timing_pcconf")?;
    let wconf = e.optional("synram_timing_wconf")?;
    match (serial, revision) {
        (Some(handwritten_chip_serial), Some(chip_revision)) => {
            entry.wing = Some(HxCubeWingEntry {
                handwritten_chip_serial,
                chip_revision,
                eeprom_chip_serial: eeprom,
                synram_timing_pcconf: pcconf,
                synram_timing_wconf: wconf,
            });
        }
        (None, None)
            if entry.fuse_dna.is_none()
                && entry.extoll_node_id.is_none()
                && eeprom.is_none()
                && pcconf.is_none()
                && wconf.is_none() => {}
        (None, None) => {
            return Err(HwdbError::InvalidFormat(format!(
                "{}: wing fields given without handwritten_chip_serial and chip_revision",
                e.context()
            )))
        }
        _ => {
            return Err(HwdbError::InvalidFormat(format!(
                "{}: handwritten_chip_serial and chip_revision must be given together",
                e.context()
            )))
        }
    }
    Ok(entry)
}

fn read_hxcube(db: &mut Database, doc: &Value) -> Result<()> {
    let mut f = Fields::new("hxcube document", doc)?;
    let hxcube_id = f.required("hxcube_id")?;
    let mut f = f.with_context(format!("hxcube {hxcube_id}"));
    let entry = HxCubeSetupEntry {
        hxcube_id,
        fpgas: read_setup_fpgas(&mut f)?,
        usb_host: f.or_default("usb_host", String::new())?,
        usb_serial: f.or_default("usb_serial", String::new())?,
        xilinx_hw_server: f.optional("xilinx_hw_server")?,
    };
    f.finish()?;
    debug!(hxcube_id, fpgas = entry.fpgas.len(), "loaded hxcube document");
    db.add_hxcube_setup_entry(hxcube_id, entry);
    Ok(())
}

fn read_jboa(db: &mut Database, doc: &Value) -> Result<()> {
    let mut f = Fields::new("jboa document", doc)?;
    let jboa_id = f.required("jboa_id")?;
    let mut f = f.with_context(format!("jboa {jboa_id}"));
    let fpgas = read_setup_fpgas(&mut f)?;
    let mut aggregators = BTreeMap::new();
    for (i, item) in sequence(&mut f, "aggregators")?.iter().enumerate() {
        let mut e = Fields::new(format!("jboa {jboa_id}: aggregators[{i}]"), item)?;
        let id: usize = e.required("aggregator")?;
        let entry = JboaAggregatorEntry {
            ip: e.required("ip")?,
            ci_test_node: e.or_default("ci_test_node", false)?,
        };
        e.finish()?;
        aggregators.insert(id, entry);
    }
    let entry = JboaSetupEntry {
        jboa_id,
        fpgas,
        aggregators,
        xilinx_hw_server: f.optional("xilinx_hw_server")?,
    };
    f.finish()?;
    debug!(jboa_id, fpgas = entry.fpgas.len(), "loaded jboa document");
    db.add_jboa_setup_entry(jboa_id, entry);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn value(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn classification_follows_priority() {
        assert_eq!(
            DocumentKind::classify(&value("jboa_id: 1\nwafer: 3")),
            Some(DocumentKind::Wafer)
        );
        assert_eq!(
            DocumentKind::classify(&value("hxcube_id: 1\ndls_setup: x")),
            Some(DocumentKind::Dls)
        );
        assert_eq!(
            DocumentKind::classify(&value("jboa_id: 1\nhxcube_id: 2")),
            Some(DocumentKind::HxCube)
        );
        assert_eq!(DocumentKind::classify(&value("jboa_id: 1")), Some(DocumentKind::Jboa));
        assert_eq!(DocumentKind::classify(&value("rack: 1")), None);
        assert_eq!(DocumentKind::classify(&value("- 1")), None);
    }

    #[test]
    fn unknown_documents_are_reported_not_fatal() {
        let mut db = Database::new();
        let report = load_str(&mut db, "---\nrack: 4\n---\nwafer: 1\nsetuptype: vsetup\n").unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(
            report.skipped,
            vec![SkippedDocument {
                index: 0,
                keys: vec!["rack".to_owned()]
            }]
        );
        assert!(db.has_wafer_entry(Wafer::from_index(1).unwrap()));
    }

    #[test]
    fn non_bss_wafers_default_their_macu() {
        let mut db = Database::new();
        load_str(&mut db, "wafer: 2\nsetuptype: CubeSetup\n").unwrap();
        let entry = db.get_wafer_entry(Wafer::from_index(2).unwrap()).unwrap();
        assert!(entry.macu.is_unspecified());
        assert_eq!(entry.macu_version, 0);
    }

    #[test]
    fn bss_wafers_require_macu() {
        let mut db = Database::new();
        let err = load_str(&mut db, "wafer: 2\nsetuptype: bsswafer\n").unwrap_err();
        assert!(err.to_string().contains("macu"), "{err}");
    }

    #[test]
    fn hicanns_must_be_sequence_or_mapping() {
        let mut db = Database::new();
        let text = "wafer: 2\nsetuptype: vsetup\n\
                    fpgas:\n  - fpga: 0\n    ip: 1.2.3.4\nhicanns: 4\n";
        assert!(matches!(load_str(&mut db, text), Err(HwdbError::InvalidFormat(_))));
    }

    #[test]
    fn wing_needs_serial_and_revision() {
        let half = "hxcube_id: 1\nfpgas:\n  - fpga: 0\n    ip: 1.2.3.4\n    chip_revision: 2\n";
        let orphan = "hxcube_id: 1\nfpgas:\n  - fpga: 0\n    ip: 1.2.3.4\n    \
                      eeprom_chip_serial: 5\n";
        for text in [half, orphan] {
            let mut db = Database::new();
            assert!(matches!(load_str(&mut db, text), Err(HwdbError::InvalidFormat(_))));
        }
    }

    #[test]
    fn chip_fields_need_a_wing() {
        let dna = "jboa_id: 7\nfpgas:\n  - fpga: 13\n    ip: 192.168.87.34\n    \
                   fuse_dna: 0x123456789\n";
        let extoll = "hxcube_id: 1\nfpgas:\n  - fpga: 0\n    ip: 1.2.3.4\n    extoll_node_id: 2\n";
        for text in [dna, extoll] {
            let mut db = Database::new();
            assert!(matches!(load_str(&mut db, text), Err(HwdbError::InvalidFormat(_))));
        }
    }

    #[test]
    fn fuse_dna_is_kept_with_wing() {
        let mut db = Database::new();
        load_str(
            &mut db,
            "jboa_id: 7\nfpgas:\n  - fpga: 13\n    ip: 192.168.87.34\n    \
             fuse_dna: 0x123456789\n    handwritten_chip_serial: 14\n    chip_revision: 44\n",
        )
        .unwrap();
        let fpga = &db.get_jboa_setup_entry(7).unwrap().fpgas[&13];
        assert_eq!(fpga.fuse_dna, Some(0x123456789));
        assert_eq!(fpga.wing.as_ref().map(|w| w.handwritten_chip_serial), Some(14));
    }

    #[test]
    fn hicann_needs_its_fpga() {
        let mut db = Database::new();
        let text = "wafer: 2\nsetuptype: vsetup\nhicanns:\n  - hicann: 0\n    version: 4\n";
        assert!(load_str(&mut db, text).unwrap_err().is_not_found());
    }
}
