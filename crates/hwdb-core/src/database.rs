// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The in-memory store.
//!
//! Four independent maps: wafers (each owning its component maps), DLS setups
//! by name, cube setups and jBOA setups by id. Every component accessor first
//! resolves the enclosing wafer, so a missing wafer reads as "absent" for
//! `has_*` and as [`HwdbError::NotFound`] everywhere else.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use hwdb_coord::{
    AnalogOnHicann, AnanasGlobal, Coordinate, FpgaGlobal, HicannGlobal, ReticleGlobal, Wafer,
};
use tracing::{debug, info};

use crate::entries::{
    AdcEntry, AnanasEntry, DlsSetupEntry, FpgaEntry, GlobalAnalog, HicannEntry, HxCubeSetupEntry,
    JboaSetupEntry, ReticleEntry, WaferEntry,
};
use crate::error::{HwdbError, Result};
use crate::yaml::{self, LoadReport};

/// Accessors shared by the wafer components keyed by a wafer-scoped global.
macro_rules! wafer_component {
    (
        $field:ident: $key:ty => $entry:ty, $kind:literal,
        $add:ident, $has:ident, $get:ident, $entries:ident
    ) => {
        #[doc = concat!("Inserts or replaces the ", $kind, " entry at `key`.")]
        ///
        /// # Errors
        ///
        /// [`HwdbError::NotFound`] if the wafer of `key` is absent.
        pub fn $add(&mut self, key: $key, entry: $entry) -> Result<()> {
            self.wafer_mut(key.wafer())?.$field.insert(key, entry);
            Ok(())
        }

        #[doc = concat!("True if a ", $kind, " entry exists at `key`.")]
        pub fn $has(&self, key: $key) -> bool {
            self.wafers
                .get(&key.wafer())
                .is_some_and(|w| w.$field.contains_key(&key))
        }

        #[doc = concat!("The ", $kind, " entry at `key`.")]
        ///
        /// # Errors
        ///
        /// [`HwdbError::NotFound`] if the entry or its wafer is absent.
        pub fn $get(&self, key: $key) -> Result<&$entry> {
            self.wafer(key.wafer())?
                .$field
                .get(&key)
                .ok_or_else(|| HwdbError::not_found($kind, key))
        }

        #[doc = concat!("Copy of every ", $kind, " entry of `wafer`.")]
        ///
        /// # Errors
        ///
        /// [`HwdbError::NotFound`] if `wafer` is absent.
        pub fn $entries(&self, wafer: Wafer) -> Result<BTreeMap<$key, $entry>> {
            Ok(self.wafer(wafer)?.$field.clone())
        }
    };
}

/// Hardware inventory of the whole cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub(crate) wafers: BTreeMap<Wafer, WaferEntry>,
    pub(crate) dls_setups: BTreeMap<String, DlsSetupEntry>,
    pub(crate) hxcubes: BTreeMap<usize, HxCubeSetupEntry>,
    pub(crate) jboas: BTreeMap<usize, JboaSetupEntry>,
}

impl Database {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Database file used when no path is given; see [`crate::default_path`].
    pub fn default_path() -> PathBuf {
        crate::config::default_path()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.wafers.clear();
        self.dls_setups.clear();
        self.hxcubes.clear();
        self.jboas.clear();
    }

    /// True if no wafer, DLS, cube or jBOA setup is stored.
    pub fn is_empty(&self) -> bool {
        self.wafers.is_empty()
            && self.dls_setups.is_empty()
            && self.hxcubes.is_empty()
            && self.jboas.is_empty()
    }

    /// Fills the empty database from the file at `path`.
    ///
    /// On error the database may be partially filled; [`Database::clear`] it
    /// before trying again.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidState`] if the database is not empty, [`HwdbError::Io`]
    /// if the file cannot be read, and any decoding error of [`Database::load_str`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        self.ensure_empty()?;
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| HwdbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.load_str(&text)?;
        info!(
            path = %path.display(),
            documents = report.documents,
            skipped = report.skipped.len(),
            "loaded hardware database"
        );
        Ok(report)
    }

    /// Fills the empty database from YAML text.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidState`] if the database is not empty,
    /// [`HwdbError::Yaml`] for malformed text, [`HwdbError::InvalidFormat`] or
    /// [`HwdbError::InvalidValue`] for documents of the wrong shape, and
    /// [`HwdbError::Coordinate`] for out-of-range ids.
    pub fn load_str(&mut self, text: &str) -> Result<LoadReport> {
        self.ensure_empty()?;
        yaml::load_str(self, text)
    }

    fn ensure_empty(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(HwdbError::InvalidState("load requires an empty database"))
        }
    }

    /// Writes every entry as a YAML document stream.
    ///
    /// # Errors
    ///
    /// [`HwdbError::Write`] if `out` fails.
    pub fn dump(&self, out: &mut impl io::Write) -> Result<()> {
        yaml::dump(self, out)
    }

    /// [`Database::dump`] into a string.
    pub fn dump_to_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.dump(&mut buf)?;
        String::from_utf8(buf).map_err(|e| HwdbError::InvalidFormat(e.to_string()))
    }

    /// [`Database::dump`] into the file at `path`, replacing it.
    ///
    /// # Errors
    ///
    /// [`HwdbError::Io`] if the file cannot be created or written.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| HwdbError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut out = BufWriter::new(File::create(path).map_err(io_error)?);
        match self.dump(&mut out) {
            Err(HwdbError::Write(source)) => Err(io_error(source)),
            other => other,
        }?;
        debug!(path = %path.display(), "stored hardware database");
        Ok(())
    }

    // ---- wafers ----------------------------------------------------------

    fn wafer(&self, wafer: Wafer) -> Result<&WaferEntry> {
        self.wafers
            .get(&wafer)
            .ok_or_else(|| HwdbError::not_found("wafer", wafer))
    }

    fn wafer_mut(&mut self, wafer: Wafer) -> Result<&mut WaferEntry> {
        self.wafers
            .get_mut(&wafer)
            .ok_or_else(|| HwdbError::not_found("wafer", wafer))
    }

    /// Inserts or replaces a wafer together with its components.
    pub fn add_wafer_entry(&mut self, wafer: Wafer, entry: WaferEntry) {
        self.wafers.insert(wafer, entry);
    }

    /// Removes a wafer and all of its components.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if `wafer` is absent.
    pub fn remove_wafer_entry(&mut self, wafer: Wafer) -> Result<WaferEntry> {
        self.wafers
            .remove(&wafer)
            .ok_or_else(|| HwdbError::not_found("wafer", wafer))
    }

    /// True if `wafer` is stored.
    pub fn has_wafer_entry(&self, wafer: Wafer) -> bool {
        self.wafers.contains_key(&wafer)
    }

    /// The entry of `wafer`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if `wafer` is absent.
    pub fn get_wafer_entry(&self, wafer: Wafer) -> Result<&WaferEntry> {
        self.wafer(wafer)
    }

    /// Mutable entry of `wafer`.
    ///
    /// Editing the component maps directly bypasses the HICANN parent check.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if `wafer` is absent.
    pub fn get_wafer_entry_mut(&mut self, wafer: Wafer) -> Result<&mut WaferEntry> {
        self.wafer_mut(wafer)
    }

    /// Every stored wafer, ascending.
    pub fn get_wafer_coordinates(&self) -> Vec<Wafer> {
        self.wafers.keys().copied().collect()
    }

    // ---- wafer components ------------------------------------------------

    wafer_component!(
        fpgas: FpgaGlobal => FpgaEntry, "fpga",
        add_fpga_entry, has_fpga_entry, get_fpga_entry, get_fpga_entries
    );

    wafer_component!(
        reticles: ReticleGlobal => ReticleEntry, "reticle",
        add_reticle_entry, has_reticle_entry, get_reticle_entry, get_reticle_entries
    );

    wafer_component!(
        ananas: AnanasGlobal => AnanasEntry, "ananas",
        add_ananas_entry, has_ananas_entry, get_ananas_entry, get_ananas_entries
    );

    /// Removes an FPGA and every HICANN it serves.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the FPGA or its wafer is absent.
    pub fn remove_fpga_entry(&mut self, fpga: FpgaGlobal) -> Result<FpgaEntry> {
        let wafer = self.wafer_mut(fpga.wafer())?;
        let entry = wafer
            .fpgas
            .remove(&fpga)
            .ok_or_else(|| HwdbError::not_found("fpga", fpga))?;
        for hicann in fpga.hicanns() {
            wafer.hicanns.remove(&hicann);
        }
        Ok(entry)
    }

    /// Removes a reticle and every HICANN on it.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the reticle or its wafer is absent.
    pub fn remove_reticle_entry(&mut self, reticle: ReticleGlobal) -> Result<ReticleEntry> {
        let wafer = self.wafer_mut(reticle.wafer())?;
        let entry = wafer
            .reticles
            .remove(&reticle)
            .ok_or_else(|| HwdbError::not_found("reticle", reticle))?;
        for hicann in reticle.hicanns() {
            wafer.hicanns.remove(&hicann);
        }
        Ok(entry)
    }

    /// Removes an Ananas board.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the board or its wafer is absent.
    pub fn remove_ananas_entry(&mut self, ananas: AnanasGlobal) -> Result<AnanasEntry> {
        self.wafer_mut(ananas.wafer())?
            .ananas
            .remove(&ananas)
            .ok_or_else(|| HwdbError::not_found("ananas", ananas))
    }

    // ---- hicanns ---------------------------------------------------------

    /// Inserts or replaces a HICANN; its FPGA must already be stored.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the wafer or the serving FPGA is absent.
    pub fn add_hicann_entry(&mut self, hicann: HicannGlobal, entry: HicannEntry) -> Result<()> {
        let fpga = hicann.to_fpga_global();
        let wafer = self.wafer_mut(hicann.wafer())?;
        if !wafer.fpgas.contains_key(&fpga) {
            return Err(HwdbError::not_found("fpga", fpga));
        }
        wafer.hicanns.insert(hicann, entry);
        Ok(())
    }

    /// Removes a HICANN.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the HICANN or its wafer is absent.
    pub fn remove_hicann_entry(&mut self, hicann: HicannGlobal) -> Result<HicannEntry> {
        self.wafer_mut(hicann.wafer())?
            .hicanns
            .remove(&hicann)
            .ok_or_else(|| HwdbError::not_found("hicann", hicann))
    }

    /// True if a HICANN entry exists at `hicann`.
    pub fn has_hicann_entry(&self, hicann: HicannGlobal) -> bool {
        self.wafers
            .get(&hicann.wafer())
            .is_some_and(|w| w.hicanns.contains_key(&hicann))
    }

    /// The HICANN entry at `hicann`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the HICANN or its wafer is absent.
    pub fn get_hicann_entry(&self, hicann: HicannGlobal) -> Result<&HicannEntry> {
        self.wafer(hicann.wafer())?
            .hicanns
            .get(&hicann)
            .ok_or_else(|| HwdbError::not_found("hicann", hicann))
    }

    /// Copy of every HICANN entry of `wafer`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if `wafer` is absent.
    pub fn get_hicann_entries(&self, wafer: Wafer) -> Result<BTreeMap<HicannGlobal, HicannEntry>> {
        Ok(self.wafer(wafer)?.hicanns.clone())
    }

    /// HICANN entries served by `fpga`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the wafer of `fpga` is absent.
    pub fn get_hicann_entries_of_fpga(
        &self,
        fpga: FpgaGlobal,
    ) -> Result<BTreeMap<HicannGlobal, HicannEntry>> {
        let wafer = self.wafer(fpga.wafer())?;
        Ok(fpga
            .hicanns()
            .filter_map(|h| wafer.hicanns.get(&h).map(|e| (h, e.clone())))
            .collect())
    }

    // ---- adcs ------------------------------------------------------------

    /// Inserts or replaces the ADC connected to `key`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the wafer is absent.
    pub fn add_adc_entry(&mut self, key: GlobalAnalog, entry: AdcEntry) -> Result<()> {
        self.wafer_mut(key.0.wafer())?.adcs.insert(key, entry);
        Ok(())
    }

    /// Removes the ADC connection at `key`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the connection or its wafer is absent.
    pub fn remove_adc_entry(&mut self, key: GlobalAnalog) -> Result<AdcEntry> {
        self.wafer_mut(key.0.wafer())?
            .adcs
            .remove(&key)
            .ok_or_else(|| adc_not_found(key))
    }

    /// True if an ADC is connected at `key`.
    pub fn has_adc_entry(&self, key: GlobalAnalog) -> bool {
        self.wafers
            .get(&key.0.wafer())
            .is_some_and(|w| w.adcs.contains_key(&key))
    }

    /// The ADC connected at `key`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the connection or its wafer is absent.
    pub fn get_adc_entry(&self, key: GlobalAnalog) -> Result<&AdcEntry> {
        self.wafer(key.0.wafer())?
            .adcs
            .get(&key)
            .ok_or_else(|| adc_not_found(key))
    }

    /// Copy of every ADC connection of `wafer`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if `wafer` is absent.
    pub fn get_adc_entries(&self, wafer: Wafer) -> Result<BTreeMap<GlobalAnalog, AdcEntry>> {
        Ok(self.wafer(wafer)?.adcs.clone())
    }

    /// ADC connections of both analog outputs behind `fpga`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the wafer of `fpga` is absent.
    pub fn get_adc_entries_of_fpga(
        &self,
        fpga: FpgaGlobal,
    ) -> Result<BTreeMap<GlobalAnalog, AdcEntry>> {
        let wafer = self.wafer(fpga.wafer())?;
        Ok(AnalogOnHicann::iter_all()
            .filter_map(|analog| {
                let key = (fpga, analog);
                wafer.adcs.get(&key).map(|e| (key, e.clone()))
            })
            .collect())
    }

    // ---- dls setups ------------------------------------------------------

    /// Inserts or replaces the DLS setup named `id`.
    pub fn add_dls_entry(&mut self, id: impl Into<String>, entry: DlsSetupEntry) {
        self.dls_setups.insert(id.into(), entry);
    }

    /// Removes the DLS setup named `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn remove_dls_entry(&mut self, id: &str) -> Result<DlsSetupEntry> {
        self.dls_setups
            .remove(id)
            .ok_or_else(|| HwdbError::not_found("dls setup", id))
    }

    /// True if a DLS setup named `id` is stored.
    pub fn has_dls_entry(&self, id: &str) -> bool {
        self.dls_setups.contains_key(id)
    }

    /// The DLS setup named `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_dls_entry(&self, id: &str) -> Result<&DlsSetupEntry> {
        self.dls_setups
            .get(id)
            .ok_or_else(|| HwdbError::not_found("dls setup", id))
    }

    /// Mutable DLS setup named `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_dls_entry_mut(&mut self, id: &str) -> Result<&mut DlsSetupEntry> {
        self.dls_setups
            .get_mut(id)
            .ok_or_else(|| HwdbError::not_found("dls setup", id))
    }

    /// Names of all DLS setups, ascending.
    pub fn get_dls_setup_ids(&self) -> Vec<String> {
        self.dls_setups.keys().cloned().collect()
    }

    // ---- cube setups -----------------------------------------------------

    /// Inserts or replaces cube `id`; the entry's own id is set to match.
    pub fn add_hxcube_setup_entry(&mut self, id: usize, mut entry: HxCubeSetupEntry) {
        entry.hxcube_id = id;
        self.hxcubes.insert(id, entry);
    }

    /// Removes cube `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn remove_hxcube_setup_entry(&mut self, id: usize) -> Result<HxCubeSetupEntry> {
        self.hxcubes
            .remove(&id)
            .ok_or_else(|| HwdbError::not_found("hxcube", id))
    }

    /// True if cube `id` is stored.
    pub fn has_hxcube_setup_entry(&self, id: usize) -> bool {
        self.hxcubes.contains_key(&id)
    }

    /// Cube `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_hxcube_setup_entry(&self, id: usize) -> Result<&HxCubeSetupEntry> {
        self.hxcubes
            .get(&id)
            .ok_or_else(|| HwdbError::not_found("hxcube", id))
    }

    /// Mutable cube `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_hxcube_setup_entry_mut(&mut self, id: usize) -> Result<&mut HxCubeSetupEntry> {
        self.hxcubes
            .get_mut(&id)
            .ok_or_else(|| HwdbError::not_found("hxcube", id))
    }

    /// Ids of all cubes, ascending.
    pub fn get_hxcube_ids(&self) -> Vec<usize> {
        self.hxcubes.keys().copied().collect()
    }

    /// Branch identifier of the chip with `chip_serial` on cube `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the cube or the chip is absent.
    pub fn hxcube_branch_identifier(&self, id: usize, chip_serial: u64) -> Result<String> {
        self.get_hxcube_setup_entry(id)?
            .unique_branch_identifier(chip_serial)
    }

    // ---- jboa setups -----------------------------------------------------

    /// Inserts or replaces jBOA `id`; the entry's own id is set to match.
    pub fn add_jboa_setup_entry(&mut self, id: usize, mut entry: JboaSetupEntry) {
        entry.jboa_id = id;
        self.jboas.insert(id, entry);
    }

    /// Removes jBOA `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn remove_jboa_setup_entry(&mut self, id: usize) -> Result<JboaSetupEntry> {
        self.jboas
            .remove(&id)
            .ok_or_else(|| HwdbError::not_found("jboa", id))
    }

    /// True if jBOA `id` is stored.
    pub fn has_jboa_setup_entry(&self, id: usize) -> bool {
        self.jboas.contains_key(&id)
    }

    /// jBOA `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_jboa_setup_entry(&self, id: usize) -> Result<&JboaSetupEntry> {
        self.jboas
            .get(&id)
            .ok_or_else(|| HwdbError::not_found("jboa", id))
    }

    /// Mutable jBOA `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if it is absent.
    pub fn get_jboa_setup_entry_mut(&mut self, id: usize) -> Result<&mut JboaSetupEntry> {
        self.jboas
            .get_mut(&id)
            .ok_or_else(|| HwdbError::not_found("jboa", id))
    }

    /// Ids of all jBOAs, ascending.
    pub fn get_jboa_ids(&self) -> Vec<usize> {
        self.jboas.keys().copied().collect()
    }

    /// Branch identifier of the chip with `chip_serial` on jBOA `id`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if the jBOA or the chip is absent.
    pub fn jboa_branch_identifier(&self, id: usize, chip_serial: u64) -> Result<String> {
        self.get_jboa_setup_entry(id)?
            .unique_branch_identifier(chip_serial)
    }
}

fn adc_not_found((fpga, analog): GlobalAnalog) -> HwdbError {
    HwdbError::not_found("adc", format!("{fpga} analog {}", analog.index()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hwdb_coord::{FpgaOnWafer, HicannOnWafer, ReticleOnWafer};

    use crate::entries::SetupType;

    fn wafer(id: usize) -> Wafer {
        Wafer::from_index(id).unwrap()
    }

    fn fpga(w: usize, f: usize) -> FpgaGlobal {
        FpgaGlobal::new(FpgaOnWafer::from_index(f).unwrap(), wafer(w))
    }

    fn hicann(w: usize, h: usize) -> HicannGlobal {
        HicannGlobal::new(HicannOnWafer::from_index(h).unwrap(), wafer(w))
    }

    fn populated() -> Database {
        let mut db = Database::new();
        db.add_wafer_entry(wafer(5), WaferEntry::new(SetupType::VSetup));
        db.add_fpga_entry(fpga(5, 3), FpgaEntry::default()).unwrap();
        db.add_hicann_entry(hicann(5, 88), HicannEntry::default())
            .unwrap();
        db.add_hicann_entry(hicann(5, 116), HicannEntry::default())
            .unwrap();
        db
    }

    #[test]
    fn missing_wafer_reads_as_absent() {
        let db = Database::new();
        assert!(!db.has_fpga_entry(fpga(1, 0)));
        assert!(!db.has_hicann_entry(hicann(1, 0)));
        assert!(!db.has_adc_entry((fpga(1, 0), AnalogOnHicann::from_index(0).unwrap())));
        assert!(db.get_fpga_entry(fpga(1, 0)).unwrap_err().is_not_found());
        assert!(db.get_hicann_entries(wafer(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn hicann_requires_its_fpga() {
        let mut db = populated();
        let err = db
            .add_hicann_entry(hicann(5, 144), HicannEntry::default())
            .unwrap_err();
        assert!(matches!(err, HwdbError::NotFound { kind: "fpga", .. }), "{err}");
    }

    #[test]
    fn removing_fpga_cascades_to_its_hicanns() {
        let mut db = populated();
        db.remove_fpga_entry(fpga(5, 3)).unwrap();
        assert!(!db.has_hicann_entry(hicann(5, 88)));
        assert!(db.get_hicann_entries(wafer(5)).unwrap().is_empty());
        assert!(db.remove_fpga_entry(fpga(5, 3)).unwrap_err().is_not_found());
    }

    #[test]
    fn removing_reticle_cascades_to_its_hicanns() {
        let mut db = populated();
        let reticle = ReticleGlobal::new(ReticleOnWafer::from_index(14).unwrap(), wafer(5));
        db.add_reticle_entry(reticle, ReticleEntry::default())
            .unwrap();
        db.remove_reticle_entry(reticle).unwrap();
        assert!(!db.has_hicann_entry(hicann(5, 88)));
        assert!(db.has_fpga_entry(fpga(5, 3)));
    }

    #[test]
    fn replace_not_merge() {
        let mut db = populated();
        let entry = FpgaEntry {
            highspeed: false,
            ..FpgaEntry::default()
        };
        db.add_fpga_entry(fpga(5, 3), entry.clone()).unwrap();
        assert_eq!(db.get_fpga_entry(fpga(5, 3)).unwrap(), &entry);
        assert_eq!(db.get_hicann_entries_of_fpga(fpga(5, 3)).unwrap().len(), 2);
    }

    #[test]
    fn load_requires_empty_store() {
        let mut db = populated();
        assert!(matches!(
            db.load_str("wafer: 1\nsetuptype: vsetup\n"),
            Err(HwdbError::InvalidState(_))
        ));
        db.clear();
        assert!(db.is_empty());
        db.load_str("wafer: 1\nsetuptype: vsetup\n").unwrap();
        assert_eq!(db.get_wafer_coordinates(), vec![wafer(1)]);
    }

    #[test]
    fn setup_ids_follow_their_keys() {
        let mut db = Database::new();
        db.add_hxcube_setup_entry(9, HxCubeSetupEntry::default());
        db.add_jboa_setup_entry(4, JboaSetupEntry::default());
        assert_eq!(db.get_hxcube_setup_entry(9).unwrap().hxcube_id, 9);
        assert_eq!(db.get_jboa_setup_entry(4).unwrap().jboa_id, 4);
        assert_eq!(db.get_hxcube_ids(), vec![9]);
        assert_eq!(db.get_jboa_ids(), vec![4]);
        assert!(db.remove_jboa_setup_entry(5).unwrap_err().is_not_found());
    }

    #[test]
    fn adc_errors_name_the_connection() {
        let db = populated();
        let key = (fpga(5, 3), AnalogOnHicann::from_index(1).unwrap());
        assert_eq!(
            db.get_adc_entry(key).unwrap_err().to_string(),
            "adc W5F3 analog 1 not found"
        );
    }
}
