// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plain records stored in the database, one per hardware kind.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use hwdb_coord::{
    AnalogOnHicann, AnanasGlobal, ChannelOnAdc, FpgaGlobal, HicannGlobal, ReticleGlobal,
    TriggerOnAdc,
};
use serde::{Serialize, Serializer};

use crate::error::{HwdbError, Result};

/// Key of an ADC connection: the FPGA and which analog output it routes.
pub type GlobalAnalog = (FpgaGlobal, AnalogOnHicann);

/// Kind of system a wafer document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum SetupType {
    /// Single-chip test stand.
    #[serde(rename = "vsetup")]
    VSetup,
    /// Legacy FACETS wafer system.
    #[serde(rename = "facetswafer")]
    FacetsWafer,
    /// Cube carrier setup.
    #[serde(rename = "cubesetup")]
    CubeSetup,
    /// Production wafer system; requires a MACU.
    #[default]
    #[serde(rename = "bsswafer")]
    BssWafer,
    /// jBOA multi-chip setup.
    #[serde(rename = "jboa")]
    Jboa,
}

impl SetupType {
    /// Every setup type, in on-disk enumeration order.
    pub const ALL: [Self; 5] = [
        Self::VSetup,
        Self::FacetsWafer,
        Self::CubeSetup,
        Self::BssWafer,
        Self::Jboa,
    ];

    /// Lower-case on-disk name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::VSetup => "vsetup",
            Self::FacetsWafer => "facetswafer",
            Self::CubeSetup => "cubesetup",
            Self::BssWafer => "bsswafer",
            Self::Jboa => "jboa",
        }
    }

    /// Case-insensitive lookup by on-disk name.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidValue`] for names outside the enumeration.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| HwdbError::InvalidValue {
                field: "setuptype",
                value: name.to_owned(),
            })
    }

    /// Production wafers must name their MACU.
    pub const fn requires_macu(self) -> bool {
        matches!(self, Self::BssWafer)
    }
}

/// One FPGA of a wafer system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FpgaEntry {
    /// Host address.
    pub ip: Ipv4Addr,
    /// Whether a physical highspeed link exists.
    pub highspeed: bool,
}

impl Default for FpgaEntry {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            highspeed: true,
        }
    }
}

/// Power state of a reticle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReticleEntry {
    /// Whether the reticle should be powered.
    pub to_be_powered: bool,
}

impl Default for ReticleEntry {
    fn default() -> Self {
        Self {
            to_be_powered: true,
        }
    }
}

/// An Ananas readout board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnanasEntry {
    /// Host address.
    pub ip: Ipv4Addr,
    /// First UDP port of the data stream.
    pub baseport_data: u16,
    /// First UDP port of the reset channel.
    pub baseport_reset: u16,
}

impl Default for AnanasEntry {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            baseport_data: 0,
            baseport_reset: 0,
        }
    }
}

/// One HICANN chip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HicannEntry {
    /// Chip revision.
    pub version: u64,
    /// Free-text label; empty when absent.
    pub label: String,
}

/// How an ADC is calibrated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Load stored calibration data.
    LoadCalibration,
    /// Simulated ADC of the executable system specification.
    EssCalibration,
    /// Built-in default calibration.
    #[default]
    DefaultCalibration,
}

impl CalibrationMode {
    /// Every mode.
    pub const ALL: [Self; 3] = [
        Self::LoadCalibration,
        Self::EssCalibration,
        Self::DefaultCalibration,
    ];

    /// On-disk name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadCalibration => "load_calibration",
            Self::EssCalibration => "ess_calibration",
            Self::DefaultCalibration => "default_calibration",
        }
    }

    /// Lookup by on-disk name.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidValue`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| HwdbError::InvalidValue {
                field: "calibration",
                value: name.to_owned(),
            })
    }
}

/// Connection of a HICANN analog output to an ADC channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdcEntry {
    /// Calibration mode.
    pub calibration: CalibrationMode,
    /// Backend coordinate (board serial) of the ADC.
    pub coord: String,
    /// Input channel.
    pub channel: ChannelOnAdc,
    /// Trigger input.
    pub trigger: TriggerOnAdc,
    /// Address of a remote ADC service; unspecified for local wiring.
    pub remote_ip: Ipv4Addr,
    /// Port of the remote ADC service; 0 for local wiring.
    pub remote_port: u16,
}

impl AdcEntry {
    /// Local connection with default calibration.
    pub fn new(coord: impl Into<String>, channel: ChannelOnAdc, trigger: TriggerOnAdc) -> Self {
        Self {
            calibration: CalibrationMode::default(),
            coord: coord.into(),
            channel,
            trigger,
            remote_ip: Ipv4Addr::UNSPECIFIED,
            remote_port: 0,
        }
    }

    /// True when the ADC is reached through a remote service.
    pub fn is_remote(&self) -> bool {
        !self.remote_ip.is_unspecified()
    }
}

/// One wafer (or wafer-numbered setup) together with its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaferEntry {
    /// System kind.
    pub setup_type: SetupType,
    /// FPGAs by coordinate.
    pub fpgas: BTreeMap<FpgaGlobal, FpgaEntry>,
    /// Reticles with an explicit power state.
    pub reticles: BTreeMap<ReticleGlobal, ReticleEntry>,
    /// Ananas boards.
    pub ananas: BTreeMap<AnanasGlobal, AnanasEntry>,
    /// HICANNs; each one's FPGA is present in [`WaferEntry::fpgas`].
    pub hicanns: BTreeMap<HicannGlobal, HicannEntry>,
    /// ADC connections.
    #[serde(serialize_with = "adcs_as_list")]
    pub adcs: BTreeMap<GlobalAnalog, AdcEntry>,
    /// Main system control unit.
    pub macu: Ipv4Addr,
    /// Hardware version of the MACU.
    pub macu_version: u64,
}

impl WaferEntry {
    /// Empty wafer of the given kind.
    pub const fn new(setup_type: SetupType) -> Self {
        Self {
            setup_type,
            fpgas: BTreeMap::new(),
            reticles: BTreeMap::new(),
            ananas: BTreeMap::new(),
            hicanns: BTreeMap::new(),
            adcs: BTreeMap::new(),
            macu: Ipv4Addr::UNSPECIFIED,
            macu_version: 0,
        }
    }

    /// True if the MACU fields differ from their defaults.
    pub fn has_macu(&self) -> bool {
        !self.macu.is_unspecified() || self.macu_version != 0
    }
}

impl Default for WaferEntry {
    fn default() -> Self {
        Self::new(SetupType::default())
    }
}

// Tuple keys have no JSON spelling, so ADCs are listed with their key inline.
fn adcs_as_list<S>(
    adcs: &BTreeMap<GlobalAnalog, AdcEntry>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Row<'a> {
        fpga: FpgaGlobal,
        analog: AnalogOnHicann,
        #[serde(flatten)]
        entry: &'a AdcEntry,
    }

    serializer.collect_seq(adcs.iter().map(|(&(fpga, analog), entry)| Row {
        fpga,
        analog,
        entry,
    }))
}

/// A single-chip DLS lab setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DlsSetupEntry {
    /// Name of the FPGA board.
    pub fpga_name: String,
    /// Name of the carrier board.
    pub board_name: String,
    /// Carrier board version.
    pub board_version: u64,
    /// Chip identifier.
    pub chip_id: u64,
    /// Chip version.
    pub chip_version: u64,
    /// Address of the network power switch, if any.
    pub ntpwr_ip: Option<String>,
    /// Outlet on the network power switch, if any.
    pub ntpwr_slot: Option<u64>,
}

/// 2×2 synram timing configuration of a chip.
pub type SynramTiming = [[u16; 2]; 2];

/// Chip carrier ("wing") mounted on a cube or jBOA FPGA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HxCubeWingEntry {
    /// Serial written on the chip by hand.
    pub handwritten_chip_serial: u64,
    /// Chip revision.
    pub chip_revision: u64,
    /// Serial stored in the carrier EEPROM.
    pub eeprom_chip_serial: Option<u64>,
    /// Synram timing for the `pcconf` register.
    pub synram_timing_pcconf: Option<SynramTiming>,
    /// Synram timing for the `wconf` register.
    pub synram_timing_wconf: Option<SynramTiming>,
}

impl HxCubeWingEntry {
    /// Whether `serial` names this chip by either of its serials.
    pub fn has_serial(&self, serial: u64) -> bool {
        self.handwritten_chip_serial == serial || self.eeprom_chip_serial == Some(serial)
    }
}

/// One FPGA of a cube or jBOA setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HxCubeFpgaEntry {
    /// Host address.
    pub ip: Ipv4Addr,
    /// Mounted chip carrier, if any.
    pub wing: Option<HxCubeWingEntry>,
    /// eFUSE device DNA.
    pub fuse_dna: Option<u64>,
    /// Node id on the Extoll network.
    pub extoll_node_id: Option<u16>,
    /// Reserved for continuous integration.
    pub ci_test_node: bool,
}

impl Default for HxCubeFpgaEntry {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            wing: None,
            fuse_dna: None,
            extoll_node_id: None,
            ci_test_node: false,
        }
    }
}

impl HxCubeFpgaEntry {
    /// The 57-bit DNA as read through the FPGA's DNA port.
    ///
    /// The port shifts out the fuse bits from the top, so bit `i` of the
    /// result is bit `63 - i` of [`HxCubeFpgaEntry::fuse_dna`].
    pub fn dna_port(&self) -> Option<u64> {
        self.fuse_dna.map(dna_port)
    }
}

/// Bit-reverses the upper 57 bits of a fuse DNA.
pub const fn dna_port(fuse_dna: u64) -> u64 {
    (fuse_dna.reverse_bits()) & ((1 << 57) - 1)
}

/// A cube setup: FPGAs plus USB and JTAG access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HxCubeSetupEntry {
    /// Cube id; matches the database key.
    pub hxcube_id: usize,
    /// FPGAs by local id.
    pub fpgas: BTreeMap<usize, HxCubeFpgaEntry>,
    /// Host the cube's USB is attached to.
    pub usb_host: String,
    /// USB serial of the cube's control board.
    pub usb_serial: String,
    /// Xilinx hardware server, `host:port`.
    pub xilinx_hw_server: Option<String>,
}

/// An aggregator of a jBOA setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JboaAggregatorEntry {
    /// Host address.
    pub ip: Ipv4Addr,
    /// Reserved for continuous integration.
    pub ci_test_node: bool,
}

impl Default for JboaAggregatorEntry {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            ci_test_node: false,
        }
    }
}

/// A jBOA setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JboaSetupEntry {
    /// jBOA id; matches the database key.
    pub jboa_id: usize,
    /// FPGAs by local id.
    pub fpgas: BTreeMap<usize, HxCubeFpgaEntry>,
    /// Aggregators by local id.
    pub aggregators: BTreeMap<usize, JboaAggregatorEntry>,
    /// Xilinx hardware server, `host:port`.
    pub xilinx_hw_server: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dna_port_reverses_the_top_bits() {
        assert_eq!(dna_port(0x3A0E92C402882A33), 0x5411402349705C);
        assert_eq!(dna_port(1 << 63), 1);
        // The low seven fuse bits never reach the port.
        assert_eq!(dna_port(0x7F), 0);
        let fpga = HxCubeFpgaEntry::default();
        assert_eq!(fpga.dna_port(), None);
    }

    #[test]
    fn setup_type_names_are_case_insensitive() {
        assert_eq!(SetupType::from_name("BSSWafer").unwrap(), SetupType::BssWafer);
        assert_eq!(SetupType::from_name("jboa").unwrap(), SetupType::Jboa);
        let err = SetupType::from_name("hxwafer").unwrap_err();
        assert!(matches!(err, HwdbError::InvalidValue { field: "setuptype", .. }));
        for t in SetupType::ALL {
            assert_eq!(SetupType::from_name(t.name()).unwrap(), t);
        }
    }

    #[test]
    fn defaults_match_on_disk_omission_rules() {
        assert!(FpgaEntry::default().highspeed);
        assert!(ReticleEntry::default().to_be_powered);
        assert!(!HxCubeFpgaEntry::default().ci_test_node);
        assert_eq!(CalibrationMode::default(), CalibrationMode::DefaultCalibration);
        assert!(!WaferEntry::new(SetupType::VSetup).has_macu());
    }

    #[test]
    fn wing_matches_either_serial() {
        let wing = HxCubeWingEntry {
            handwritten_chip_serial: 12,
            eeprom_chip_serial: Some(0x1234ABCD),
            ..HxCubeWingEntry::default()
        };
        assert!(wing.has_serial(12));
        assert!(wing.has_serial(0x1234ABCD));
        assert!(!wing.has_serial(13));
    }
}
