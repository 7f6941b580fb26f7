// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Unique branch identifiers for chips on cube and jBOA setups.
//!
//! An identifier names one chip as `<kind><setup>fpga<fpga>chip<serial>_<version>`,
//! e.g. `hxcube6fpga0chip12_1`. The serial is always the handwritten one.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::entries::{HxCubeFpgaEntry, HxCubeSetupEntry, JboaSetupEntry};
use crate::error::{HwdbError, Result};

/// Revision suffix of every identifier issued so far.
pub const BRANCH_VERSION: u64 = 1;

/// Which kind of multi-FPGA setup an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupKind {
    /// Cube setup (`hxcube…`).
    HxCube,
    /// jBOA setup (`jboa…`).
    Jboa,
}

impl SetupKind {
    /// Identifier prefix.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::HxCube => "hxcube",
            Self::Jboa => "jboa",
        }
    }
}

impl fmt::Display for SetupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Fields of a decoded branch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchIds {
    /// Cube or jBOA id.
    pub setup_id: usize,
    /// Local FPGA id.
    pub fpga: usize,
    /// Handwritten chip serial.
    pub chip_serial: u64,
    /// Identifier revision.
    pub version: u64,
}

fn encode(
    kind: SetupKind,
    setup_id: usize,
    fpgas: &BTreeMap<usize, HxCubeFpgaEntry>,
    chip_serial: u64,
) -> Result<String> {
    fpgas
        .iter()
        .find_map(|(fpga, entry)| {
            let wing = entry.wing.as_ref()?;
            wing.has_serial(chip_serial).then(|| {
                format!(
                    "{kind}{setup_id}fpga{fpga}chip{}_{BRANCH_VERSION}",
                    wing.handwritten_chip_serial
                )
            })
        })
        .ok_or_else(|| HwdbError::not_found("chip serial", chip_serial))
}

fn decode(kind: SetupKind, identifier: &str) -> Result<BranchIds> {
    let pattern = format!(r"^{}(\d+)fpga(\d+)chip(\d+)_(\d+)$", kind.prefix());
    let re = Regex::new(&pattern).map_err(|e| HwdbError::InvalidFormat(e.to_string()))?;
    let invalid = || {
        HwdbError::InvalidFormat(format!("{identifier:?} is not a {kind} branch identifier"))
    };
    let caps = re.captures(identifier).ok_or_else(invalid)?;
    let field = |i: usize| -> Result<u64> {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(invalid)
    };
    Ok(BranchIds {
        setup_id: usize::try_from(field(1)?).map_err(|_| invalid())?,
        fpga: usize::try_from(field(2)?).map_err(|_| invalid())?,
        chip_serial: field(3)?,
        version: field(4)?,
    })
}

impl HxCubeSetupEntry {
    /// Identifier of the chip whose handwritten or EEPROM serial is `chip_serial`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if no FPGA of this setup carries that chip.
    pub fn unique_branch_identifier(&self, chip_serial: u64) -> Result<String> {
        encode(SetupKind::HxCube, self.hxcube_id, &self.fpgas, chip_serial)
    }

    /// Splits a cube branch identifier into its fields.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidFormat`] if `identifier` does not follow the grammar.
    pub fn ids_from_unique_branch_identifier(identifier: &str) -> Result<BranchIds> {
        decode(SetupKind::HxCube, identifier)
    }
}

impl JboaSetupEntry {
    /// Identifier of the chip whose handwritten or EEPROM serial is `chip_serial`.
    ///
    /// # Errors
    ///
    /// [`HwdbError::NotFound`] if no FPGA of this setup carries that chip.
    pub fn unique_branch_identifier(&self, chip_serial: u64) -> Result<String> {
        encode(SetupKind::Jboa, self.jboa_id, &self.fpgas, chip_serial)
    }

    /// Splits a jBOA branch identifier into its fields.
    ///
    /// # Errors
    ///
    /// [`HwdbError::InvalidFormat`] if `identifier` does not follow the grammar.
    pub fn ids_from_unique_branch_identifier(identifier: &str) -> Result<BranchIds> {
        decode(SetupKind::Jboa, identifier)
    }
}
