// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed FPGA wiring: which reticle and which trigger group every FPGA serves.

use crate::{
    AnanasOnWafer, AnanasSliceOnAnanas, Coordinate, DncOnWafer, FpgaOnWafer, HicannOnWafer,
    TriggerOnWafer,
};

/// Reticle index driven by each FPGA.
const DNC_OF_FPGA: [usize; FpgaOnWafer::SIZE] = [
    21, 22, 13, 14, 23, 24, 15, 16, 5, 6, 7, 4, 0, 1, 2, 3, 8, 9, 10, 11, 12, 17, 18, 19, 20, 25,
    26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47,
];

/// Inverse of [`DNC_OF_FPGA`].
const FPGA_OF_DNC: [usize; DncOnWafer::SIZE] = invert(&DNC_OF_FPGA);

/// Trigger group of each FPGA.
const TRIGGER_OF_FPGA: [usize; FpgaOnWafer::SIZE] = [
    8, 8, 9, 9, 7, 7, 10, 10, 11, 11, 6, 6, 5, 5, 4, 4, 3, 3, 2, 2, 1, 1, 0, 0, 0, 0, 1, 1, 2, 2,
    3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11,
];

const fn invert(table: &[usize; 48]) -> [usize; 48] {
    let mut out = [0; 48];
    let mut i = 0;
    while i < table.len() {
        out[table[i]] = i;
        i += 1;
    }
    out
}

impl FpgaOnWafer {
    /// Reticle wired to this FPGA.
    pub const fn to_dnc(self) -> DncOnWafer {
        DncOnWafer(DNC_OF_FPGA[self.0])
    }

    /// Trigger group this FPGA belongs to.
    pub const fn to_trigger(self) -> TriggerOnWafer {
        TriggerOnWafer(TRIGGER_OF_FPGA[self.0])
    }

    /// HICANNs reachable through this FPGA.
    pub fn hicanns(self) -> impl Iterator<Item = HicannOnWafer> {
        self.to_dnc().hicanns()
    }
}

impl DncOnWafer {
    /// FPGA wired to this reticle.
    pub const fn to_fpga(self) -> FpgaOnWafer {
        FpgaOnWafer(FPGA_OF_DNC[self.value()])
    }
}

impl TriggerOnWafer {
    /// Ananas board reading out this trigger group.
    pub const fn to_ananas(self) -> AnanasOnWafer {
        AnanasOnWafer(self.0 / AnanasSliceOnAnanas::SIZE)
    }

    /// Slice of the Ananas board serving this trigger group.
    pub const fn to_ananas_slice(self) -> AnanasSliceOnAnanas {
        AnanasSliceOnAnanas(self.0 % AnanasSliceOnAnanas::SIZE)
    }

    /// The four FPGAs of this trigger group, in index order.
    pub fn fpgas(self) -> impl Iterator<Item = FpgaOnWafer> {
        FpgaOnWafer::iter_all().filter(move |f| f.to_trigger() == self)
    }
}
