// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded index newtypes without geometry of their own.

use crate::{overflow, CoordError, Coordinate};

macro_rules! bounded_index {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(pub(crate) usize);

        impl $name {
            #[doc = concat!("Number of valid `", stringify!($name), "` values.")]
            pub const SIZE: usize = $size;

            /// Raw index of this coordinate.
            pub const fn value(self) -> usize {
                self.0
            }
        }

        impl Coordinate for $name {
            const SIZE: usize = $size;
            const KIND: &'static str = stringify!($name);

            fn from_index(index: usize) -> Result<Self, CoordError> {
                if index < $size {
                    Ok(Self(index))
                } else {
                    Err(overflow(Self::KIND, index, $size))
                }
            }

            fn index(self) -> usize {
                self.0
            }
        }

        impl TryFrom<usize> for $name {
            type Error = CoordError;

            fn try_from(index: usize) -> Result<Self, CoordError> {
                <Self as Coordinate>::from_index(index)
            }
        }
    };
}

bounded_index!(
    /// One wafer (or wafer-numbered setup) of the system.
    Wafer,
    256
);

bounded_index!(
    /// FPGA position on a wafer.
    FpgaOnWafer,
    48
);

bounded_index!(
    /// HICANN position inside a reticle (4 columns × 2 rows).
    HicannOnDnc,
    8
);

bounded_index!(
    /// Ananas readout board on a wafer.
    AnanasOnWafer,
    2
);

bounded_index!(
    /// Slice of an Ananas board; one per trigger group it serves.
    AnanasSliceOnAnanas,
    6
);

bounded_index!(
    /// Trigger group on a wafer; every group serves four FPGAs.
    TriggerOnWafer,
    12
);

bounded_index!(
    /// Analog output of a HICANN (as routed through its FPGA).
    AnalogOnHicann,
    2
);

bounded_index!(
    /// Input channel of an ADC board.
    ChannelOnAdc,
    8
);

bounded_index!(
    /// Trigger input of an ADC board.
    TriggerOnAdc,
    2
);

impl FpgaOnWafer {
    /// FPGA that hosts the wafer-wide master role.
    pub const MASTER: Self = Self(12);
}

impl HicannOnDnc {
    /// Column inside the reticle (`0..4`).
    pub const fn x(self) -> usize {
        self.0 % 4
    }

    /// Row inside the reticle (`0..2`).
    pub const fn y(self) -> usize {
        self.0 / 4
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_wafer_system() {
        assert_eq!(FpgaOnWafer::SIZE, 48);
        assert_eq!(AnanasOnWafer::SIZE, 2);
        assert_eq!(AnalogOnHicann::SIZE, 2);
        assert_eq!(TriggerOnWafer::SIZE, 12);
        assert_eq!(FpgaOnWafer::MASTER.value(), 12);
    }

    #[test]
    fn try_from_checks_range() {
        assert!(ChannelOnAdc::try_from(7).is_ok());
        assert!(ChannelOnAdc::try_from(8).is_err());
        assert!(Wafer::try_from(255).is_ok());
        assert!(Wafer::try_from(256).is_err());
    }

    #[test]
    fn hicann_on_dnc_layout_is_row_major() {
        let h = HicannOnDnc::from_index(6).unwrap();
        assert_eq!((h.x(), h.y()), (2, 1));
    }
}
