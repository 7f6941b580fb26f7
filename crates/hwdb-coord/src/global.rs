// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wafer-scoped global coordinates.

use std::fmt;
use std::str::FromStr;

use crate::short::{self, Short};
use crate::{
    AnanasOnWafer, CoordError, Coordinate, DncOnWafer, FpgaOnWafer, HicannOnWafer, TriggerOnWafer,
    Wafer,
};

macro_rules! global {
    ($(#[$meta:meta])* $name:ident, $local:ty, $letter:literal) => {
        $(#[$meta])*
        ///
        #[doc = concat!("Prints as `W<wafer>", $letter, "<index>`.")]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name {
            // Field order drives the derived ordering: wafer first.
            wafer: Wafer,
            local: $local,
        }

        impl $name {
            /// Letter that tags this kind in the short format.
            pub const LETTER: char = $letter;

            /// Pairs a wafer-local coordinate with its wafer.
            pub const fn new(local: $local, wafer: Wafer) -> Self {
                Self { wafer, local }
            }

            /// The wafer-local part.
            pub const fn local(self) -> $local {
                self.local
            }

            /// The enclosing wafer.
            pub const fn wafer(self) -> Wafer {
                self.wafer
            }
        }

        impl Coordinate for $name {
            const SIZE: usize = <$local as Coordinate>::SIZE * Wafer::SIZE;
            const KIND: &'static str = stringify!($name);

            fn from_index(index: usize) -> Result<Self, CoordError> {
                if index >= <Self as Coordinate>::SIZE {
                    return Err(crate::overflow(Self::KIND, index, <Self as Coordinate>::SIZE));
                }
                let per_wafer = <$local as Coordinate>::SIZE;
                Ok(Self {
                    wafer: Wafer::from_index(index / per_wafer)?,
                    local: <$local>::from_index(index % per_wafer)?,
                })
            }

            fn index(self) -> usize {
                self.wafer.index() * <$local as Coordinate>::SIZE + self.local.index()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "W{}{}{}", self.wafer.value(), $letter, self.local.index())
            }
        }

        impl FromStr for $name {
            type Err = CoordError;

            fn from_str(s: &str) -> Result<Self, CoordError> {
                match short::split(s)? {
                    Short { wafer, part: Some(($letter, index)) } => {
                        Ok(Self::new(<$local>::from_index(index)?, wafer))
                    }
                    _ => Err(CoordError::Parse {
                        input: s.to_owned(),
                        reason: concat!("expected W<wafer>", $letter, "<index>"),
                    }),
                }
            }
        }
    };
}

global!(
    /// An FPGA on a specific wafer.
    FpgaGlobal,
    FpgaOnWafer,
    'F'
);

global!(
    /// A HICANN on a specific wafer.
    HicannGlobal,
    HicannOnWafer,
    'H'
);

global!(
    /// A reticle (DNC) on a specific wafer.
    DncGlobal,
    DncOnWafer,
    'D'
);

global!(
    /// An Ananas board on a specific wafer.
    AnanasGlobal,
    AnanasOnWafer,
    'A'
);

global!(
    /// A trigger group on a specific wafer.
    TriggerGlobal,
    TriggerOnWafer,
    'T'
);

/// Reticles and DNCs share one coordinate space.
pub type ReticleGlobal = DncGlobal;

impl FpgaGlobal {
    /// Reticle wired to this FPGA.
    pub const fn to_dnc_global(self) -> DncGlobal {
        DncGlobal::new(self.local.to_dnc(), self.wafer)
    }

    /// Trigger group of this FPGA.
    pub const fn to_trigger_global(self) -> TriggerGlobal {
        TriggerGlobal::new(self.local.to_trigger(), self.wafer)
    }

    /// HICANNs reachable through this FPGA.
    pub fn hicanns(self) -> impl Iterator<Item = HicannGlobal> {
        let wafer = self.wafer;
        self.local.hicanns().map(move |h| HicannGlobal::new(h, wafer))
    }
}

impl HicannGlobal {
    /// FPGA serving this HICANN.
    pub fn to_fpga_global(self) -> FpgaGlobal {
        FpgaGlobal::new(self.local.to_fpga(), self.wafer)
    }

    /// Reticle containing this HICANN.
    pub fn to_dnc_global(self) -> DncGlobal {
        DncGlobal::new(self.local.to_dnc(), self.wafer)
    }
}

impl DncGlobal {
    /// FPGA wired to this reticle.
    pub const fn to_fpga_global(self) -> FpgaGlobal {
        FpgaGlobal::new(self.local.to_fpga(), self.wafer)
    }

    /// HICANNs of this reticle.
    pub fn hicanns(self) -> impl Iterator<Item = HicannGlobal> {
        let wafer = self.wafer;
        self.local.hicanns().map(move |h| HicannGlobal::new(h, wafer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn global_index_is_wafer_major() {
        let f = FpgaGlobal::from_index(49).unwrap();
        assert_eq!(f.wafer().value(), 1);
        assert_eq!(f.local().value(), 1);
        assert_eq!(f.to_string(), "W1F1");
        assert_eq!(f.index(), 49);

        let wafer = Wafer::from_index(5).unwrap();
        let h = HicannGlobal::new(HicannOnWafer::from_index(144).unwrap(), wafer);
        assert_eq!(h.index(), HicannOnWafer::SIZE * 5 + 144);
    }

    #[test]
    fn globals_order_by_wafer_first() {
        let a = FpgaGlobal::from_index(47).unwrap();
        let b = FpgaGlobal::from_index(48).unwrap();
        assert_eq!((a.wafer().value(), b.wafer().value()), (0, 1));
        assert!(a < b);
    }

    #[test]
    fn short_format_parses_back() {
        assert_eq!("W0H123".parse::<HicannGlobal>().unwrap().to_string(), "W0H123");
        assert_eq!("W0T5".parse::<TriggerGlobal>().unwrap().to_string(), "W0T5");
        assert_eq!("W5D21".parse::<DncGlobal>().unwrap().to_string(), "W5D21");
        assert_eq!("W255F47".parse::<FpgaGlobal>().unwrap().to_string(), "W255F47");
        assert_eq!("W3A0".parse::<AnanasGlobal>().unwrap().index(), 6);
    }

    #[test]
    fn wrong_letter_is_a_parse_error() {
        assert!(matches!("W5H3".parse::<FpgaGlobal>(), Err(CoordError::Parse { .. })));
        assert!(matches!("W5F48".parse::<FpgaGlobal>(), Err(CoordError::Overflow { .. })));
    }

    #[test]
    fn conversions_stay_on_the_wafer() {
        let wafer = Wafer::from_index(5).unwrap();
        let f = FpgaGlobal::new(FpgaOnWafer::from_index(3).unwrap(), wafer);
        assert_eq!(f.to_dnc_global().to_string(), "W5D14");
        assert_eq!(f.to_dnc_global().to_fpga_global(), f);
        assert!(f.hicanns().all(|h| h.to_fpga_global() == f && h.wafer() == wafer));
        assert_eq!(f.to_trigger_global().to_string(), "W5T9");
    }
}
