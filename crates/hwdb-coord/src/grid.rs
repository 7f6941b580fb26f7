// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid geometry of HICANNs and reticles on a wafer.

use crate::{overflow, CoordError, Coordinate, FpgaOnWafer, HicannOnDnc};

/// A centred grid whose rows have individual widths.
pub(crate) struct Grid {
    widths: &'static [usize],
    columns: usize,
}

impl Grid {
    const fn offset(&self, y: usize) -> usize {
        (self.columns - self.widths[y]) / 2
    }

    fn row_start(&self, y: usize) -> usize {
        self.widths[..y].iter().sum()
    }

    fn xy(&self, index: usize) -> (usize, usize) {
        let mut rest = index;
        for (y, &width) in self.widths.iter().enumerate() {
            if rest < width {
                return (self.offset(y) + rest, y);
            }
            rest -= width;
        }
        (0, self.widths.len())
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if y >= self.widths.len() {
            return None;
        }
        let offset = self.offset(y);
        if x < offset || x >= offset + self.widths[y] {
            return None;
        }
        Some(self.row_start(y) + x - offset)
    }
}

pub(crate) const HICANN_GRID: Grid = Grid {
    widths: &[12, 12, 20, 20, 28, 28, 36, 36, 36, 36, 28, 28, 20, 20, 12, 12],
    columns: 36,
};

pub(crate) const DNC_GRID: Grid = Grid {
    widths: &[3, 5, 7, 9, 9, 7, 5, 3],
    columns: 9,
};

/// HICANN position on a wafer, enumerated row by row from the top.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HicannOnWafer(pub(crate) usize);

/// Reticle (DNC) position on a wafer, enumerated row by row from the top.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DncOnWafer(pub(crate) usize);

/// Reticles and DNCs share one coordinate space.
pub type ReticleOnWafer = DncOnWafer;

impl Coordinate for HicannOnWafer {
    const SIZE: usize = 384;
    const KIND: &'static str = "HicannOnWafer";

    fn from_index(index: usize) -> Result<Self, CoordError> {
        if index < Self::SIZE {
            Ok(Self(index))
        } else {
            Err(overflow(Self::KIND, index, Self::SIZE))
        }
    }

    fn index(self) -> usize {
        self.0
    }
}

impl Coordinate for DncOnWafer {
    const SIZE: usize = 48;
    const KIND: &'static str = "DncOnWafer";

    fn from_index(index: usize) -> Result<Self, CoordError> {
        if index < Self::SIZE {
            Ok(Self(index))
        } else {
            Err(overflow(Self::KIND, index, Self::SIZE))
        }
    }

    fn index(self) -> usize {
        self.0
    }
}

impl HicannOnWafer {
    /// Number of HICANN positions on a wafer.
    pub const SIZE: usize = 384;

    /// Raw index of this coordinate.
    pub const fn value(self) -> usize {
        self.0
    }

    /// Column on the 36-wide HICANN grid.
    pub fn x(self) -> usize {
        HICANN_GRID.xy(self.0).0
    }

    /// Row on the 16-high HICANN grid.
    pub fn y(self) -> usize {
        HICANN_GRID.xy(self.0).1
    }

    /// HICANN at grid position `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] for positions cut off by the round wafer edge.
    pub fn from_xy(x: usize, y: usize) -> Result<Self, CoordError> {
        HICANN_GRID
            .index(x, y)
            .map(Self)
            .ok_or_else(|| CoordError::Domain {
                kind: <Self as Coordinate>::KIND,
                detail: format!("no HICANN at ({x}, {y})"),
            })
    }

    fn neighbour(self, dx: isize, dy: isize, direction: &str) -> Result<Self, CoordError> {
        let (x, y) = HICANN_GRID.xy(self.0);
        let target = x
            .checked_add_signed(dx)
            .zip(y.checked_add_signed(dy))
            .and_then(|(nx, ny)| HICANN_GRID.index(nx, ny));
        target.map(Self).ok_or_else(|| CoordError::Domain {
            kind: <Self as Coordinate>::KIND,
            detail: format!("HICANN {} has no {direction} neighbour", self.0),
        })
    }

    /// Neighbour one row up.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] at the wafer edge.
    pub fn north(self) -> Result<Self, CoordError> {
        self.neighbour(0, -1, "north")
    }

    /// Neighbour one column right.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] at the wafer edge.
    pub fn east(self) -> Result<Self, CoordError> {
        self.neighbour(1, 0, "east")
    }

    /// Neighbour one row down.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] at the wafer edge.
    pub fn south(self) -> Result<Self, CoordError> {
        self.neighbour(0, 1, "south")
    }

    /// Neighbour one column left.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] at the wafer edge.
    pub fn west(self) -> Result<Self, CoordError> {
        self.neighbour(-1, 0, "west")
    }

    /// Reticle containing this HICANN.
    pub fn to_dnc(self) -> DncOnWafer {
        let (x, y) = HICANN_GRID.xy(self.0);
        // Every HICANN row pair is exactly four times as wide as its reticle row.
        DncOnWafer(DNC_GRID.row_start(y / 2) + x / 4 - DNC_GRID.offset(y / 2))
    }

    /// Position of this HICANN inside its reticle.
    pub fn to_hicann_on_dnc(self) -> HicannOnDnc {
        let (x, y) = HICANN_GRID.xy(self.0);
        HicannOnDnc((y % 2) * 4 + x % 4)
    }

    /// FPGA wired to this HICANN's reticle.
    pub fn to_fpga(self) -> FpgaOnWafer {
        self.to_dnc().to_fpga()
    }
}

impl DncOnWafer {
    /// Number of reticle positions on a wafer.
    pub const SIZE: usize = 48;

    /// Raw index of this coordinate.
    pub const fn value(self) -> usize {
        self.0
    }

    /// Column on the 9-wide reticle grid.
    pub fn x(self) -> usize {
        DNC_GRID.xy(self.0).0
    }

    /// Row on the 8-high reticle grid.
    pub fn y(self) -> usize {
        DNC_GRID.xy(self.0).1
    }

    /// Reticle at grid position `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Domain`] for positions outside the wafer.
    pub fn from_xy(x: usize, y: usize) -> Result<Self, CoordError> {
        DNC_GRID
            .index(x, y)
            .map(Self)
            .ok_or_else(|| CoordError::Domain {
                kind: <Self as Coordinate>::KIND,
                detail: format!("no reticle at ({x}, {y})"),
            })
    }

    /// All eight HICANNs of this reticle, in `HicannOnDnc` order.
    pub fn hicanns(self) -> impl Iterator<Item = HicannOnWafer> {
        HicannOnDnc::iter_all().map(move |h| h.to_hicann_on_wafer(self))
    }
}

impl HicannOnDnc {
    /// The HICANN at this position inside `dnc`.
    pub fn to_hicann_on_wafer(self, dnc: DncOnWafer) -> HicannOnWafer {
        let (dx, dy) = DNC_GRID.xy(dnc.0);
        let x = dx * 4 + self.x();
        let y = dy * 2 + self.y();
        // Reticle rows map onto HICANN rows with four times the width and offset.
        HicannOnWafer(HICANN_GRID.row_start(y) + x - HICANN_GRID.offset(y))
    }
}

impl TryFrom<usize> for HicannOnWafer {
    type Error = CoordError;

    fn try_from(index: usize) -> Result<Self, CoordError> {
        <Self as Coordinate>::from_index(index)
    }
}

impl TryFrom<usize> for DncOnWafer {
    type Error = CoordError;

    fn try_from(index: usize) -> Result<Self, CoordError> {
        <Self as Coordinate>::from_index(index)
    }
}
