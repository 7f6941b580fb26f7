// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Coordinates of the wafer-scale system.
//!
//! Every hardware component is addressed either by a bare index that is only
//! meaningful on one wafer (`FpgaOnWafer`, `HicannOnWafer`, ...) or by a
//! wafer-scoped global (`FpgaGlobal`, `HicannGlobal`, ...). Both kinds implement
//! [`Coordinate`]: construction from a raw index is range checked, the index
//! round-trips, and [`Coordinate::iter_all`] enumerates every valid value in
//! index order.
//!
//! # Geometry
//!
//! HICANNs sit on a 36×16 grid whose rows are centred and shrink towards the
//! wafer edge. Reticles (DNCs) group 4×2 HICANNs, giving a 9×8 grid. Each
//! reticle is wired to exactly one FPGA; the wiring table is a bijection and
//! every four FPGAs share one trigger group.
//!
//! # Short format
//!
//! Globals print as `W<wafer><letter><index>` (`W5F3`, `W0H123`, `W3A0`,
//! `W0T5`, `W5D21`); wafers print as `W<wafer>`. The same strings are used as
//! slurm license names and are accepted by [`AnyCoordinate`]'s `FromStr`.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata,
    clippy::use_self
)]

mod bounded;
mod global;
mod grid;
#[cfg(feature = "serde")]
mod serde_impls;
mod short;
mod wiring;

use std::fmt;
use std::marker::PhantomData;

pub use bounded::{
    AnalogOnHicann, AnanasOnWafer, AnanasSliceOnAnanas, ChannelOnAdc, FpgaOnWafer, HicannOnDnc,
    TriggerOnAdc, TriggerOnWafer, Wafer,
};
pub use global::{AnanasGlobal, DncGlobal, FpgaGlobal, HicannGlobal, ReticleGlobal, TriggerGlobal};
pub use grid::{DncOnWafer, HicannOnWafer, ReticleOnWafer};
pub use short::AnyCoordinate;

/// Errors raised by coordinate construction, conversion, and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    /// A raw index lies outside the valid range of the coordinate type.
    #[error("{kind} index {value} out of range (size {size})")]
    Overflow {
        /// Coordinate type name.
        kind: &'static str,
        /// Offending index.
        value: usize,
        /// Number of valid values.
        size: usize,
    },
    /// The requested position does not exist on the wafer (edge neighbour, cut corner).
    #[error("{kind}: {detail}")]
    Domain {
        /// Coordinate type name.
        kind: &'static str,
        /// What was asked for.
        detail: String,
    },
    /// A short-format string could not be parsed.
    #[error("cannot parse coordinate {input:?}: {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// A value from a finite, enumerable coordinate space.
pub trait Coordinate: Copy + Ord + fmt::Debug {
    /// Number of valid values.
    const SIZE: usize;
    /// Type name used in error messages.
    const KIND: &'static str;

    /// Builds the coordinate from its enumeration index.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Overflow`] if `index >= Self::SIZE`.
    fn from_index(index: usize) -> Result<Self, CoordError>;

    /// Enumeration index in `0..Self::SIZE`.
    fn index(self) -> usize;

    /// Iterates every valid value in index order.
    fn iter_all() -> IterAll<Self> {
        IterAll {
            next: 0,
            marker: PhantomData,
        }
    }
}

/// Iterator returned by [`Coordinate::iter_all`].
#[derive(Debug, Clone)]
pub struct IterAll<C> {
    next: usize,
    marker: PhantomData<C>,
}

impl<C: Coordinate> Iterator for IterAll<C> {
    type Item = C;

    fn next(&mut self) -> Option<C> {
        if self.next >= C::SIZE {
            return None;
        }
        let item = C::from_index(self.next).ok();
        self.next += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = C::SIZE.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<C: Coordinate> ExactSizeIterator for IterAll<C> {}

pub(crate) const fn overflow(kind: &'static str, value: usize, size: usize) -> CoordError {
    CoordError::Overflow { kind, value, size }
}
