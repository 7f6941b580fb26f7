// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Short-format strings (`W5`, `W5F3`, `W0H123`).

use std::fmt;
use std::str::FromStr;

use crate::{
    AnanasGlobal, CoordError, Coordinate, DncGlobal, FpgaGlobal, HicannGlobal, TriggerGlobal,
    Wafer,
};

/// Pieces of a short-format string.
pub(crate) struct Short {
    pub(crate) wafer: Wafer,
    pub(crate) part: Option<(char, usize)>,
}

fn number(input: &str, digits: &str) -> Result<usize, CoordError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordError::Parse {
            input: input.to_owned(),
            reason: "expected a decimal index",
        });
    }
    digits.parse().map_err(|_| CoordError::Parse {
        input: input.to_owned(),
        reason: "index too large",
    })
}

/// Splits `W<wafer>[<letter><index>]`.
pub(crate) fn split(input: &str) -> Result<Short, CoordError> {
    let Some(rest) = input.strip_prefix('W') else {
        return Err(CoordError::Parse {
            input: input.to_owned(),
            reason: "expected leading 'W'",
        });
    };
    let cut = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let wafer = Wafer::from_index(number(input, &rest[..cut])?)?;
    let tail = &rest[cut..];
    let mut chars = tail.chars();
    let part = match chars.next() {
        None => None,
        Some(letter) => Some((letter, number(input, chars.as_str())?)),
    };
    Ok(Short { wafer, part })
}

impl fmt::Display for Wafer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

impl FromStr for Wafer {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, CoordError> {
        match split(s)? {
            Short { wafer, part: None } => Ok(wafer),
            Short { .. } => Err(CoordError::Parse {
                input: s.to_owned(),
                reason: "expected W<wafer>",
            }),
        }
    }
}

/// Any coordinate that has a short-format spelling.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AnyCoordinate {
    /// `W<wafer>`
    Wafer(Wafer),
    /// `W<wafer>F<fpga>`
    Fpga(FpgaGlobal),
    /// `W<wafer>H<hicann>`
    Hicann(HicannGlobal),
    /// `W<wafer>D<reticle>`
    Dnc(DncGlobal),
    /// `W<wafer>A<ananas>`
    Ananas(AnanasGlobal),
    /// `W<wafer>T<trigger>`
    Trigger(TriggerGlobal),
}

impl AnyCoordinate {
    /// Wafer every variant lives on.
    pub const fn wafer(self) -> Wafer {
        match self {
            Self::Wafer(w) => w,
            Self::Fpga(c) => c.wafer(),
            Self::Hicann(c) => c.wafer(),
            Self::Dnc(c) => c.wafer(),
            Self::Ananas(c) => c.wafer(),
            Self::Trigger(c) => c.wafer(),
        }
    }
}

impl fmt::Display for AnyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wafer(c) => fmt::Display::fmt(c, f),
            Self::Fpga(c) => fmt::Display::fmt(c, f),
            Self::Hicann(c) => fmt::Display::fmt(c, f),
            Self::Dnc(c) => fmt::Display::fmt(c, f),
            Self::Ananas(c) => fmt::Display::fmt(c, f),
            Self::Trigger(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl FromStr for AnyCoordinate {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, CoordError> {
        let Short { wafer, part } = split(s)?;
        let Some((letter, index)) = part else {
            return Ok(Self::Wafer(wafer));
        };
        Ok(match letter {
            FpgaGlobal::LETTER => {
                Self::Fpga(FpgaGlobal::new(Coordinate::from_index(index)?, wafer))
            }
            HicannGlobal::LETTER => {
                Self::Hicann(HicannGlobal::new(Coordinate::from_index(index)?, wafer))
            }
            DncGlobal::LETTER => Self::Dnc(DncGlobal::new(Coordinate::from_index(index)?, wafer)),
            AnanasGlobal::LETTER => {
                Self::Ananas(AnanasGlobal::new(Coordinate::from_index(index)?, wafer))
            }
            TriggerGlobal::LETTER => {
                Self::Trigger(TriggerGlobal::new(Coordinate::from_index(index)?, wafer))
            }
            _ => {
                return Err(CoordError::Parse {
                    input: s.to_owned(),
                    reason: "unknown coordinate letter",
                })
            }
        })
    }
}
