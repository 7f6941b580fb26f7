// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serde support: wafer-local indices as integers, globals as short-format strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    AnalogOnHicann, AnanasGlobal, AnanasOnWafer, AnanasSliceOnAnanas, AnyCoordinate, ChannelOnAdc,
    Coordinate, DncGlobal, DncOnWafer, FpgaGlobal, FpgaOnWafer, HicannGlobal, HicannOnDnc,
    HicannOnWafer, TriggerGlobal, TriggerOnAdc, TriggerOnWafer, Wafer,
};

macro_rules! serde_as_index {
    ($($name:ty),* $(,)?) => {$(
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_u64(self.index() as u64)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = u64::deserialize(deserializer)?;
                let index = usize::try_from(value).map_err(D::Error::custom)?;
                <$name>::from_index(index).map_err(D::Error::custom)
            }
        }
    )*};
}

macro_rules! serde_as_short {
    ($($name:ty),* $(,)?) => {$(
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(D::Error::custom)
            }
        }
    )*};
}

serde_as_index!(
    Wafer,
    FpgaOnWafer,
    HicannOnWafer,
    DncOnWafer,
    HicannOnDnc,
    AnanasOnWafer,
    AnanasSliceOnAnanas,
    TriggerOnWafer,
    AnalogOnHicann,
    ChannelOnAdc,
    TriggerOnAdc,
);

serde_as_short!(
    FpgaGlobal,
    HicannGlobal,
    DncGlobal,
    AnanasGlobal,
    TriggerGlobal,
    AnyCoordinate,
);
