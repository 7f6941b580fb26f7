// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property lookup by short-format coordinate.

use anyhow::{bail, Context, Result};
use hwdb_core::coord::AnyCoordinate;
use hwdb_core::Database;
use serde_json::Value;

/// Text of `property` on the entry stored at `coordinate`.
///
/// Strings print bare, everything else as JSON.
pub(crate) fn lookup(db: &Database, coordinate: &str, property: &str) -> Result<String> {
    let coord: AnyCoordinate = coordinate
        .parse()
        .with_context(|| format!("parsing coordinate {coordinate:?}"))?;
    let entry = match coord {
        AnyCoordinate::Wafer(c) => serde_json::to_value(db.get_wafer_entry(c)?)?,
        AnyCoordinate::Fpga(c) => serde_json::to_value(db.get_fpga_entry(c)?)?,
        AnyCoordinate::Hicann(c) => serde_json::to_value(db.get_hicann_entry(c)?)?,
        AnyCoordinate::Dnc(c) => serde_json::to_value(db.get_reticle_entry(c)?)?,
        AnyCoordinate::Ananas(c) => serde_json::to_value(db.get_ananas_entry(c)?)?,
        AnyCoordinate::Trigger(_) => bail!("no hwdb entry assigned to {coord}"),
    };
    let Value::Object(fields) = entry else {
        bail!("entry of {coord} has no properties");
    };
    match fields.get(property) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => {
            let available: Vec<&str> = fields.keys().map(String::as_str).collect();
            bail!(
                "{coord} has no property `{property}`, available properties are: {}",
                available.join(", ")
            )
        }
    }
}
