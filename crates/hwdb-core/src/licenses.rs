// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Slurm license names for every allocatable piece of hardware.

use std::collections::BTreeSet;

use hwdb_coord::AnanasSliceOnAnanas;
use tracing::debug;

use crate::database::Database;

/// First wafer id whose systems carry an aggregator.
pub const AGGREGATOR_WAFER_START: usize = 80;

/// Ordered, duplicate-free list of license names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseSet {
    names: Vec<String>,
}

impl LicenseSet {
    /// Licenses of all wafers in `db`, in wafer order.
    ///
    /// Per wafer: each FPGA followed by its trigger group, each Ananas with
    /// its slice count, each ADC by backend coordinate, and the aggregator of
    /// newer systems.
    pub fn from_database(db: &Database) -> Self {
        let mut set = Self::default();
        let mut seen = BTreeSet::new();
        let mut push = |name: String| {
            if seen.insert(name.clone()) {
                set.names.push(name);
            }
        };
        for (wafer, entry) in &db.wafers {
            for fpga in entry.fpgas.keys() {
                push(fpga.to_string());
                push(fpga.to_trigger_global().to_string());
            }
            for ananas in entry.ananas.keys() {
                push(format!("{ananas}:{}", AnanasSliceOnAnanas::SIZE));
            }
            for adc in entry.adcs.values() {
                push(adc.coord.clone());
            }
            if wafer.value() >= AGGREGATOR_WAFER_START {
                push(format!("{wafer}M0"));
            }
        }
        debug!(licenses = set.names.len(), "collected slurm licenses");
        set
    }

    /// License names in emission order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `Licenses=a,b,...` line for `slurm.conf`.
    pub fn licenses_line(&self) -> String {
        format!("Licenses={}", self.names.join(","))
    }

    /// `AccountingStorageTRES=License/a,...` line for `slurm.conf`.
    pub fn tres_line(&self) -> String {
        let tres: Vec<String> = self.names.iter().map(|n| format!("License/{n}")).collect();
        format!("AccountingStorageTRES={}", tres.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hwdb_coord::{Coordinate, Wafer};

    #[test]
    fn empty_database_has_empty_lines() {
        let set = LicenseSet::from_database(&Database::new());
        assert_eq!(set.licenses_line(), "Licenses=");
        assert_eq!(set.tres_line(), "AccountingStorageTRES=");
    }

    #[test]
    fn fpga_brings_its_trigger_group() {
        let mut db = Database::new();
        db.load_str("wafer: 10\nsetuptype: cubesetup\nfpgas:\n  - fpga: 0\n    ip: 192.168.10.1\n")
            .unwrap();
        let set = LicenseSet::from_database(&db);
        assert_eq!(set.licenses_line(), "Licenses=W10F0,W10T8");
        assert_eq!(
            set.tres_line(),
            "AccountingStorageTRES=License/W10F0,License/W10T8"
        );
    }

    #[test]
    fn shared_names_appear_once() {
        let text = "\
wafer: 80
setuptype: cubesetup
fpgas:
  - fpga: 0
    ip: 10.0.0.1
  - fpga: 1
    ip: 10.0.0.2
ananas:
  - ananas: 0
    ip: 10.0.0.190
    baseport_data: 1
    baseport_reset: 2
adcs:
  - fpga: 0
    analog: 0
    adc: B201331
    channel: 0
    trigger: 1
  - fpga: 0
    analog: 1
    adc: B201331
    channel: 1
    trigger: 1
";
        let mut db = Database::new();
        db.load_str(text).unwrap();
        let set = LicenseSet::from_database(&db);
        let names = set.names();
        assert_eq!(names.iter().filter(|n| n.as_str() == "B201331").count(), 1);
        assert!(names.contains(&"W80A0:6".to_owned()));
        assert_eq!(names.last().map(String::as_str), Some("W80M0"));
        let wafer = Wafer::from_index(80).unwrap();
        let triggers: BTreeSet<String> = db
            .get_fpga_entries(wafer)
            .unwrap()
            .keys()
            .map(|f| f.to_trigger_global().to_string())
            .collect();
        let listed = names.iter().filter(|n| n.contains('T')).count();
        assert_eq!(listed, triggers.len());
    }
}
