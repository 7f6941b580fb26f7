// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Quantified store invariants over generated wafers.

mod common;

use std::collections::BTreeSet;

use common::{fpga, hicann, wafer};
use hwdb_core::{Database, FpgaEntry, HicannEntry, HwdbError, SetupType, WaferEntry};
use proptest::prelude::*;

/// A wafer with the given FPGAs and every requested HICANN whose FPGA is among them.
fn build(w: usize, fpgas: &BTreeSet<usize>, hicanns: &[(usize, u64)]) -> Database {
    let mut db = Database::new();
    db.add_wafer_entry(wafer(w), WaferEntry::new(SetupType::CubeSetup));
    for &f in fpgas {
        db.add_fpga_entry(fpga(w, f), FpgaEntry::default()).unwrap();
    }
    for &(h, version) in hicanns {
        let entry = HicannEntry {
            version,
            label: format!("v{version}"),
        };
        // HICANNs of absent FPGAs are rejected; that case has its own property.
        let _ = db.add_hicann_entry(hicann(w, h), entry);
    }
    db
}

proptest! {
    #[test]
    fn hicann_without_fpga_is_rejected(w in 0usize..256, h in 0usize..384) {
        let mut db = Database::new();
        db.add_wafer_entry(wafer(w), WaferEntry::default());
        let err = db.add_hicann_entry(hicann(w, h), HicannEntry::default()).unwrap_err();
        let is_fpga_not_found = matches!(err, HwdbError::NotFound { kind: "fpga", .. });
        prop_assert!(is_fpga_not_found);
        prop_assert!(!db.has_hicann_entry(hicann(w, h)));
    }

    #[test]
    fn removing_an_fpga_removes_its_hicanns(
        fpgas in prop::collection::btree_set(0usize..48, 1..12),
        hicanns in prop::collection::vec((0usize..384, 0u64..5), 0..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut db = build(7, &fpgas, &hicanns);
        let victim = *pick.get(&fpgas.iter().copied().collect::<Vec<_>>());
        let before = db.get_hicann_entries(wafer(7)).unwrap();
        db.remove_fpga_entry(fpga(7, victim)).unwrap();
        let after = db.get_hicann_entries(wafer(7)).unwrap();
        for h in fpga(7, victim).hicanns() {
            prop_assert!(!db.has_hicann_entry(h));
        }
        let expected: Vec<_> = before
            .keys()
            .filter(|h| h.to_fpga_global() != fpga(7, victim))
            .collect();
        prop_assert_eq!(after.keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn per_fpga_query_slices_the_wafer(
        fpgas in prop::collection::btree_set(0usize..48, 0..12),
        hicanns in prop::collection::vec((0usize..384, 0u64..5), 0..64),
    ) {
        let db = build(2, &fpgas, &hicanns);
        let all = db.get_hicann_entries(wafer(2)).unwrap();
        let mut total = 0;
        for f in 0..48 {
            let part = db.get_hicann_entries_of_fpga(fpga(2, f)).unwrap();
            let expected: Vec<_> = all
                .iter()
                .filter(|(h, _)| h.to_fpga_global() == fpga(2, f))
                .collect();
            prop_assert_eq!(part.iter().collect::<Vec<_>>(), expected);
            total += part.len();
        }
        prop_assert_eq!(total, all.len());
    }

    #[test]
    fn generated_wafers_round_trip(
        w in 0usize..256,
        fpgas in prop::collection::btree_set(0usize..48, 0..12),
        hicanns in prop::collection::vec((0usize..384, 0u64..3), 0..64),
    ) {
        let db = build(w, &fpgas, &hicanns);
        let text = db.dump_to_string().unwrap();
        let mut again = Database::new();
        again.load_str(&text).unwrap();
        prop_assert_eq!(again, db);
    }
}
