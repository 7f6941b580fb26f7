// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hardware inventory of the neuromorphic wafer cluster.
//!
//! [`Database`] holds one [`WaferEntry`] per wafer (with its FPGAs, reticles,
//! Ananas boards, HICANNs and ADC connections), DLS lab setups by name, and
//! cube and jBOA setups by id. It is filled from and written to a
//! multi-document YAML file:
//!
//! ```no_run
//! use hwdb_core::Database;
//!
//! # fn main() -> hwdb_core::Result<()> {
//! let mut db = Database::new();
//! let report = db.load(Database::default_path())?;
//! assert!(report.skipped.is_empty());
//! for wafer in db.get_wafer_coordinates() {
//!     let fpgas = db.get_fpga_entries(wafer)?;
//!     println!("{wafer}: {} fpgas", fpgas.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Single records can also be fetched as raw text without building a store,
//! see [`get_yaml_entries`].
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
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::use_self
)]

mod branch;
mod config;
mod database;
mod entries;
mod error;
pub mod licenses;
pub mod yaml;

pub use branch::{BranchIds, SetupKind, BRANCH_VERSION};
pub use config::{default_path, DEFAULT_PATH, PATH_ENV};
pub use database::Database;
pub use entries::{
    dna_port, AdcEntry, AnanasEntry, CalibrationMode, DlsSetupEntry, FpgaEntry, GlobalAnalog,
    HicannEntry, HxCubeFpgaEntry, HxCubeSetupEntry, HxCubeWingEntry, JboaAggregatorEntry,
    JboaSetupEntry, ReticleEntry, SetupType, SynramTiming, WaferEntry,
};
pub use error::{HwdbError, Result};
pub use licenses::LicenseSet;
pub use yaml::{get_yaml_entries, LoadReport};

/// Coordinate crate re-exported so callers need a single dependency.
pub use hwdb_coord as coord;
