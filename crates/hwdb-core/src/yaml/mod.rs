// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The multi-document YAML file format.
//!
//! A database file is a stream of `---` separated mappings. The kind of each
//! document is decided by [`DocumentKind::classify`]; documents of unknown
//! kind are skipped and listed in the [`LoadReport`].

mod fields;
mod query;
mod reader;
mod writer;

pub use query::get_yaml_entries;
pub use reader::{DocumentKind, LoadReport, SkippedDocument};

pub(crate) use reader::load_str;
pub(crate) use writer::dump;
