// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by the store, the YAML codec, and the raw query.

use std::io;
use std::path::PathBuf;

use hwdb_coord::CoordError;
use thiserror::Error;

/// Errors raised by database operations.
#[derive(Debug, Error)]
pub enum HwdbError {
    /// Lookup, removal, or parent check hit an absent key.
    #[error("{kind} {key} not found")]
    NotFound {
        /// Entity kind (`"wafer"`, `"fpga"`, ...).
        kind: &'static str,
        /// Printed key.
        key: String,
    },
    /// A document does not have the expected shape.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// An enumerated field holds an unknown value.
    #[error("invalid value {value:?} for `{field}`")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The operation is not allowed in the current store state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// Coordinate construction or conversion failed.
    #[error(transparent)]
    Coordinate(#[from] CoordError),
    /// Reading or writing a database file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Writing a dump to a caller-supplied sink failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    /// The text is not well-formed YAML.
    #[error("malformed yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HwdbError {
    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// True for [`HwdbError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = HwdbError> = std::result::Result<T, E>;
