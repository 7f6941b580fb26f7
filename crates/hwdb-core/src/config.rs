// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Location of the deployed database file.

use std::path::PathBuf;

/// Environment variable that overrides [`DEFAULT_PATH`].
pub const PATH_ENV: &str = "HWDB_PATH";

/// Deployment location of the database file.
pub const DEFAULT_PATH: &str = "/wang/data/bss-hwdb/db.yaml";

/// Database file to use when the caller does not name one.
///
/// Prefers a non-empty `HWDB_PATH` and falls back to [`DEFAULT_PATH`].
pub fn default_path() -> PathBuf {
    std::env::var_os(PATH_ENV)
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from)
}
