// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw-text lookup of whole documents, bypassing the store.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use super::fields::scalar_text;
use crate::error::{HwdbError, Result};

/// On-disk text of every document in `path` whose top-level `key` equals `query`.
///
/// Documents are split on lines consisting of exactly `---`. Each match is
/// returned as written (surrounding blank lines trimmed) followed by a
/// newline; no match yields an empty string. Scalars compare by their
/// string form, so `6` matches `"6"`.
///
/// # Errors
///
/// [`HwdbError::Io`] if the file cannot be read and [`HwdbError::Yaml`] if a
/// document is not well-formed.
pub fn get_yaml_entries(path: impl AsRef<Path>, key: &str, query: &str) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| HwdbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let out = entries_in_text(&text, key, query)?;
    debug!(path = %path.display(), key, query, found = !out.is_empty(), "raw yaml query");
    Ok(out)
}

pub(crate) fn entries_in_text(text: &str, key: &str, query: &str) -> Result<String> {
    let mut out = String::new();
    for chunk in split_documents(text) {
        let value: Value = serde_yaml::from_str(&chunk)?;
        if value.is_null() {
            continue;
        }
        if value.get(key).and_then(scalar_text).as_deref() == Some(query) {
            out.push_str(chunk.trim());
            out.push('\n');
        }
    }
    Ok(out)
}

fn split_documents(text: &str) -> Vec<String> {
    let mut chunks = vec![String::new()];
    for line in text.lines() {
        if line == "---" {
            chunks.push(String::new());
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push_str(line);
            chunk.push('\n');
        }
    }
    chunks
}
