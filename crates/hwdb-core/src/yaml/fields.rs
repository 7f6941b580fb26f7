// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed access to the keys of one YAML mapping.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use serde_yaml::{Mapping, Value};

use crate::entries::{CalibrationMode, SetupType, SynramTiming};
use crate::error::{HwdbError, Result};

/// Scalar or small composite that can be read from a YAML value.
pub(crate) trait FromYaml: Sized {
    /// What the value should look like, for error messages.
    const EXPECTED: &'static str;

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>>;
}

/// Unsigned integer from a number or a decimal / `0x` hex string.
fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16).ok(),
                None => s.parse().ok(),
            }
        }
        _ => None,
    }
}

impl FromYaml for u64 {
    const EXPECTED: &'static str = "an unsigned integer";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        unsigned(value).ok_or(None)
    }
}

impl FromYaml for usize {
    const EXPECTED: &'static str = "an unsigned integer";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        unsigned(value)
            .and_then(|v| Self::try_from(v).ok())
            .ok_or(None)
    }
}

impl FromYaml for u16 {
    const EXPECTED: &'static str = "an integer in 0..=65535";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        unsigned(value)
            .and_then(|v| Self::try_from(v).ok())
            .ok_or(None)
    }
}

impl FromYaml for bool {
    const EXPECTED: &'static str = "true or false";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            _ => Err(None),
        }
    }
}

impl FromYaml for String {
    const EXPECTED: &'static str = "a string";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(None),
        }
    }
}

impl FromYaml for Ipv4Addr {
    const EXPECTED: &'static str = "a dotted-decimal IPv4 address";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        value
            .as_str()
            .and_then(|s| s.trim().parse().ok())
            .ok_or(None)
    }
}

impl FromYaml for SynramTiming {
    const EXPECTED: &'static str = "a 2x2 sequence of integers";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        let rows = value.as_sequence().filter(|r| r.len() == 2).ok_or(None)?;
        let mut out = [[0; 2]; 2];
        for (row, dst) in rows.iter().zip(out.iter_mut()) {
            let cols = row.as_sequence().filter(|c| c.len() == 2).ok_or(None)?;
            for (col, cell) in cols.iter().zip(dst.iter_mut()) {
                *cell = u16::from_yaml(col)?;
            }
        }
        Ok(out)
    }
}

impl FromYaml for SetupType {
    const EXPECTED: &'static str = "a setup type name";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        let name = String::from_yaml(value)?;
        Self::from_name(&name).map_err(Some)
    }
}

impl FromYaml for CalibrationMode {
    const EXPECTED: &'static str = "a calibration mode name";

    fn from_yaml(value: &Value) -> Result<Self, Option<HwdbError>> {
        let name = String::from_yaml(value)?;
        Self::from_name(&name).map_err(Some)
    }
}

/// Borrowed view of a mapping that remembers which keys were consumed.
pub(crate) struct Fields<'a> {
    context: String,
    map: &'a Mapping,
    used: BTreeSet<&'static str>,
}

impl<'a> Fields<'a> {
    /// Wraps `value`, which must be a mapping; `context` prefixes error messages.
    pub(crate) fn new(context: impl Into<String>, value: &'a Value) -> Result<Self> {
        let context = context.into();
        match value {
            Value::Mapping(map) => Ok(Self {
                context,
                map,
                used: BTreeSet::new(),
            }),
            _ => Err(HwdbError::InvalidFormat(format!(
                "{context}: expected a mapping"
            ))),
        }
    }

    pub(crate) fn context(&self) -> &str {
        &self.context
    }

    /// Same view with a more specific error prefix.
    pub(crate) fn with_context(self, context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..self
        }
    }

    /// Raw value of `key`, marking it consumed.
    pub(crate) fn raw(&mut self, key: &'static str) -> Option<&'a Value> {
        self.used.insert(key);
        self.map.get(key)
    }

    pub(crate) fn optional<T: FromYaml>(&mut self, key: &'static str) -> Result<Option<T>> {
        match self.raw(key) {
            None => Ok(None),
            Some(value) => T::from_yaml(value).map(Some).map_err(|e| {
                e.unwrap_or_else(|| {
                    HwdbError::InvalidFormat(format!(
                        "{}: `{key}` must be {}, got {}",
                        self.context,
                        T::EXPECTED,
                        describe(value)
                    ))
                })
            }),
        }
    }

    pub(crate) fn required<T: FromYaml>(&mut self, key: &'static str) -> Result<T> {
        self.optional(key)?.ok_or_else(|| {
            HwdbError::InvalidFormat(format!("{}: missing field `{key}`", self.context))
        })
    }

    pub(crate) fn or_default<T: FromYaml>(&mut self, key: &'static str, default: T) -> Result<T> {
        Ok(self.optional(key)?.unwrap_or(default))
    }

    /// Rejects keys nobody asked for.
    pub(crate) fn finish(self) -> Result<()> {
        let unknown: Vec<String> = self
            .map
            .keys()
            .filter(|k| !k.as_str().is_some_and(|k| self.used.contains(k)))
            .map(describe)
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(HwdbError::InvalidFormat(format!(
                "{}: unknown field(s) {}",
                self.context,
                unknown.join(", ")
            )))
        }
    }
}

/// Short printable form of a value for diagnostics.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Sequence(_) => "a sequence".to_owned(),
        Value::Mapping(_) => "a mapping".to_owned(),
        Value::Tagged(t) => format!("a value tagged {}", t.tag),
    }
}

/// Scalar rendered the way it would compare against a query string.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
