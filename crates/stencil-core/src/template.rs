//! Flat `%key%` placeholder substitution.
//!
//! A placeholder is a `%` marker, one or more characters that are not
//! whitespace, `%` or `.`, and a closing `%`. Substitution is a single
//! left-to-right pass: inserted values are never re-scanned, so a value that
//! itself contains `%other%` is emitted verbatim.

use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::{Result, StencilError};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    // Infallible: the pattern is a literal known to compile.
    Regex::new(r"%([^\s%.]+)%").unwrap()
});

/// The key/value data a template is rendered against.
///
/// Built from a JSON object. Only top-level keys are addressable; nested
/// values are substituted as their compact JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMap {
    entries: Map<String, Value>,
}

impl DataMap {
    /// Parses a JSON document into a mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(DataMap)`: the document is a JSON object
    /// - `Err(StencilError::Serialization)`: the text is not valid JSON
    /// - `Err(StencilError::InvalidData)`: valid JSON, but not an object
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolves a key to the text that replaces its placeholder.
    ///
    /// Absent keys and `null` resolve to the empty string.
    pub fn lookup(&self, key: &str) -> Cow<'_, str> {
        match self.entries.get(key) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl TryFrom<Value> for DataMap {
    type Error = StencilError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(StencilError::invalid_data(format!(
                "expected an object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Substitutes every well-formed placeholder in `template` with its value
/// from `data`.
///
/// Text outside placeholders, and malformed placeholders such as `%a b%` or
/// `%v1.2%`, are copied through unchanged.
///
/// # Examples
///
/// ```
/// use stencil_core::template::{render, DataMap};
///
/// let data = DataMap::from_json_str(r#"{"name": "Dasha"}"#).unwrap();
/// assert_eq!(render("<p>Hello %name%!</p>", &data), "<p>Hello Dasha!</p>");
/// ```
pub fn render(template: &str, data: &DataMap) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| data.lookup(&caps[1]).into_owned())
        .into_owned()
}

/// Returns the distinct placeholder keys in `template`, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str())
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

/// Returns the placeholder keys in `template` that `data` does not define.
pub fn missing_keys(template: &str, data: &DataMap) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|key| !data.contains_key(key))
        .collect()
}
