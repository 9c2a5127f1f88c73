//! Annotation attributes.
//!
//! Tables, columns, routines and custom types carry free-form comments in
//! the schema store. A comment that is a JSON object is an annotation: a
//! bag of keyed settings consulted throughout model resolution.
//!
//! ```text
//! COMMENT ON TABLE public.customer IS '{"important": true, "ui": false}';
//! ```
//!
//! Every read is optional and defaulting. A missing key, a missing bag, or a
//! value of the wrong JSON kind all fall back to the caller's default:
//!
//! ```ignore
//! use schemagen::attributes::{read_attributes, OptionalAttributes};
//!
//! let attrs = read_attributes(r#"{"ignore": true}"#);
//! assert!(attrs.flag("ignore", false));
//! assert!(attrs.flag("api", true));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A parsed annotation: string keys mapped to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Boolean value. Strings such as `"true"` are not coerced.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Boolean value, or `default` when the key is absent or not a boolean.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Integer value. Numeric strings are accepted.
    pub fn i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True when the key holds exactly this string.
    pub fn is(&self, key: &str, expected: &str) -> bool {
        self.str(key) == Some(expected)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Combine with `base`; keys present in `self` win.
    pub fn merged_over(&self, base: &Attributes) -> Attributes {
        let mut merged = base.0.clone();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        Attributes(merged)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Defaulting reads over an attribute bag that may not exist.
///
/// Entities store `Option<Attributes>`; absence of the whole bag reads the
/// same as absence of the key.
pub trait OptionalAttributes {
    fn bag(&self) -> Option<&Attributes>;

    fn flag(&self, key: &str, default: bool) -> bool {
        self.bag().map_or(default, |a| a.flag(key, default))
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.bag().and_then(|a| a.bool(key))
    }

    fn str(&self, key: &str) -> Option<&str> {
        self.bag().and_then(|a| a.str(key))
    }

    fn i64(&self, key: &str) -> Option<i64> {
        self.bag().and_then(|a| a.i64(key))
    }

    fn is(&self, key: &str, expected: &str) -> bool {
        self.bag().is_some_and(|a| a.is(key, expected))
    }
}

impl OptionalAttributes for Option<Attributes> {
    fn bag(&self) -> Option<&Attributes> {
        self.as_ref()
    }
}

impl OptionalAttributes for Attributes {
    fn bag(&self) -> Option<&Attributes> {
        Some(self)
    }
}

/// Classification of a comment string.
#[derive(Debug)]
pub enum Annotation {
    /// Empty or whitespace-only.
    Absent,
    /// Ordinary prose, or valid JSON that is not an object.
    PlainText,
    /// A JSON object.
    Parsed(Attributes),
    /// Looked like JSON but failed to parse.
    Malformed(serde_json::Error),
}

impl Annotation {
    pub fn into_attributes(self) -> Option<Attributes> {
        match self {
            Annotation::Parsed(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/// Classify a comment without logging.
pub fn parse_annotation(text: &str) -> Annotation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Annotation::Absent;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Annotation::Parsed(Attributes(map)),
        Ok(_) => Annotation::PlainText,
        Err(err) if trimmed.starts_with('{') => Annotation::Malformed(err),
        Err(_) => Annotation::PlainText,
    }
}

/// Parse a comment into attributes, warning only when it looked like JSON.
pub fn read_attributes(text: &str) -> Option<Attributes> {
    match parse_annotation(text) {
        Annotation::Parsed(attrs) => Some(attrs),
        Annotation::Malformed(err) => {
            warn!(error = %err, text, "unable to parse annotation, ignoring it");
            None
        }
        Annotation::Absent | Annotation::PlainText => None,
    }
}

/// Parse an optional comment.
pub fn read_optional_attributes(text: Option<&str>) -> Option<Attributes> {
    text.and_then(read_attributes)
}
