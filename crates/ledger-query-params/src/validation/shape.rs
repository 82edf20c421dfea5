//! Declarative per-field rule tables.
//!
//! A shape lists its fields in declaration order, each with the ordered rule
//! names to apply. A failing rule reports its registered message.

use super::registry::FieldLookup;
use crate::domain::FieldError;
use std::collections::HashMap;

/// Reference to a registered rule by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleRef {
    pub rule: &'static str,
}

impl RuleRef {
    pub const fn new(rule: &'static str) -> Self {
        Self { rule }
    }
}

/// One declared field and its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: &'static [RuleRef],
}

impl FieldSpec {
    pub const fn new(name: &'static str, rules: &'static [RuleRef]) -> Self {
        Self { name, rules }
    }
}

/// A typed parameter struct that can be bound from raw query fields.
pub trait QueryShape: FieldLookup + Sized {
    /// Declared fields, in the order they are validated.
    fn fields() -> Vec<FieldSpec>;

    /// Copy raw values into the struct. Missing fields become empty strings.
    fn from_raw(raw: &RawQueryParams) -> Self;

    /// Whole-struct check, run only after every field rule has passed.
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }
}

/// Untyped query fields as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryParams {
    values: HashMap<String, String>,
}

impl RawQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of `name`, empty when absent.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn get_string(&self, name: &str) -> String {
        self.get(name).to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for RawQueryParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl FieldLookup for RawQueryParams {
    fn field(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
