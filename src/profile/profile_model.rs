use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A captured value: free text / option value, or the checked flag of a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// `false` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(_) => None,
        }
    }

    /// Text written into a text-like control: falsy values become `""`.
    pub fn to_fill_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(true) => "true".to_string(),
            FieldValue::Bool(false) => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: FieldValue,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldEntry {
    pub fn new(value: impl Into<FieldValue>, field_type: FieldType) -> Self {
        FieldEntry {
            value: value.into(),
            field_type,
        }
    }
}

/// Flat key → entry map captured from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub entries: BTreeMap<String, FieldEntry>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldEntry> {
        self.entries.get(key)
    }

    /// Register `entry` under every key, replacing whatever held it before.
    pub fn register(&mut self, keys: &[String], entry: FieldEntry) {
        for key in keys {
            self.entries.insert(key.clone(), entry.clone());
        }
    }

    /// First key, in the order given, that has an entry.
    pub fn lookup(&self, keys: &[String]) -> Option<&FieldEntry> {
        keys.iter().find_map(|key| self.entries.get(key))
    }
}

/// Count display text: `1 field`, `0 fields`, `12 fields`.
pub fn field_count_label(count: usize) -> String {
    format!("{} field{}", count, if count == 1 { "" } else { "s" })
}

/// Count display for an optional stored profile.
pub fn profile_count_label(profile: Option<&Profile>) -> String {
    field_count_label(profile.map_or(0, Profile::len))
}
