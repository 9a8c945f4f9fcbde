//! Records as returned by the ledger's read API.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// A property as reported by the read API: a name and its current value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordProperty {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// An asset record fetched from `records/{recordId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub record_id: String,
    #[serde(default)]
    pub record_type: String,
    #[serde(default)]
    pub properties: Vec<RecordProperty>,
}

/// A fetched parent with its properties flattened into a name-keyed map.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRecord {
    pub record_id: String,
    pub record_type: String,
    props: FxHashMap<String, serde_json::Value>,
}

impl ParentRecord {
    /// Returns the raw value of a property.
    pub fn prop(&self, name: &str) -> Option<&serde_json::Value> {
        self.props.get(name)
    }

    /// Returns a property rendered as text.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON
    /// form; null, arrays and objects have no text form.
    pub fn prop_str(&self, name: &str) -> Option<String> {
        match self.props.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The parent's mineral type.
    pub fn mineral_type(&self) -> Option<String> {
        self.prop_str("type")
    }

    pub fn tag(&self) -> Option<String> {
        self.prop_str("tag")
    }

    pub fn origin(&self) -> Option<String> {
        self.prop_str("origin")
    }

    pub fn zone(&self) -> Option<String> {
        self.prop_str("zone")
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

impl From<AssetRecord> for ParentRecord {
    /// Flattens the property list. Later entries overwrite earlier ones.
    fn from(record: AssetRecord) -> Self {
        let mut props =
            FxHashMap::with_capacity_and_hasher(record.properties.len(), Default::default());
        for RecordProperty { name, value } in record.properties {
            props.insert(name, value);
        }
        Self {
            record_id: record.record_id,
            record_type: record.record_type,
            props,
        }
    }
}
