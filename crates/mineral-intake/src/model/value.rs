//! Value types for record properties.
//!
//! Every property carries exactly one value; its kind is derived from the
//! variant rather than stored beside it.

use crate::limits::{FLOAT_PRECISION, MAX_LATITUDE, MAX_LONGITUDE};

/// Value kinds understood by the ledger's property schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    Number = 3,
    String = 4,
    Enum = 5,
    Location = 7,
}

impl DataType {
    /// Creates a DataType from its wire representation.
    pub fn from_u8(v: u8) -> Option<DataType> {
        match v {
            3 => Some(DataType::Number),
            4 => Some(DataType::String),
            5 => Some(DataType::Enum),
            7 => Some(DataType::Location),
            _ => None,
        }
    }

    /// Parses the schema file's upper-case name (`"NUMBER"`, `"ENUM"`, ...).
    pub fn from_schema_name(name: &str) -> Option<DataType> {
        match name {
            "NUMBER" => Some(DataType::Number),
            "STRING" => Some(DataType::String),
            "ENUM" => Some(DataType::Enum),
            "LOCATION" => Some(DataType::Location),
            _ => None,
        }
    }

    /// Returns the schema name of this kind.
    pub fn schema_name(self) -> &'static str {
        match self {
            DataType::Number => "NUMBER",
            DataType::String => "STRING",
            DataType::Enum => "ENUM",
            DataType::Location => "LOCATION",
        }
    }
}

/// A geographic coordinate in fixed-point integer form.
///
/// Both components are degrees multiplied by [`FLOAT_PRECISION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub latitude: i64,
    pub longitude: i64,
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Free text.
    String(String),
    /// One option out of the schema's enumeration.
    Enum(String),
    /// Fixed-point integer (decimal value × [`FLOAT_PRECISION`]).
    Number(i64),
    /// Fixed-point coordinate pair.
    Location(Location),
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::String(_) => DataType::String,
            Value::Enum(_) => DataType::Enum,
            Value::Number(_) => DataType::Number,
            Value::Location(_) => DataType::Location,
        }
    }

    /// Validates value-level constraints.
    ///
    /// Returns an error description if invalid, None if valid.
    pub fn validate(&self) -> Option<&'static str> {
        match self {
            Value::Enum(option) => {
                if option.is_empty() {
                    return Some("ENUM value is empty");
                }
            }
            Value::Location(Location { latitude, longitude }) => {
                let max_lat = MAX_LATITUDE * FLOAT_PRECISION;
                let max_lon = MAX_LONGITUDE * FLOAT_PRECISION;
                if !(-max_lat..=max_lat).contains(latitude) {
                    return Some("latitude out of range [-90, +90]");
                }
                if !(-max_lon..=max_lon).contains(longitude) {
                    return Some("longitude out of range [-180, +180]");
                }
            }
            Value::String(_) | Value::Number(_) => {}
        }
        None
    }
}

/// A named property on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name as declared by the record type's schema.
    pub name: String,
    /// The value.
    pub value: Value,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the data type of this property's value.
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }
}
