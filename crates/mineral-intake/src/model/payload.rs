//! Payload types for ledger state changes.
//!
//! Each payload becomes one signed transaction.

use crate::model::Property;

/// A ledger action (one transaction's worth of intent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    CreateRecord(CreateRecord),
    FinalizeRecord(FinalizeRecord),
}

impl Payload {
    /// Returns the action code for wire encoding.
    pub fn action(&self) -> u8 {
        match self {
            Payload::CreateRecord(_) => 1,
            Payload::FinalizeRecord(_) => 2,
        }
    }

    /// Returns the record this payload touches.
    pub fn record_id(&self) -> &str {
        match self {
            Payload::CreateRecord(cr) => &cr.record_id,
            Payload::FinalizeRecord(fr) => &fr.record_id,
        }
    }
}

/// Creates a new record with its initial properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecord {
    /// The new record's identifier (the container's serial number).
    pub record_id: String,
    /// Record type name from the schema (e.g. `mineral`).
    pub record_type: String,
    /// Initial properties, in submission order.
    pub properties: Vec<Property>,
}

impl CreateRecord {
    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Closes a record so no further updates are accepted.
///
/// A parent is finalized before a child that references it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeRecord {
    pub record_id: String,
}
