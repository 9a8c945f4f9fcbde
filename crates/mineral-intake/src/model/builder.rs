//! Builder API for ergonomic batch construction.
//!
//! # Example
//!
//! ```rust
//! use mineral_intake::model::builder::BatchBuilder;
//!
//! let batch = BatchBuilder::new(1_700_000_000)
//!     .finalize_record("P-7")
//!     .create_record("A1", "mineral", |r| r
//!         .string("tag", "T1")
//!         .enum_value("type", "Coltan Concentrate")
//!         .string("parent_id", "P-7")
//!         .number("weight", 10_000_000)
//!     )
//!     .build();
//!
//! assert_eq!(batch.len(), 2);
//! ```

use crate::model::{
    CreateRecord, FinalizeRecord, Location, Payload, PayloadBatch, Property, Value,
};

/// Builder for constructing a [`PayloadBatch`].
#[derive(Debug, Clone)]
pub struct BatchBuilder {
    timestamp: i64,
    payloads: Vec<Payload>,
}

impl BatchBuilder {
    /// Creates a new builder whose payloads carry the given timestamp.
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            payloads: Vec::new(),
        }
    }

    /// Adds a FinalizeRecord payload.
    pub fn finalize_record(mut self, record_id: impl Into<String>) -> Self {
        self.payloads.push(Payload::FinalizeRecord(FinalizeRecord {
            record_id: record_id.into(),
        }));
        self
    }

    /// Adds a CreateRecord payload using a builder function.
    pub fn create_record<F>(
        mut self,
        record_id: impl Into<String>,
        record_type: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: FnOnce(RecordBuilder) -> RecordBuilder,
    {
        let builder = f(RecordBuilder::new());
        self.payloads.push(Payload::CreateRecord(CreateRecord {
            record_id: record_id.into(),
            record_type: record_type.into(),
            properties: builder.properties,
        }));
        self
    }

    /// Adds a CreateRecord payload with an already-built property list.
    pub fn create_record_with(
        mut self,
        record_id: impl Into<String>,
        record_type: impl Into<String>,
        properties: Vec<Property>,
    ) -> Self {
        self.payloads.push(Payload::CreateRecord(CreateRecord {
            record_id: record_id.into(),
            record_type: record_type.into(),
            properties,
        }));
        self
    }

    /// Builds the final batch.
    pub fn build(self) -> PayloadBatch {
        PayloadBatch {
            timestamp: self.timestamp,
            payloads: self.payloads,
        }
    }
}

/// Builder for record properties (used in CreateRecord).
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    properties: Vec<Property>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property value.
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Adds a STRING value.
    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.value(name, Value::String(value.into()))
    }

    /// Adds an ENUM value.
    pub fn enum_value(self, name: impl Into<String>, option: impl Into<String>) -> Self {
        self.value(name, Value::Enum(option.into()))
    }

    /// Adds a NUMBER value (already in fixed-point form).
    pub fn number(self, name: impl Into<String>, value: i64) -> Self {
        self.value(name, Value::Number(value))
    }

    /// Adds a LOCATION value (already in fixed-point form).
    pub fn location(self, name: impl Into<String>, latitude: i64, longitude: i64) -> Self {
        self.value(name, Value::Location(Location { latitude, longitude }))
    }

    /// Adds a property only when `value` is `Some`.
    pub fn value_opt(self, name: impl Into<String>, value: Option<Value>) -> Self {
        match value {
            Some(v) => self.value(name, v),
            None => self,
        }
    }

    /// Returns the properties collected so far.
    pub fn into_properties(self) -> Vec<Property> {
        self.properties
    }
}
