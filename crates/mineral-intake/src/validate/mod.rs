//! Semantic validation for payload batches.
//!
//! Structural checks happen during decode; the checks here need the record
//! type's schema (value kinds and enum options) and look across payloads
//! (ordering, parent linkage).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::names;
use crate::error::ValidationError;
use crate::model::{CreateRecord, DataType, Payload, PayloadBatch, Property, Value};

/// Schema context for semantic validation.
///
/// Properties not registered here are allowed through; the ledger's own
/// schema is the final authority.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    properties: FxHashMap<String, DataType>,
    options: FxHashMap<String, FxHashSet<String>>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property with its expected data type.
    pub fn add_property(&mut self, name: &str, data_type: DataType) {
        self.properties.insert(name.to_string(), data_type);
    }

    /// Registers the allowed options of an ENUM property.
    pub fn add_options(&mut self, name: &str, options: impl IntoIterator<Item = String>) {
        self.options
            .entry(name.to_string())
            .or_default()
            .extend(options);
    }

    /// Gets the expected data type for a property, if registered.
    pub fn get_property_type(&self, name: &str) -> Option<DataType> {
        self.properties.get(name).copied()
    }

    /// Returns whether `option` is allowed for `name`. Properties without
    /// registered options allow anything.
    pub fn allows_option(&self, name: &str, option: &str) -> bool {
        self.options
            .get(name)
            .is_none_or(|allowed| allowed.contains(option))
    }
}

/// Validates a batch against a schema context.
///
/// - exactly one create payload
/// - every finalize precedes the create
/// - a finalized record is the create's declared `parent_id`
/// - property kinds, enum options and value constraints hold
pub fn validate_batch(batch: &PayloadBatch, schema: &SchemaContext) -> Result<(), ValidationError> {
    let mut create: Option<&CreateRecord> = None;
    for (index, payload) in batch.payloads.iter().enumerate() {
        match payload {
            Payload::CreateRecord(cr) => {
                if create.is_some() {
                    return Err(ValidationError::MultipleCreates);
                }
                create = Some(cr);
            }
            Payload::FinalizeRecord(_) => {
                if create.is_some() {
                    return Err(ValidationError::FinalizeOutOfOrder { index });
                }
            }
        }
    }
    let create = create.ok_or(ValidationError::MissingCreate)?;

    let declared_parent = create.property(names::PARENT_ID).and_then(|p| match &p.value {
        Value::String(id) => Some(id.as_str()),
        _ => None,
    });
    for finalize in batch.finalizes() {
        if declared_parent != Some(finalize.record_id.as_str()) {
            return Err(ValidationError::ParentMismatch {
                finalized: finalize.record_id.clone(),
                declared: declared_parent.map(str::to_string),
            });
        }
    }

    validate_properties(&create.properties, schema)
}

/// Validates a property list against a schema context.
pub fn validate_properties(
    properties: &[Property],
    schema: &SchemaContext,
) -> Result<(), ValidationError> {
    let mut seen = FxHashSet::with_capacity_and_hasher(properties.len(), Default::default());
    for prop in properties {
        if !seen.insert(prop.name.as_str()) {
            return Err(ValidationError::DuplicateProperty {
                property: prop.name.clone(),
            });
        }
        if let Some(expected) = schema.get_property_type(&prop.name) {
            let found = prop.data_type();
            if expected != found {
                return Err(ValidationError::TypeMismatch {
                    property: prop.name.clone(),
                    expected,
                    found,
                });
            }
        }
        if let Some(reason) = prop.value.validate() {
            return Err(ValidationError::InvalidValue {
                property: prop.name.clone(),
                reason,
            });
        }
        if let Value::Enum(option) = &prop.value {
            if !schema.allows_option(&prop.name, option) {
                return Err(ValidationError::UnknownOption {
                    property: prop.name.clone(),
                    value: option.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BatchBuilder;

    fn schema() -> SchemaContext {
        let mut schema = SchemaContext::new();
        schema.add_property("tag", DataType::String);
        schema.add_property("weight", DataType::Number);
        schema.add_property("container", DataType::Enum);
        schema.add_property("parent_id", DataType::String);
        schema.add_options("container", ["Bag".to_string(), "Drum".to_string()]);
        schema
    }

    #[test]
    fn test_validate_create_only() {
        let batch = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| {
                r.string("tag", "T1").enum_value("container", "Bag").number("weight", 1)
            })
            .build();
        assert_eq!(validate_batch(&batch, &schema()), Ok(()));
    }

    #[test]
    fn test_validate_finalize_then_create() {
        let batch = BatchBuilder::new(0)
            .finalize_record("P1")
            .create_record("A1", "mineral", |r| r.string("parent_id", "P1"))
            .build();
        assert_eq!(validate_batch(&batch, &schema()), Ok(()));
    }

    #[test]
    fn test_validate_finalize_after_create() {
        let batch = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| r.string("parent_id", "P1"))
            .finalize_record("P1")
            .build();
        assert_eq!(
            validate_batch(&batch, &schema()),
            Err(ValidationError::FinalizeOutOfOrder { index: 1 })
        );
    }

    #[test]
    fn test_validate_parent_mismatch() {
        let batch = BatchBuilder::new(0)
            .finalize_record("P1")
            .create_record("A1", "mineral", |r| r.string("tag", "T"))
            .build();
        assert!(matches!(
            validate_batch(&batch, &schema()),
            Err(ValidationError::ParentMismatch { declared: None, .. })
        ));
    }

    #[test]
    fn test_validate_create_count() {
        let empty = BatchBuilder::new(0).finalize_record("P1").build();
        assert_eq!(validate_batch(&empty, &schema()), Err(ValidationError::MissingCreate));

        let twice = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| r)
            .create_record("A2", "mineral", |r| r)
            .build();
        assert_eq!(validate_batch(&twice, &schema()), Err(ValidationError::MultipleCreates));
    }

    #[test]
    fn test_validate_type_mismatch() {
        let batch = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| r.string("weight", "heavy"))
            .build();
        assert!(matches!(
            validate_batch(&batch, &schema()),
            Err(ValidationError::TypeMismatch {
                expected: DataType::Number,
                found: DataType::String,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_unknown_option_and_unknown_property() {
        let batch = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| r.enum_value("container", "Barrel"))
            .build();
        assert!(matches!(
            validate_batch(&batch, &schema()),
            Err(ValidationError::UnknownOption { .. })
        ));

        // Unknown properties are allowed.
        let batch = BatchBuilder::new(0)
            .create_record("A1", "mineral", |r| r.string("grade", "A"))
            .build();
        assert_eq!(validate_batch(&batch, &schema()), Ok(()));
    }

    #[test]
    fn test_validate_duplicate_and_invalid_values() {
        let dup = vec![
            Property::new("tag", Value::String("a".into())),
            Property::new("tag", Value::String("b".into())),
        ];
        assert!(matches!(
            validate_properties(&dup, &schema()),
            Err(ValidationError::DuplicateProperty { .. })
        ));

        let empty_enum = vec![Property::new("container", Value::Enum(String::new()))];
        assert!(matches!(
            validate_properties(&empty_enum, &schema()),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
