//! Encoding of form state into record properties and payload batches.

use crate::catalog::names;
use crate::error::FormError;
use crate::form::FormState;
use crate::model::{BatchBuilder, Location, PayloadBatch, Property, RecordBuilder, Value};
use crate::numeric::{is_truthy, normalize_int, normalize_percentage};

/// Builds the property list for a new record.
///
/// Order is fixed: the six base properties, the parent link when a parent is
/// attached, then assay, weight and location when their inputs are present.
/// Blank or zero optional inputs are left out; `tag` is always sent.
pub fn build_properties(form: &FormState) -> Result<Vec<Property>, FormError> {
    let mut record = RecordBuilder::new()
        .string(names::TAG, form.tag.as_str())
        .enum_value(names::TYPE, form.mineral_type.as_str())
        .enum_value(names::STATUS, form.status.as_str())
        .enum_value(names::CONTAINER, form.container.as_str())
        .enum_value(names::ORIGIN, form.origin.as_str())
        .enum_value(names::ZONE, form.zone.as_str());

    if let Some(parent) = &form.parent {
        record = record
            .string(names::PARENT_ID, parent.record_id.as_str())
            .string(names::PARENT_TAG, parent.tag().unwrap_or_default());
    }

    let assay = is_truthy(&form.assay)
        .then(|| normalize_percentage(names::ASSAY, &form.assay))
        .transpose()?
        .map(Value::Number);

    let weight = is_truthy(&form.weight)
        .then(|| normalize_int(names::WEIGHT, &form.weight))
        .transpose()?
        .map(Value::Number);

    let location = if is_truthy(&form.latitude) && is_truthy(&form.longitude) {
        Some(Value::Location(Location {
            latitude: normalize_int("latitude", &form.latitude)?,
            longitude: normalize_int("longitude", &form.longitude)?,
        }))
    } else {
        None
    };

    Ok(record
        .value_opt(names::ASSAY, assay)
        .value_opt(names::WEIGHT, weight)
        .value_opt(names::LOCATION, location)
        .into_properties())
}

/// Builds the ordered payload batch for a form.
///
/// With a parent attached the batch finalizes the parent first, then creates
/// the new record; otherwise it only creates.
pub fn build_payload_batch(
    form: &FormState,
    record_type: &str,
    timestamp: i64,
) -> Result<PayloadBatch, FormError> {
    let properties = build_properties(form)?;

    let mut batch = BatchBuilder::new(timestamp);
    if let Some(parent) = &form.parent {
        batch = batch.finalize_record(parent.record_id.as_str());
    }
    Ok(batch
        .create_record_with(form.id.as_str(), record_type, properties)
        .build())
}
