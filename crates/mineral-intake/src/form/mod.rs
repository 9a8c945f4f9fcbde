//! The asset intake form: state, type resolution, property encoding and the
//! submit lifecycle.

pub mod controller;
pub mod encode;
pub mod resolve;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FormError;
use crate::limits::{MAX_LATITUDE, MAX_LONGITUDE};
use crate::model::ParentRecord;
use crate::numeric::parse_decimal;

pub use controller::{AssetForm, SubmitOutcome};
pub use encode::{build_payload_batch, build_properties};
pub use resolve::TypeResolver;

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Tag,
    Type,
    Status,
    Container,
    Origin,
    Zone,
    Assay,
    Weight,
    Latitude,
    Longitude,
}

/// Lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Editing,
    Submitting,
    NavigatedAway,
    EditingWithError,
}

/// Raw user input, exactly as typed.
///
/// Numeric fields stay text until encoding so that blank and zero inputs
/// can be told apart from bad ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub id: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub mineral_type: String,
    pub status: String,
    pub container: String,
    pub origin: String,
    pub zone: String,
    pub assay: String,
    pub weight: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(skip)]
    pub parent: Option<ParentRecord>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Reads one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Tag => &self.tag,
            Field::Type => &self.mineral_type,
            Field::Status => &self.status,
            Field::Container => &self.container,
            Field::Origin => &self.origin,
            Field::Zone => &self.zone,
            Field::Assay => &self.assay,
            Field::Weight => &self.weight,
            Field::Latitude => &self.latitude,
            Field::Longitude => &self.longitude,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::Tag => &mut self.tag,
            Field::Type => &mut self.mineral_type,
            Field::Status => &mut self.status,
            Field::Container => &mut self.container,
            Field::Origin => &mut self.origin,
            Field::Zone => &mut self.zone,
            Field::Assay => &mut self.assay,
            Field::Weight => &mut self.weight,
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
        }
    }

    /// Checks the input before it is encoded.
    ///
    /// `selectable` is the resolver's output for the current parent.
    pub fn validate(&self, selectable: &[&str]) -> Result<(), FormError> {
        if self.id.trim().is_empty() {
            return Err(FormError::Missing { field: "id" });
        }
        if !selectable.contains(&self.mineral_type.as_str()) {
            return Err(FormError::TypeNotSelectable {
                mineral_type: self.mineral_type.clone(),
                allowed: selectable.iter().map(|t| t.to_string()).collect(),
            });
        }

        check_non_negative("assay", &self.assay)?;
        check_non_negative("weight", &self.weight)?;

        let has_latitude = !self.latitude.trim().is_empty();
        let has_longitude = !self.longitude.trim().is_empty();
        if has_latitude != has_longitude {
            return Err(FormError::PartialLocation);
        }
        if has_latitude {
            check_bounds("latitude", &self.latitude, MAX_LATITUDE)?;
            check_bounds("longitude", &self.longitude, MAX_LONGITUDE)?;
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, input: &str) -> Result<(), FormError> {
    if input.trim().is_empty() {
        return Ok(());
    }
    if parse_decimal(field, input)? < Decimal::ZERO {
        return Err(FormError::Negative {
            field,
            input: input.to_string(),
        });
    }
    Ok(())
}

fn check_bounds(field: &'static str, input: &str, max: i64) -> Result<(), FormError> {
    let value = parse_decimal(field, input)?;
    if value.abs() > Decimal::from(max) {
        return Err(FormError::OutOfBounds {
            field,
            min: -max,
            max,
            input: input.to_string(),
        });
    }
    Ok(())
}
