//! The schema catalog: enumerated options for a record type.
//!
//! A catalog is loaded once from the schema document and passed to the
//! resolver, the form controller and batch validation. Options are found by
//! property *name*, so reordering properties in the schema file has no
//! effect.

pub mod rules;

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::model::DataType;
use crate::validate::SchemaContext;

pub use rules::ProcessingRules;

/// Property names of the enumerated fields the intake form offers.
pub mod names {
    pub const TAG: &str = "tag";
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
    pub const CONTAINER: &str = "container";
    pub const ORIGIN: &str = "origin";
    pub const ZONE: &str = "zone";
    pub const PARENT_ID: &str = "parent_id";
    pub const PARENT_TAG: &str = "parent_tag";
    pub const ASSAY: &str = "assay";
    pub const WEIGHT: &str = "weight";
    pub const LOCATION: &str = "location";
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaProperty {
    name: String,
    data_type: String,
    #[serde(default)]
    enum_options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SchemaRecordType {
    name: String,
    #[serde(default)]
    properties: Vec<SchemaProperty>,
}

/// Validated option lists and processing rules for one record type.
#[derive(Debug, Clone)]
pub struct Catalog {
    record_type: String,
    mineral_types: Vec<String>,
    statuses: Vec<String>,
    container_types: Vec<String>,
    origins: Vec<String>,
    zones: Vec<String>,
    schema: SchemaContext,
    rules: ProcessingRules,
}

impl Catalog {
    /// Loads the catalog for `record_type` from a schema file.
    pub fn from_path(path: impl AsRef<Path>, record_type: &str) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_schema_json(&json, record_type)?;
        info!(path = %path.display(), record_type, "loaded schema catalog");
        Ok(catalog)
    }

    /// Parses the catalog for `record_type` from a schema document.
    ///
    /// The document is a JSON array of record types, each with a `name` and a
    /// list of `properties` (`name`, `dataType`, optional `enumOptions`).
    /// Uses the default processing rules.
    pub fn from_schema_json(json: &str, record_type: &str) -> Result<Self, CatalogError> {
        Self::from_schema_json_with_rules(json, record_type, ProcessingRules::default())
    }

    /// Parses the catalog for `record_type` with explicit processing rules.
    pub fn from_schema_json_with_rules(
        json: &str,
        record_type: &str,
        rules: ProcessingRules,
    ) -> Result<Self, CatalogError> {
        let types: Vec<SchemaRecordType> = serde_json::from_str(json)?;
        let schema_type = types
            .into_iter()
            .find(|t| t.name == record_type)
            .ok_or_else(|| CatalogError::RecordTypeNotFound {
                record_type: record_type.to_string(),
            })?;

        let mut schema = SchemaContext::new();
        for prop in &schema_type.properties {
            match DataType::from_schema_name(&prop.data_type) {
                Some(dt) => schema.add_property(&prop.name, dt),
                // Kinds the intake never writes are irrelevant here.
                None => debug!(property = %prop.name, data_type = %prop.data_type, "skipping property kind"),
            }
        }

        let options = |property: &'static str| -> Result<Vec<String>, CatalogError> {
            let prop = schema_type
                .properties
                .iter()
                .find(|p| p.name == property)
                .ok_or_else(|| CatalogError::PropertyNotFound {
                    record_type: record_type.to_string(),
                    property,
                })?;
            if DataType::from_schema_name(&prop.data_type) != Some(DataType::Enum) {
                return Err(CatalogError::NotEnum {
                    property,
                    data_type: prop.data_type.clone(),
                });
            }
            check_options(property, &prop.enum_options)?;
            Ok(prop.enum_options.clone())
        };

        let mineral_types = options(names::TYPE)?;
        let statuses = options(names::STATUS)?;
        let container_types = options(names::CONTAINER)?;
        let origins = options(names::ORIGIN)?;
        let zones = options(names::ZONE)?;

        for (name, opts) in [
            (names::TYPE, &mineral_types),
            (names::STATUS, &statuses),
            (names::CONTAINER, &container_types),
            (names::ORIGIN, &origins),
            (names::ZONE, &zones),
        ] {
            schema.add_options(name, opts.iter().cloned());
        }

        let catalog = Self {
            record_type: record_type.to_string(),
            mineral_types,
            statuses,
            container_types,
            origins,
            zones,
            schema,
            rules,
        };
        catalog.check_rules()?;
        Ok(catalog)
    }

    /// Replaces the processing rules, checking them against the type list.
    pub fn with_rules(mut self, rules: ProcessingRules) -> Result<Self, CatalogError> {
        self.rules = rules;
        self.check_rules()?;
        Ok(self)
    }

    fn check_rules(&self) -> Result<(), CatalogError> {
        for name in self.rules.referenced_types() {
            if !self.mineral_types.iter().any(|t| t == name) {
                return Err(CatalogError::UnknownMineralType {
                    mineral_type: name.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// All mineral types, in schema order.
    pub fn mineral_types(&self) -> &[String] {
        &self.mineral_types
    }

    /// Mineral types that may start a chain (not processed), in schema order.
    pub fn raw_types(&self) -> Vec<&str> {
        self.mineral_types
            .iter()
            .map(String::as_str)
            .filter(|t| !self.rules.is_processed(t))
            .collect()
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn container_types(&self) -> &[String] {
        &self.container_types
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn rules(&self) -> &ProcessingRules {
        &self.rules
    }

    /// Per-property kinds and options for batch validation.
    pub fn schema_context(&self) -> &SchemaContext {
        &self.schema
    }
}

fn check_options(property: &'static str, options: &[String]) -> Result<(), CatalogError> {
    if options.is_empty() {
        return Err(CatalogError::EmptyOptions { property });
    }
    let mut seen = FxHashSet::with_capacity_and_hasher(options.len(), Default::default());
    for option in options {
        if !seen.insert(option.as_str()) {
            return Err(CatalogError::DuplicateOption {
                property,
                option: option.clone(),
            });
        }
    }
    Ok(())
}
