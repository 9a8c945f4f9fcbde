//! Mineral type resolution against the processing chain.

use tracing::debug;

use crate::catalog::Catalog;
use crate::form::FormState;
use crate::model::ParentRecord;

/// Decides which mineral types a new container may take.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> TypeResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Returns the selectable types.
    ///
    /// Without a parent these are the raw types in catalog order. With a
    /// parent they are the permitted children of the parent's type, which is
    /// empty for terminal or unknown types.
    pub fn selectable_types(&self, parent: Option<&ParentRecord>) -> Vec<&'c str> {
        let Some(parent) = parent else {
            return self.catalog.raw_types();
        };
        let parent_type = parent.mineral_type().unwrap_or_default();
        let children: Vec<&'c str> = self
            .catalog
            .rules()
            .child_types(&parent_type)
            .iter()
            .map(String::as_str)
            .collect();
        if children.is_empty() {
            debug!(parent = %parent.record_id, parent_type = %parent_type, "parent type has no child types");
        }
        children
    }

    /// Resolves the selectable types for a form and mirrors the inherited
    /// fields.
    ///
    /// With a parent attached, `origin` and `zone` are overwritten with the
    /// parent's values on every call, discarding local edits. A value the
    /// parent lacks clears the field.
    pub fn resolve(&self, form: &mut FormState) -> Vec<&'c str> {
        if let Some(parent) = &form.parent {
            let origin = parent.origin().unwrap_or_default();
            let zone = parent.zone().unwrap_or_default();
            form.origin = origin;
            form.zone = zone;
        }
        self.selectable_types(form.parent.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::catalog::ProcessingRules;
    use crate::model::AssetRecord;
    use proptest::prelude::*;
    use serde_json::json;

    fn parent(props: serde_json::Value) -> ParentRecord {
        let record: AssetRecord = serde_json::from_value(json!({
            "recordId": "P-1",
            "recordType": "mineral",
            "properties": props,
        }))
        .unwrap();
        record.into()
    }

    #[test]
    fn test_no_parent_gives_raw_types() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);
        assert_eq!(
            resolver.selectable_types(None),
            vec!["Coltan Ore", "Gold Ore", "Cassiterite Ore", "Wolframite Ore"]
        );
    }

    #[test]
    fn test_parent_gives_child_types() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);

        let coltan = parent(json!([{ "name": "type", "value": "Coltan Ore" }]));
        assert_eq!(resolver.selectable_types(Some(&coltan)), vec!["Coltan Concentrate"]);

        let dore = parent(json!([{ "name": "type", "value": "Gold Dore" }]));
        assert_eq!(resolver.selectable_types(Some(&dore)), vec!["Refined Gold"]);
    }

    #[test]
    fn test_terminal_or_missing_parent_type_gives_nothing() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);

        let tantalum = parent(json!([{ "name": "type", "value": "Tantalum" }]));
        assert!(resolver.selectable_types(Some(&tantalum)).is_empty());

        let untyped = parent(json!([{ "name": "tag", "value": "T" }]));
        assert!(resolver.selectable_types(Some(&untyped)).is_empty());
    }

    #[test]
    fn test_resolve_mirrors_origin_and_zone() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);

        let mut form = FormState::new();
        form.origin = "Uganda".into();
        form.zone = "Z3".into();
        form.parent = Some(parent(json!([
            { "name": "type", "value": "Gold Ore" },
            { "name": "origin", "value": "DRC" },
            { "name": "zone", "value": "Z1" }
        ])));

        assert_eq!(resolver.resolve(&mut form), vec!["Gold Concentrate"]);
        assert_eq!(form.origin, "DRC");
        assert_eq!(form.zone, "Z1");

        // Local edits are overwritten again on the next pass.
        form.origin = "Rwanda".into();
        resolver.resolve(&mut form);
        assert_eq!(form.origin, "DRC");
    }

    #[test]
    fn test_resolve_without_parent_keeps_edits() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);

        let mut form = FormState::new();
        form.origin = "Uganda".into();
        resolver.resolve(&mut form);
        assert_eq!(form.origin, "Uganda");
    }

    #[test]
    fn test_resolve_clears_fields_parent_lacks() {
        let catalog = sample_catalog();
        let resolver = TypeResolver::new(&catalog);

        let mut form = FormState::new();
        form.zone = "Z2".into();
        form.parent = Some(parent(json!([{ "name": "origin", "value": "DRC" }])));
        resolver.resolve(&mut form);
        assert_eq!(form.origin, "DRC");
        assert_eq!(form.zone, "");
    }

    fn catalog_of(types: &[String], processed: &[String]) -> Catalog {
        let schema = json!([{
            "name": "mineral",
            "properties": [
                { "name": "type", "dataType": "ENUM", "enumOptions": types },
                { "name": "status", "dataType": "ENUM", "enumOptions": ["S"] },
                { "name": "container", "dataType": "ENUM", "enumOptions": ["Bag"] },
                { "name": "origin", "dataType": "ENUM", "enumOptions": ["DRC"] },
                { "name": "zone", "dataType": "ENUM", "enumOptions": ["Z1"] }
            ]
        }]);
        let rules = ProcessingRules::new(processed.iter().map(String::as_str), std::iter::empty());
        Catalog::from_schema_json_with_rules(&schema.to_string(), "mineral", rules).unwrap()
    }

    proptest! {
        #[test]
        fn prop_raw_types_are_catalog_minus_processed(
            types in proptest::collection::btree_set("[A-Z][a-z]{1,8}", 1..12),
            mask in proptest::collection::vec(any::<bool>(), 12),
        ) {
            let types: Vec<String> = types.into_iter().collect();
            let processed: Vec<String> = types
                .iter()
                .zip(&mask)
                .filter(|(_, m)| **m)
                .map(|(t, _)| t.clone())
                .collect();
            let catalog = catalog_of(&types, &processed);
            let resolver = TypeResolver::new(&catalog);

            let expected: Vec<&str> = types
                .iter()
                .map(String::as_str)
                .filter(|t| !processed.iter().any(|p| p == *t))
                .collect();
            prop_assert_eq!(resolver.selectable_types(None), expected);
        }

        #[test]
        fn prop_parent_fields_always_mirrored(
            origin in "[A-Za-z]{0,10}",
            zone in "[A-Za-z0-9]{0,4}",
            local_origin in "[A-Za-z]{0,10}",
            local_zone in "[A-Za-z0-9]{0,4}",
        ) {
            let catalog = sample_catalog();
            let resolver = TypeResolver::new(&catalog);
            let mut form = FormState::new();
            form.origin = local_origin;
            form.zone = local_zone;
            form.parent = Some(parent(json!([
                { "name": "type", "value": "Coltan Ore" },
                { "name": "origin", "value": origin },
                { "name": "zone", "value": zone }
            ])));

            prop_assert_eq!(resolver.resolve(&mut form), vec!["Coltan Concentrate"]);
            prop_assert_eq!(&form.origin, &origin);
            prop_assert_eq!(&form.zone, &zone);
        }
    }
}
