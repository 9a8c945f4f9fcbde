//! Mineral processing rules: which types are processed products and which
//! types a container of a given type may be split or refined into.

use lazy_static::lazy_static;
use rustc_hash::{FxHashMap, FxHashSet};

lazy_static! {
    static ref DEFAULT_RULES: ProcessingRules = ProcessingRules::new(
        [
            "Coltan Concentrate",
            "Gold Concentrate",
            "Gold Dore",
            "Refined Gold",
            "Tantalum",
        ],
        [
            ("Coltan Ore", &["Coltan Concentrate"][..]),
            ("Coltan Concentrate", &["Tantalum"][..]),
            ("Gold Ore", &["Gold Concentrate"][..]),
            ("Gold Dore", &["Refined Gold"][..]),
        ],
    );
}

/// Processed-type set and parent → child type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRules {
    processed: FxHashSet<String>,
    children: FxHashMap<String, Vec<String>>,
}

impl ProcessingRules {
    /// Builds rules from a processed-type list and a child mapping.
    pub fn new<'a>(
        processed: impl IntoIterator<Item = &'a str>,
        children: impl IntoIterator<Item = (&'a str, &'a [&'a str])>,
    ) -> Self {
        Self {
            processed: processed.into_iter().map(str::to_string).collect(),
            children: children
                .into_iter()
                .map(|(parent, kids)| {
                    (parent.to_string(), kids.iter().map(|k| k.to_string()).collect())
                })
                .collect(),
        }
    }

    /// Returns whether a type is a processed product (never a root selection).
    pub fn is_processed(&self, mineral_type: &str) -> bool {
        self.processed.contains(mineral_type)
    }

    /// Returns the permitted child types, empty when the type has no entry.
    pub fn child_types(&self, mineral_type: &str) -> &[String] {
        self.children
            .get(mineral_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every type name the rules mention.
    pub(crate) fn referenced_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.processed
            .iter()
            .chain(self.children.keys())
            .chain(self.children.values().flatten())
            .map(String::as_str)
    }
}

impl Default for ProcessingRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}
