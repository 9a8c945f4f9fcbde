//! Intake configuration.

use serde::Deserialize;

/// Settings for the form controller.
///
/// Every field has a default, so `{}` is a valid configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntakeConfig {
    /// Record type name written into create payloads.
    pub record_type: String,
    /// Whether the submitter should sign the batch.
    pub sign: bool,
    /// Route prefix for the asset page shown after a successful submit.
    pub asset_route: String,
    /// Whether batches are checked against the catalog schema before submit.
    pub strict: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            record_type: "mineral".to_string(),
            sign: true,
            asset_route: "/assets".to_string(),
            strict: true,
        }
    }
}

impl IntakeConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Route of an asset's page.
    pub fn asset_path(&self, record_id: &str) -> String {
        format!("{}/{}", self.asset_route.trim_end_matches('/'), record_id)
    }
}
