use anyhow::Result;
use bundle_protocol::CompositeModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One independent bundle found while scanning
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct BundleReport {
    /// Directory the bundle lives in
    pub directory: String,
    /// File the bundle was resolved from
    pub anchor: String,
    /// Role the anchor was classified as
    pub role: String,
    pub model: CompositeModel,
}

pub fn render_reports(reports: &[BundleReport], pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(reports)?
    } else {
        serde_json::to_string(reports)?
    };
    Ok(text)
}

pub fn render_schema() -> Result<String> {
    let schema = schemars::schema_for!(Vec<BundleReport>);
    Ok(serde_json::to_string_pretty(&schema)?)
}
