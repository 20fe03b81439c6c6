// src/metadata/document.rs

use serde::Deserialize;

use crate::errors::{HostbootError, Result};
use crate::types::RegionId;

/// The parts of the instance identity document we care about.
///
/// Only `region` is required; the rest is logged when present.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocument {
    pub region: String,

    #[serde(default)]
    pub instance_id: Option<String>,

    #[serde(default)]
    pub availability_zone: Option<String>,
}

/// Parse a metadata body into an [`IdentityDocument`].
///
/// Invalid JSON, a non-object document, a missing or non-string `region`,
/// and an empty `region` are all [`HostbootError::MetadataParse`].
pub fn parse_identity_document(body: &str) -> Result<IdentityDocument> {
    let doc: IdentityDocument = serde_json::from_str(body)
        .map_err(|e| HostbootError::MetadataParse(format!("identity document: {e}")))?;

    if doc.region.is_empty() {
        return Err(HostbootError::MetadataParse(
            "identity document: `region` is empty".to_string(),
        ));
    }

    Ok(doc)
}

/// Extract the `region` field, unmodified.
pub fn parse_region(body: &str) -> Result<RegionId> {
    parse_identity_document(body).map(|doc| RegionId::new(doc.region))
}
