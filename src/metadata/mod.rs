// src/metadata/mod.rs

//! Region discovery from the instance metadata service.
//!
//! - [`client`] holds `ImdsClient`, the HTTP implementation of
//!   [`MetadataSource`].
//! - [`document`] parses the identity document and extracts `region`.
//! - [`resolve_region`] ties the two together and applies the retry policy.

pub mod client;
pub mod document;

use std::future::Future;
use std::pin::Pin;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::MetadataSettings;
use crate::errors::{HostbootError, Result};
use crate::types::RegionId;

pub use client::ImdsClient;
pub use document::{parse_identity_document, parse_region, IdentityDocument};

/// Something that can hand back the raw metadata document body.
///
/// Implementations report transport problems (unreachable, timeout, bad
/// status) as [`HostbootError::MetadataUnavailable`]; they never parse.
pub trait MetadataSource: Send + Sync {
    fn fetch_document(&self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// Fetch the metadata document and return its `region` verbatim.
///
/// With the default `attempts = 1` this is a single request. Larger values
/// retry only `MetadataUnavailable`, waiting `retry_delay` in between; a
/// malformed document is never retried.
pub async fn resolve_region(
    source: &dyn MetadataSource,
    settings: &MetadataSettings,
) -> Result<RegionId> {
    let mut attempt: u32 = 1;

    loop {
        match source.fetch_document().await {
            Ok(body) => {
                let doc = parse_identity_document(&body)?;
                let region = RegionId::new(doc.region);
                info!(
                    region = %region,
                    attempt,
                    instance_id = doc.instance_id.as_deref().unwrap_or("-"),
                    availability_zone = doc.availability_zone.as_deref().unwrap_or("-"),
                    "resolved region from instance metadata"
                );
                return Ok(region);
            }
            Err(HostbootError::MetadataUnavailable(msg)) if attempt < settings.attempts => {
                warn!(
                    attempt,
                    attempts = settings.attempts,
                    error = %msg,
                    retry_in_ms = settings.retry_delay.as_millis() as u64,
                    "metadata fetch failed; retrying"
                );
                sleep(settings.retry_delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
