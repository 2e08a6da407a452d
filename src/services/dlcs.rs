//! DLCS skeleton manifests

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::MetadataEntry,
};

/// Source of skeleton IIIF manifests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_manifest(&self, dlcs_id: &str) -> AppResult<Value>;
}

pub struct DlcsClient {
    http: reqwest::Client,
    base_url: String,
}

impl DlcsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for DlcsClient {
    async fn fetch_manifest(&self, dlcs_id: &str) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, dlcs_id);
        tracing::debug!("Fetching manifest {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "DLCS returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(response.json().await?)
    }
}

/// Assign label and metadata to a skeleton manifest and strip what the
/// viewer should not see: the legacy image `service` references on the
/// manifest and its canvases, and any canvas-level metadata.
pub fn prepare_manifest(
    manifest: &mut Value,
    title: &str,
    metadata: &[MetadataEntry],
) -> AppResult<()> {
    let object = manifest
        .as_object_mut()
        .ok_or_else(|| AppError::InvalidManifest("not a JSON object".to_string()))?;

    object.insert("label".to_string(), json!({ "none": [title] }));
    object.insert("metadata".to_string(), serde_json::to_value(metadata)?);
    object.remove("service");

    for canvas in canvases_mut(manifest) {
        if let Some(canvas) = canvas.as_object_mut() {
            canvas.remove("service");
            canvas.remove("metadata");
        }
    }
    Ok(())
}

/// Canvases of a Presentation 3 (`items`) or Presentation 2 (`sequences`) manifest
fn canvases_mut(manifest: &mut Value) -> Vec<&mut Value> {
    let mut canvases = Vec::new();
    let Some(object) = manifest.as_object_mut() else {
        return canvases;
    };
    for (key, value) in object.iter_mut() {
        let Value::Array(array) = value else {
            continue;
        };
        match key.as_str() {
            "items" => canvases.extend(array.iter_mut()),
            "sequences" => {
                for sequence in array.iter_mut() {
                    if let Some(Value::Array(items)) = sequence.get_mut("canvases") {
                        canvases.extend(items.iter_mut());
                    }
                }
            }
            _ => {}
        }
    }
    canvases
}
