// src/upload/mod.rs

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use tracing::info;

/// Logical prefix every finalized CSV lands under in the bucket.
const UPLOAD_PREFIX: &str = "Traffic_Index";

/// Object-storage client for finalized harvest files, constructed once per
/// run. Upload failure never touches the local file.
pub struct Uploader {
    client: Client,
    bucket: String,
}

impl Uploader {
    pub async fn new(bucket: impl Into<String>) -> Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .context("initializing storage client")?;
        Ok(Self {
            client: Client::new(config),
            bucket: bucket.into(),
        })
    }

    /// Upload a finalized CSV as `Traffic_Index/<base name>` and return the
    /// object name.
    pub async fn upload_csv(&self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?;
        let object_name = format!("{}/{}", UPLOAD_PREFIX, name);

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        let upload_type = UploadType::Simple(Media::new(object_name.clone()));
        let request = UploadObjectRequest {
            bucket: self.bucket.clone(),
            ..Default::default()
        };
        self.client
            .upload_object(&request, data, &upload_type)
            .await
            .with_context(|| format!("uploading {} to bucket {}", object_name, self.bucket))?;

        info!(
            "uploaded {} to gs://{}/{}",
            name, self.bucket, object_name
        );
        Ok(object_name)
    }
}
