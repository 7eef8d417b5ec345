// certificate-generation-service/src/storage.rs

use anyhow::Context;
use async_trait::async_trait;
use google_cloud_storage::client::{Client as GcsClient, ClientConfig};
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use tracing::instrument;

use crate::error::{CertificateError, Result};

/// Object storage read used for tester signature images. Absence or any
/// download error is a soft miss at the caller, never a hard failure.
#[async_trait]
pub trait SignatureStore: Send + Sync {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct GcsSignatureStore {
    client: GcsClient,
}

impl GcsSignatureStore {
    /// Initialise from the mounted GCS service account key.
    pub async fn new() -> anyhow::Result<Self> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .context("Failed to initialise GCS client with service account")?;
        Ok(Self {
            client: GcsClient::new(config),
        })
    }
}

#[async_trait]
impl SignatureStore for GcsSignatureStore {
    #[instrument(skip(self))]
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.client
            .download_object(
                &GetObjectRequest {
                    bucket: bucket.to_string(),
                    object: key.to_string(),
                    ..Default::default()
                },
                &Range::default(),
            )
            .await
            .map_err(|e| CertificateError::Storage(format!("{bucket}/{key}: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::SignatureStore;
    use crate::error::{CertificateError, Result};

    /// In-memory store keyed by `bucket/key`.
    #[derive(Default)]
    pub struct MemorySignatureStore {
        objects: HashMap<String, Vec<u8>>,
    }

    impl MemorySignatureStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_object(mut self, bucket: &str, key: &str, data: &[u8]) -> Self {
            self.objects.insert(format!("{bucket}/{key}"), data.to_vec());
            self
        }
    }

    #[async_trait]
    impl SignatureStore for MemorySignatureStore {
        async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            self.objects
                .get(&format!("{bucket}/{key}"))
                .cloned()
                .ok_or_else(|| CertificateError::Storage(format!("no object {bucket}/{key}")))
        }
    }
}
