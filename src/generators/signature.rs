//! Tester signature block.
//!
//! Always runs. The image is keyed by the creator id, falling back to the
//! tester's staff id; any download failure yields a null image rather than
//! aborting the payload.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use tracing::warn;

use crate::error::Result;
use crate::generators::{FragmentGenerator, GeneratorContext};
use crate::models::{PayloadFragment, Signature, TestRecord};

pub struct SignatureGenerator {
    context: GeneratorContext,
}

impl SignatureGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FragmentGenerator for SignatureGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        let signer = record
            .created_by_id
            .as_deref()
            .unwrap_or(&record.tester_staff_id);
        let key = format!("{signer}.png");

        let image_data = match self
            .context
            .storage
            .download(&self.context.signature_bucket, &key)
            .await
        {
            Ok(bytes) => Some(general_purpose::STANDARD.encode(bytes)),
            Err(e) => {
                warn!(signer, error = %e, "No signature image available");
                None
            }
        };

        Ok(vec![PayloadFragment::Signature(Signature {
            image_type: "png".to_string(),
            image_data,
        })])
    }
}
