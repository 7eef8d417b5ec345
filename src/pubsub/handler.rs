// certificate-generation-service/src/pubsub/handler.rs

use tracing::{error, info};

use crate::assembly::CertificateAssembler;
use crate::config::DocumentNames;
use crate::models::{CertificateGenerationRequest, CertificateGenerationResponse};

pub struct MessageHandler {
    assembler: CertificateAssembler,
    documents: DocumentNames,
}

impl MessageHandler {
    pub fn new(assembler: CertificateAssembler, documents: DocumentNames) -> Self {
        Self {
            assembler,
            documents,
        }
    }

    pub async fn handle_message(&self, data: &[u8]) -> CertificateGenerationResponse {
        // Parse the request
        let request: CertificateGenerationRequest = match serde_json::from_slice(data) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return CertificateGenerationResponse::error(
                    "unknown".to_string(),
                    format!("Invalid request format: {}", e),
                );
            }
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        info!(
            request_id = %request_id,
            kind = ?request.certificate_kind,
            bilingual = request.bilingual,
            system_number = %request.test_record.system_number,
            "Processing certificate generation request"
        );

        let payload = match self
            .assembler
            .assemble(
                request.certificate_kind,
                request.bilingual,
                &request.test_record,
            )
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                let details = e.to_error_response();
                error!(
                    error_type = %details.error_type,
                    "Failed to assemble certificate payload: {}", details.error
                );
                return CertificateGenerationResponse::error(request_id, details.error);
            }
        };

        let document_name = self
            .documents
            .document_name(request.certificate_kind, request.bilingual);

        info!(
            request_id = %request_id,
            document_name = %document_name,
            "Certificate payload generated"
        );

        CertificateGenerationResponse::success(request_id, Some(document_name), payload)
    }
}
