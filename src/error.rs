// certificate-generation-service/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CertificateError>;

#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad upstream data: {0}")]
    BadUpstreamData(String),

    #[error("Transient upstream failure: {0}")]
    TransientUpstream(String),

    #[error("Invocation error: {0}")]
    Invoke(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl CertificateError {
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: match self {
                CertificateError::NotFound(_) => "not_found",
                CertificateError::BadUpstreamData(_) => "bad_upstream_data",
                CertificateError::TransientUpstream(_) => "transient_upstream",
                CertificateError::Invoke(_) => "invoke_error",
                CertificateError::Serialization(_) => "serialization_error",
                CertificateError::Storage(_) => "storage_error",
                CertificateError::MissingField(_) => "missing_field",
                CertificateError::GenerationFailed(_) => "generation_failed",
            }
            .to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}
