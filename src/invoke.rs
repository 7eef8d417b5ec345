//! Remote function invocation.
//!
//! Lookups (defect translations, test stations, trailer registration, test
//! history, technical records) live behind remote functions that accept an
//! HTTP-shaped envelope and answer with a status code and a JSON body.
//! [`FunctionInvoker`] is the transport seam; [`HttpFunctionInvoker`] posts
//! the envelope over HTTP.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CertificateError, Result};

/// HTTP request timeout for a single invocation attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub http_method: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
}

impl InvocationRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            http_method: "GET".to_string(),
            path: path.into(),
            path_parameters: None,
            query_string_parameters: None,
        }
    }

    pub fn with_path_parameter(mut self, key: &str, value: &str) -> Self {
        self.path_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_query_parameter(mut self, key: &str, value: &str) -> Self {
        self.query_string_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    #[serde(default)]
    pub body: String,
}

impl InvocationResponse {
    /// Reject error statuses and empty payloads before anyone parses the
    /// body.
    pub fn validate(self) -> Result<Self> {
        if self.status_code >= 400 {
            return Err(CertificateError::BadUpstreamData(format!(
                "remote function returned HTTP {}",
                self.status_code
            )));
        }
        if self.body.trim().is_empty() {
            return Err(CertificateError::BadUpstreamData(
                "remote function returned an empty body".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Transport seam for remote function invocation. Tests supply an invoker
/// answering from canned JSON.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(
        &self,
        function: &str,
        request: &InvocationRequest,
    ) -> Result<InvocationResponse>;
}

/// Production invoker: serializes the envelope and POSTs it to the endpoint
/// registered for the named function.
pub struct HttpFunctionInvoker {
    client: reqwest::Client,
    endpoints: BTreeMap<String, String>,
}

impl HttpFunctionInvoker {
    pub fn new(endpoints: BTreeMap<String, String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CertificateError::Invoke(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoints })
    }
}

#[async_trait]
impl FunctionInvoker for HttpFunctionInvoker {
    async fn invoke(
        &self,
        function: &str,
        request: &InvocationRequest,
    ) -> Result<InvocationResponse> {
        let endpoint = self.endpoints.get(function).ok_or_else(|| {
            CertificateError::Invoke(format!("no endpoint configured for function {function}"))
        })?;

        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CertificateError::TransientUpstream(format!("{function}: {e}")))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CertificateError::TransientUpstream(format!("{function}: {e}")))?;

        Ok(InvocationResponse { status_code, body })
    }
}
