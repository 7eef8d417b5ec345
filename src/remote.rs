// certificate-generation-service/src/remote.rs
//
// Remote lookups backing payload assembly. One method per query, mirroring
// the upstream function surface. Only the defect-translation and
// test-station fetches carry the retry policy; both degrade to an empty
// result on exhaustion instead of failing the request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{error, instrument};

use crate::error::{CertificateError, Result};
use crate::invoke::{FunctionInvoker, InvocationRequest};
use crate::models::{
    CandidateRecord, DefectTranslation, HistoryRecord, TechnicalRecord, TestStation,
    TrailerRegistration,
};
use crate::retry::Retry;

pub const FN_DEFECTS: &str = "defects";
pub const FN_TEST_STATIONS: &str = "test-stations";
pub const FN_TRAILER_REGISTRATION: &str = "trailer-registration";
pub const FN_TEST_RESULTS: &str = "test-results";
pub const FN_TECH_RECORDS: &str = "tech-records";

#[derive(Clone)]
pub struct RemoteRepository {
    invoker: Arc<dyn FunctionInvoker>,
    retry: Retry,
}

impl RemoteRepository {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, retry: Retry) -> Self {
        Self { invoker, retry }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        function: &str,
        request: &InvocationRequest,
    ) -> Result<T> {
        let response = self.invoker.invoke(function, request).await?.validate()?;
        serde_json::from_str(&response.body).map_err(|e| {
            CertificateError::BadUpstreamData(format!("{function}: unparseable body: {e}"))
        })
    }

    /// Full defect translation table. Retried; an exhausted retry degrades
    /// to an empty table, which disables Welsh output for the request.
    #[instrument(skip(self))]
    pub async fn defect_translations(&self) -> Vec<DefectTranslation> {
        let request = InvocationRequest::get("/defects");
        match self
            .retry
            .run(FN_DEFECTS, || self.fetch::<Vec<DefectTranslation>>(FN_DEFECTS, &request))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Defect translation fetch exhausted retries, continuing without");
                Vec::new()
            }
        }
    }

    /// Station details for a P number. Retried; degrades to `None`.
    #[instrument(skip(self))]
    pub async fn test_station(&self, p_number: &str) -> Option<TestStation> {
        let request = InvocationRequest::get(format!("/test-stations/{p_number}"))
            .with_path_parameter("testStationPNumber", p_number);
        match self
            .retry
            .run(FN_TEST_STATIONS, || {
                self.fetch::<TestStation>(FN_TEST_STATIONS, &request)
            })
            .await
        {
            Ok(station) => Some(station),
            Err(e) => {
                error!(error = %e, p_number, "Test station fetch exhausted retries, continuing without");
                None
            }
        }
    }

    /// Trailer registration number for a VIN + make pair. Missing
    /// registration is expected for unregistered trailers, so any failure
    /// degrades to `None`.
    #[instrument(skip(self))]
    pub async fn trailer_registration(&self, vin: &str, make: &str) -> Option<TrailerRegistration> {
        let request = InvocationRequest::get(format!("/v1/trailers/{vin}"))
            .with_path_parameter("proxy", &format!("v1/trailers/{vin}"))
            .with_query_parameter("make", make);
        match self
            .fetch::<TrailerRegistration>(FN_TRAILER_REGISTRATION, &request)
            .await
        {
            Ok(registration) => Some(registration),
            Err(e) => {
                tracing::warn!(error = %e, vin, "No trailer registration resolved");
                None
            }
        }
    }

    /// Every test record held for a vehicle, any status.
    #[instrument(skip(self))]
    pub async fn test_history(&self, system_number: &str) -> Result<Vec<HistoryRecord>> {
        let request = InvocationRequest::get(format!("/test-results/{system_number}"))
            .with_path_parameter("systemNumber", system_number)
            .with_query_parameter("testStatus", "any");
        self.fetch(FN_TEST_RESULTS, &request).await
    }

    /// Candidate technical record versions for a vehicle identifier
    /// (system number, VIN, VRM or trailer id).
    #[instrument(skip(self))]
    pub async fn search_technical_records(&self, identifier: &str) -> Result<Vec<CandidateRecord>> {
        let request = InvocationRequest::get(format!("/v3/technical-records/search/{identifier}"))
            .with_path_parameter("searchIdentifier", identifier)
            .with_query_parameter("searchCriteria", "all");
        self.fetch(FN_TECH_RECORDS, &request).await
    }

    /// The full technical record for one candidate version.
    #[instrument(skip(self))]
    pub async fn technical_record(
        &self,
        system_number: &str,
        created_timestamp: &str,
    ) -> Result<TechnicalRecord> {
        let request = InvocationRequest::get(format!(
            "/v3/technical-records/{system_number}/{created_timestamp}"
        ))
        .with_path_parameter("systemNumber", system_number)
        .with_path_parameter("createdTimestamp", created_timestamp);
        self.fetch(FN_TECH_RECORDS, &request).await
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::MockInvoker;
    use super::*;

    fn repository(invoker: MockInvoker) -> RemoteRepository {
        RemoteRepository::new(Arc::new(invoker), Retry::new(3))
    }

    #[tokio::test]
    async fn defect_translations_degrade_to_empty_after_three_attempts() {
        let invoker = MockInvoker::new();
        let repo = RemoteRepository::new(Arc::new(invoker), Retry::new(3));
        let rows = repo.defect_translations().await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn defect_translations_parse_rows() {
        let body = r#"[{"imNumber": 1, "items": []}]"#;
        let repo = repository(MockInvoker::new().respond(FN_DEFECTS, "/defects", 200, body));
        let rows = repo.defect_translations().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].im_number, Some(1));
    }

    #[tokio::test]
    async fn test_station_retries_then_succeeds() {
        let body = r#"{"testStationPNumber": "P123", "testStationName": "Abshire-Kub"}"#;
        let invoker = MockInvoker::new()
            .respond(FN_TEST_STATIONS, "/test-stations/P123", 500, "{}")
            .respond(FN_TEST_STATIONS, "/test-stations/P123", 200, body);
        let repo = repository(invoker);
        let station = repo.test_station("P123").await.expect("station resolved");
        assert_eq!(station.test_station_name.as_deref(), Some("Abshire-Kub"));
    }

    #[tokio::test]
    async fn trailer_registration_soft_fails_on_error_status() {
        let invoker =
            MockInvoker::new().respond(FN_TRAILER_REGISTRATION, "/v1/trailers/VIN1", 404, "{}");
        let repo = repository(invoker);
        assert!(repo.trailer_registration("VIN1", "Schmitz").await.is_none());
    }

    #[tokio::test]
    async fn search_propagates_bad_upstream_data() {
        let invoker = MockInvoker::new().respond(
            FN_TECH_RECORDS,
            "/v3/technical-records/search/XYZ",
            200,
            "not-json",
        );
        let repo = repository(invoker);
        let result = repo.search_technical_records("XYZ").await;
        assert!(matches!(result, Err(CertificateError::BadUpstreamData(_))));
    }
}
