// certificate-generation-service/src/tech_records.rs

use tracing::instrument;

use crate::error::{CertificateError, Result};
use crate::models::{CandidateRecord, TechnicalRecord};
use crate::remote::RemoteRepository;

const STATUS_CURRENT: &str = "current";
const STATUS_PROVISIONAL: &str = "provisional";

/// Resolves the technical record representing a vehicle's current certified
/// state from the candidate versions the search endpoint returns.
#[derive(Clone)]
pub struct TechRecordResolver {
    repository: RemoteRepository,
}

impl TechRecordResolver {
    pub fn new(repository: RemoteRepository) -> Self {
        Self { repository }
    }

    /// Fetch candidates for `identifier` and resolve exactly one full
    /// record. Fails with `NotFound` when the search yields nothing usable.
    #[instrument(skip(self))]
    pub async fn resolve(&self, identifier: &str) -> Result<TechnicalRecord> {
        let candidates = self.repository.search_technical_records(identifier).await?;
        let chosen = select_candidate(&candidates).ok_or_else(|| {
            CertificateError::NotFound(format!("no technical record for {identifier}"))
        })?;

        self.repository
            .technical_record(
                &chosen.system_number,
                &chosen.created_timestamp.to_rfc3339(),
            )
            .await
    }
}

/// Partition candidates into current and provisional buckets preserving
/// search-result order, then pick:
/// - the first current candidate, when any exist;
/// - else the single provisional candidate, when exactly one exists;
/// - else the provisional candidate at index 1. This tie-break has no
///   stated rationale upstream and is preserved as observed behaviour
///   (see DESIGN.md) rather than corrected.
pub fn select_candidate(candidates: &[CandidateRecord]) -> Option<&CandidateRecord> {
    let current: Vec<&CandidateRecord> = candidates
        .iter()
        .filter(|c| c.status_code == STATUS_CURRENT)
        .collect();
    let provisional: Vec<&CandidateRecord> = candidates
        .iter()
        .filter(|c| c.status_code == STATUS_PROVISIONAL)
        .collect();

    if let Some(first_current) = current.first() {
        return Some(first_current);
    }
    if provisional.len() == 1 {
        return Some(provisional[0]);
    }
    provisional.get(1).copied()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::remote::test_support::MockInvoker;
    use crate::remote::FN_TECH_RECORDS;
    use crate::retry::Retry;

    fn candidate(system_number: &str, status_code: &str, day: u32) -> CandidateRecord {
        CandidateRecord {
            system_number: system_number.to_string(),
            created_timestamp: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            status_code: status_code.to_string(),
        }
    }

    #[test]
    fn first_current_wins_regardless_of_provisionals() {
        let candidates = vec![
            candidate("A", "provisional", 1),
            candidate("B", "current", 2),
            candidate("C", "current", 3),
        ];
        let chosen = select_candidate(&candidates).unwrap();
        assert_eq!(chosen.system_number, "B");
    }

    #[test]
    fn single_provisional_is_resolved() {
        let candidates = vec![candidate("A", "archived", 1), candidate("B", "provisional", 2)];
        let chosen = select_candidate(&candidates).unwrap();
        assert_eq!(chosen.system_number, "B");
    }

    // Regression pin for the observed multi-provisional tie-break: the
    // candidate at provisional index 1 is resolved, not index 0.
    #[test]
    fn two_provisionals_resolve_the_second() {
        let candidates = vec![candidate("A", "provisional", 1), candidate("B", "provisional", 2)];
        let chosen = select_candidate(&candidates).unwrap();
        assert_eq!(chosen.system_number, "B");
    }

    #[test]
    fn three_provisionals_still_resolve_index_one() {
        let candidates = vec![
            candidate("A", "provisional", 1),
            candidate("B", "provisional", 2),
            candidate("C", "provisional", 3),
        ];
        let chosen = select_candidate(&candidates).unwrap();
        assert_eq!(chosen.system_number, "B");
    }

    #[test]
    fn no_usable_candidate_yields_none() {
        assert!(select_candidate(&[]).is_none());
        assert!(select_candidate(&[candidate("A", "archived", 1)]).is_none());
    }

    #[tokio::test]
    async fn resolve_fetches_the_chosen_full_record() {
        let created = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let search_body = serde_json::json!([
            { "systemNumber": "SYS1", "createdTimestamp": "2024-03-01T12:00:00Z", "statusCode": "provisional" },
            { "systemNumber": "SYS2", "createdTimestamp": created.to_rfc3339(), "statusCode": "current" },
        ])
        .to_string();
        let record_body = r#"{"make": "DAF", "model": "XF"}"#;

        let invoker = MockInvoker::new()
            .respond(
                FN_TECH_RECORDS,
                "/v3/technical-records/search/VIN123",
                200,
                &search_body,
            )
            .respond(
                FN_TECH_RECORDS,
                &format!("/v3/technical-records/SYS2/{}", created.to_rfc3339()),
                200,
                record_body,
            );

        let resolver = TechRecordResolver::new(RemoteRepository::new(
            Arc::new(invoker),
            Retry::new(3),
        ));
        let record = resolver.resolve("VIN123").await.unwrap();
        assert_eq!(record.make.as_deref(), Some("DAF"));
    }

    #[tokio::test]
    async fn resolve_maps_empty_search_to_not_found() {
        let invoker = MockInvoker::new().respond(
            FN_TECH_RECORDS,
            "/v3/technical-records/search/GHOST",
            200,
            "[]",
        );
        let resolver = TechRecordResolver::new(RemoteRepository::new(
            Arc::new(invoker),
            Retry::new(3),
        ));
        let result = resolver.resolve("GHOST").await;
        assert!(matches!(result, Err(CertificateError::NotFound(_))));
    }
}
