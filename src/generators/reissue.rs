//! Reissue block for replacement certificates.
//!
//! Always runs: when the vehicle's history already contains a test with the
//! same test type code, this generation is a replacement of an earlier
//! certificate and the payload says so.

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::generators::{format_date, FragmentGenerator, GeneratorContext};
use crate::models::{PayloadFragment, Reissue, TestRecord};

const REISSUE_REASON: &str = "Replacement";

pub struct ReissueGenerator {
    context: GeneratorContext,
}

impl ReissueGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FragmentGenerator for ReissueGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        let Some(current_code) = record.test_type.test_type_code.as_deref() else {
            return Ok(Vec::new());
        };

        // History is advisory here; a failed lookup means no reissue block,
        // not a failed payload.
        let history = match self
            .context
            .repository
            .test_history(&record.system_number)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Test history unavailable, skipping reissue check");
                return Ok(Vec::new());
            }
        };

        let reissued = history.iter().any(|prior| {
            prior
                .test_types
                .iter()
                .any(|t| t.test_type_code.as_deref() == Some(current_code))
        });
        if !reissued {
            return Ok(Vec::new());
        }

        Ok(vec![PayloadFragment::Reissue(Reissue {
            reason: REISSUE_REASON.to_string(),
            issuer: record.created_by_name.clone(),
            date: record.created_at.as_ref().map(format_date),
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_fixtures::{context_with, record};
    use crate::models::{TestOutcome, VehicleCategory};
    use crate::remote::test_support::MockInvoker;
    use crate::remote::FN_TEST_RESULTS;

    const HISTORY_WITH_MATCHING_CODE: &str = r#"[{
        "systemNumber": "SYS1",
        "testStatus": "submitted",
        "testEndTimestamp": "2023-06-15T10:00:00Z",
        "testTypes": [{"testTypeCode": "aas", "testResult": "pass"}]
    }]"#;

    #[tokio::test]
    async fn matching_historical_code_emits_a_reissue_block() {
        let invoker = MockInvoker::new().respond(
            FN_TEST_RESULTS,
            "/test-results/SYS1",
            200,
            HISTORY_WITH_MATCHING_CODE,
        );
        let generator = context_with(invoker, ReissueGenerator::new);

        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();
        let PayloadFragment::Reissue(reissue) = &fragments[0] else {
            panic!("expected a reissue fragment");
        };
        assert_eq!(reissue.reason, "Replacement");
        assert_eq!(reissue.issuer.as_deref(), Some("John Smith"));
        assert_eq!(reissue.date.as_deref(), Some("15.06.2024"));
    }

    #[tokio::test]
    async fn unrelated_history_emits_nothing() {
        let invoker = MockInvoker::new().respond(
            FN_TEST_RESULTS,
            "/test-results/SYS1",
            200,
            r#"[{
                "systemNumber": "SYS1",
                "testStatus": "submitted",
                "testEndTimestamp": "2023-06-15T10:00:00Z",
                "testTypes": [{"testTypeCode": "rwt", "testResult": "pass"}]
            }]"#,
        );
        let generator = context_with(invoker, ReissueGenerator::new);
        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();
        assert!(fragments.is_empty());
    }

    #[tokio::test]
    async fn unavailable_history_is_tolerated() {
        let generator = context_with(MockInvoker::new(), ReissueGenerator::new);
        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();
        assert!(fragments.is_empty());
    }
}
