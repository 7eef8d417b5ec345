use futures::future::try_join_all;
use tracing::{info, instrument};

use crate::error::Result;
use crate::generators::{build_generators, GeneratorContext};
use crate::models::{CertificateKind, CertificatePayload, TestRecord};

/// Orchestrates one certificate generation: initialise every fragment
/// generator with the requested kind, dispatch them concurrently over the
/// immutable test record, and merge their fragments into one payload.
pub struct CertificateAssembler {
    context: GeneratorContext,
}

impl CertificateAssembler {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    /// A fatal error in any generator fails the whole assembly; callers get
    /// either a complete payload or the first fatal failure encountered.
    #[instrument(skip(self, record), fields(
        system_number = %record.system_number,
        vehicle_type = ?record.vehicle_type,
        kind = ?kind
    ))]
    pub async fn assemble(
        &self,
        kind: CertificateKind,
        bilingual_requested: bool,
        record: &TestRecord,
    ) -> Result<CertificatePayload> {
        let generators = build_generators(&self.context, kind, bilingual_requested);
        let fragment_sets =
            try_join_all(generators.iter().map(|generator| generator.generate(record))).await?;

        let mut payload = CertificatePayload::default();
        let mut merged = 0usize;
        for fragment in fragment_sets.into_iter().flatten() {
            payload.apply(fragment);
            merged += 1;
        }

        info!(fragments = merged, "Certificate payload assembled");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CertificateError;
    use crate::generators::test_fixtures::{context, record, tech_record_responses};
    use crate::models::{TestOutcome, VehicleCategory};
    use crate::remote::test_support::MockInvoker;
    use crate::remote::FN_TEST_RESULTS;

    #[tokio::test]
    async fn hgv_pass_assembles_data_without_fail_sections() {
        let invoker = tech_record_responses(MockInvoker::new()).respond(
            FN_TEST_RESULTS,
            "/test-results/SYS1",
            200,
            "[]",
        );
        let assembler = CertificateAssembler::new(context(invoker));

        let payload = assembler
            .assemble(
                CertificateKind::Pass,
                false,
                &record(VehicleCategory::Hgv, TestOutcome::Pass),
            )
            .await
            .unwrap();

        let data = payload.data.expect("DATA section populated");
        assert!(payload.fail_data.is_none());
        assert!(data.defects.dangerous_defects.is_none());
        assert!(data.defects.major_defects.is_none());
        assert!(data.defects.prs_defects.is_none());
        // Always-on generators contribute alongside the pass/fail one.
        assert_eq!(payload.watermark.as_deref(), Some("NOT VALID"));
        let signature = payload.signature.expect("signature block present");
        assert!(signature.image_data.is_none());
        assert!(payload.reissue.is_none());
        // Sections owned by inapplicable generators stay absent.
        assert!(payload.rwt_data.is_none());
        assert!(payload.adr_data.is_none());
        assert!(payload.iva_data.is_none());
        assert!(payload.msva_data.is_none());
    }

    #[tokio::test]
    async fn a_fatal_generator_error_fails_the_whole_assembly() {
        // No technical-record responses registered: resolution is fatal for
        // the pass/fail generator.
        let assembler = CertificateAssembler::new(context(MockInvoker::new()));
        let result = assembler
            .assemble(
                CertificateKind::Pass,
                false,
                &record(VehicleCategory::Hgv, TestOutcome::Pass),
            )
            .await;
        assert!(matches!(
            result,
            Err(CertificateError::TransientUpstream(_))
        ));
    }

    #[tokio::test]
    async fn absent_sections_are_omitted_from_the_serialized_payload() {
        let invoker = tech_record_responses(MockInvoker::new()).respond(
            FN_TEST_RESULTS,
            "/test-results/SYS1",
            200,
            "[]",
        );
        let assembler = CertificateAssembler::new(context(invoker));
        let payload = assembler
            .assemble(
                CertificateKind::Pass,
                false,
                &record(VehicleCategory::Hgv, TestOutcome::Pass),
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert!(keys.iter().any(|k| *k == "DATA"));
        assert!(!keys.iter().any(|k| *k == "FAIL_DATA"));
        assert!(!keys.iter().any(|k| *k == "RWT_DATA"));
        // Empty defect buckets serialize away inside DATA.
        assert!(json["DATA"].get("DangerousDefects").is_none());
    }
}
