// certificate-generation-service/src/generators/mod.rs

mod adr;
mod iva;
mod msva;
mod pass_fail;
mod reissue;
mod roadworthiness;
mod signature;
mod watermark;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{CertificateKind, PayloadFragment, TestRecord};
use crate::remote::RemoteRepository;
use crate::storage::SignatureStore;
use crate::tech_records::TechRecordResolver;

pub use adr::AdrGenerator;
pub use iva::IvaGenerator;
pub use msva::MsvaGenerator;
pub use pass_fail::PassFailGenerator;
pub use reissue::ReissueGenerator;
pub use roadworthiness::RoadworthinessGenerator;
pub use signature::SignatureGenerator;
pub use watermark::WatermarkGenerator;

/// Produces one or more named payload sections for a test record, or
/// nothing when the requested certificate kind does not apply. Generators
/// never mutate shared input, which keeps the set safe to dispatch
/// concurrently.
#[async_trait]
pub trait FragmentGenerator: Send + Sync {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>>;
}

/// Shared collaborators every generator draws on.
#[derive(Clone)]
pub struct GeneratorContext {
    pub repository: RemoteRepository,
    pub resolver: TechRecordResolver,
    pub storage: Arc<dyn SignatureStore>,
    pub signature_bucket: String,
    /// Deployment branch; `prod` suppresses the watermark.
    pub branch: String,
}

/// The full generator set for one request. Every generator is initialised
/// with the requested kind and bilingual flag and guards itself.
pub fn build_generators(
    context: &GeneratorContext,
    kind: CertificateKind,
    bilingual_requested: bool,
) -> Vec<Box<dyn FragmentGenerator>> {
    vec![
        Box::new(PassFailGenerator::new(context.clone(), kind, bilingual_requested)),
        Box::new(RoadworthinessGenerator::new(context.clone(), kind)),
        Box::new(AdrGenerator::new(context.clone(), kind)),
        Box::new(IvaGenerator::new(context.clone(), kind)),
        Box::new(MsvaGenerator::new(context.clone(), kind)),
        Box::new(SignatureGenerator::new(context.clone())),
        Box::new(WatermarkGenerator::new(context.branch.clone())),
        Box::new(ReissueGenerator::new(context.clone())),
    ]
}

/// Certificate print date format.
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Single-vehicle-approval retests must be applied for within six months of
/// the original test, so the printed re-application date is six months
/// minus one day after the test start.
pub(crate) fn reapplication_date(test_start: &DateTime<Utc>) -> Option<String> {
    test_start
        .checked_add_months(chrono::Months::new(6))
        .and_then(|date| date.checked_sub_days(chrono::Days::new(1)))
        .map(|date| format_date(&date))
}

/// Custom defects for IVA/MSVA certificates; an empty list prints a single
/// placeholder row.
pub(crate) fn additional_defects(
    custom_defects: &[crate::models::CustomDefect],
) -> Vec<crate::models::DefectSummary> {
    if custom_defects.is_empty() {
        return vec![crate::models::DefectSummary {
            defect_name: Some("N/A".to_string()),
            defect_notes: Some("".to_string()),
        }];
    }
    custom_defects
        .iter()
        .map(|defect| crate::models::DefectSummary {
            defect_name: defect.defect_name.clone(),
            defect_notes: defect.defect_notes.clone(),
        })
        .collect()
}

pub(crate) fn required_standard_lines(
    standards: &[crate::models::RequiredStandard],
) -> Vec<String> {
    standards
        .iter()
        .map(|standard| {
            let mut line = standard.ref_calculation.clone().unwrap_or_default();
            if let Some(text) = &standard.required_standard {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(text);
            }
            line
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::models::{TestOutcome, TestType, VehicleCategory};
    use crate::remote::test_support::MockInvoker;
    use crate::remote::FN_TECH_RECORDS;
    use crate::retry::Retry;
    use crate::storage::test_support::MemorySignatureStore;

    /// A submitted annual test for fixture vehicle SYS1 / VIN123.
    pub fn record(vehicle_type: VehicleCategory, outcome: TestOutcome) -> TestRecord {
        TestRecord {
            system_number: "SYS1".to_string(),
            vin: "VIN123".to_string(),
            vrm: Some("A123BCD".to_string()),
            trailer_id: Some("C000001".to_string()),
            vehicle_type,
            test_status: "submitted".to_string(),
            test_start_timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
            test_end_timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            odometer_reading: Some(120_000),
            odometer_reading_units: Some("kilometres".to_string()),
            tester_name: "John Smith".to_string(),
            tester_staff_id: "staff-1".to_string(),
            test_station_p_number: "P123".to_string(),
            test_station_name: Some("Abshire-Kub".to_string()),
            country_of_registration: Some("gb".to_string()),
            eu_vehicle_category: Some("m3".to_string()),
            created_by_id: None,
            created_by_name: Some("John Smith".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap()),
            test_type: TestType {
                test_number: Some("W01A00209".to_string()),
                test_type_id: Some("1".to_string()),
                test_type_code: Some("aas".to_string()),
                test_type_name: Some("Annual test".to_string()),
                test_type_classification: Some("Annual With Certificate".to_string()),
                test_result: outcome,
                test_expiry_date: Some(Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()),
                test_anniversary_date: Some(Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()),
                certificate_number: Some("CERT123".to_string()),
                seatbelt_installation_check_performed: Some(true),
                last_seatbelt_installation_check_date: None,
                number_of_seatbelts_fitted: Some(3),
                defects: vec![],
                custom_defects: vec![],
                required_standards: vec![],
            },
        }
    }

    /// Register the technical-record search and full-record responses for
    /// the fixture vehicle.
    pub fn tech_record_responses(invoker: MockInvoker) -> MockInvoker {
        invoker
            .respond(
                FN_TECH_RECORDS,
                "/v3/technical-records/search/SYS1",
                200,
                r#"[{"systemNumber": "SYS-T", "createdTimestamp": "2024-01-01T00:00:00Z", "statusCode": "current"}]"#,
            )
            .respond(
                FN_TECH_RECORDS,
                "/v3/technical-records/SYS-T/2024-01-01T00:00:00+00:00",
                200,
                r#"{"make": "DAF", "model": "XF", "bodyTypeDescription": "articulated",
                    "grossDesignWeight": 44000, "trainDesignWeight": 40000,
                    "axles": [{"designWeight": 9000}, {"designWeight": 8000}]}"#,
            )
    }

    pub fn context(invoker: MockInvoker) -> GeneratorContext {
        let repository = RemoteRepository::new(Arc::new(invoker), Retry::new(3));
        GeneratorContext {
            resolver: TechRecordResolver::new(repository.clone()),
            repository,
            storage: Arc::new(MemorySignatureStore::new()),
            signature_bucket: "signatures".to_string(),
            branch: "local".to_string(),
        }
    }

    pub fn context_with<G>(invoker: MockInvoker, build: impl FnOnce(GeneratorContext) -> G) -> G {
        build(context(invoker))
    }
}
