//! ADR (dangerous goods) certificate section.

use async_trait::async_trait;

use crate::error::Result;
use crate::generators::{format_date, FragmentGenerator, GeneratorContext};
use crate::models::{AdrData, CertificateKind, PayloadFragment, TestRecord};

pub struct AdrGenerator {
    context: GeneratorContext,
    kind: CertificateKind,
}

impl AdrGenerator {
    pub fn new(context: GeneratorContext, kind: CertificateKind) -> Self {
        Self { context, kind }
    }
}

#[async_trait]
impl FragmentGenerator for AdrGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        if self.kind != CertificateKind::Adr {
            return Ok(Vec::new());
        }

        let technical = self.context.resolver.resolve(&record.system_number).await?;
        let adr = technical.adr_details.unwrap_or_default();

        Ok(vec![PayloadFragment::Adr(Box::new(AdrData {
            vin: Some(record.vin.clone()),
            vrm: record.registration_identifier().map(str::to_string),
            make: technical.make,
            model: technical.model,
            vehicle_type: adr.vehicle_details_type,
            permitted_dangerous_goods: adr.permitted_dangerous_goods,
            brake_endurance: adr.brake_endurance,
            weight: adr.weight,
            tank_manufacturer: adr.tank_manufacturer,
            tank_year_of_manufacture: adr.year_of_manufacture,
            tank_manufacturer_serial_no: adr.tank_manufacturer_serial_no,
            tank_type_appro_no: adr.tank_type_appro_no,
            tank_code: adr.tank_code,
            applicant_details: adr.applicant_details,
            memos_apply: adr.memos_apply,
            date_of_the_test: Some(format_date(&record.test_end_timestamp)),
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_fixtures::{context_with, record};
    use crate::models::{ApplicantDetails, TestOutcome, VehicleCategory};
    use crate::remote::test_support::MockInvoker;
    use crate::remote::FN_TECH_RECORDS;

    fn adr_responses() -> MockInvoker {
        MockInvoker::new()
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
                r#"{"make": "Scania", "model": "R450", "adrDetails": {
                    "vehicleDetailsType": "semi trailer tank",
                    "permittedDangerousGoods": ["FP <61 (FL)"],
                    "brakeEndurance": true,
                    "weight": 3.5,
                    "tankManufacturer": "Clayton",
                    "yearOfManufacture": 2012,
                    "tankManufacturerSerialNo": "GRV 234",
                    "tankTypeApproNo": "9403",
                    "tankCode": "L4BN",
                    "applicantDetails": {"name": "Haulage Ltd", "town": "Bristol"},
                    "memosApply": ["07/09 3mth leak ext"]
                }}"#,
            )
    }

    #[tokio::test]
    async fn projects_tank_and_applicant_attributes() {
        let generator =
            context_with(adr_responses(), |ctx| AdrGenerator::new(ctx, CertificateKind::Adr));
        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();

        let PayloadFragment::Adr(data) = &fragments[0] else {
            panic!("expected an ADR fragment");
        };
        assert_eq!(data.make.as_deref(), Some("Scania"));
        assert_eq!(data.vehicle_type.as_deref(), Some("semi trailer tank"));
        assert_eq!(data.tank_code.as_deref(), Some("L4BN"));
        assert_eq!(data.memos_apply, vec!["07/09 3mth leak ext"]);
        assert_eq!(
            data.applicant_details,
            Some(ApplicantDetails {
                name: Some("Haulage Ltd".into()),
                town: Some("Bristol".into()),
                ..ApplicantDetails::default()
            })
        );
        assert_eq!(data.date_of_the_test.as_deref(), Some("15.06.2024"));
    }

    #[tokio::test]
    async fn other_kinds_produce_nothing() {
        let generator = context_with(MockInvoker::new(), |ctx| {
            AdrGenerator::new(ctx, CertificateKind::Pass)
        });
        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();
        assert!(fragments.is_empty());
    }
}
