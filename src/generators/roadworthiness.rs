//! Roadworthiness (RWT) certificate section, HGV and trailer only.

use async_trait::async_trait;

use crate::defects::format_defect;
use crate::error::{CertificateError, Result};
use crate::generators::{format_date, FragmentGenerator, GeneratorContext};
use crate::models::{
    CertificateKind, PayloadFragment, RwtData, TechnicalRecord, TestOutcome, TestRecord,
    VehicleCategory,
};

pub struct RoadworthinessGenerator {
    context: GeneratorContext,
    kind: CertificateKind,
}

impl RoadworthinessGenerator {
    pub fn new(context: GeneratorContext, kind: CertificateKind) -> Self {
        Self { context, kind }
    }
}

/// HGVs carry the train design weight; everything else sums the axle
/// design weights. A record with no axle weight data cannot be certified.
fn resolve_weight(record: &TechnicalRecord, vehicle_type: VehicleCategory) -> Result<u32> {
    if vehicle_type == VehicleCategory::Hgv {
        return record
            .train_design_weight
            .ok_or_else(|| CertificateError::MissingField("trainDesignWeight".to_string()));
    }
    let weights: Vec<u32> = record
        .axles
        .iter()
        .filter_map(|axle| axle.design_weight)
        .collect();
    if weights.is_empty() {
        return Err(CertificateError::MissingField(
            "axle design weights".to_string(),
        ));
    }
    Ok(weights.iter().sum())
}

#[async_trait]
impl FragmentGenerator for RoadworthinessGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        if self.kind != CertificateKind::Roadworthiness
            || !matches!(
                record.vehicle_type,
                VehicleCategory::Hgv | VehicleCategory::Trl
            )
        {
            return Ok(Vec::new());
        }

        let technical = self.context.resolver.resolve(&record.system_number).await?;
        let weight2 = resolve_weight(&technical, record.vehicle_type)?;

        let defects = match record.test_type.test_result {
            TestOutcome::Fail => Some(
                record
                    .test_type
                    .defects
                    .iter()
                    .map(format_defect)
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        };

        Ok(vec![PayloadFragment::Rwt(Box::new(RwtData {
            dgvw: technical.gross_design_weight,
            weight2: Some(weight2),
            vehicle_number: record.registration_identifier().map(str::to_string),
            vin: Some(record.vin.clone()),
            issuers_name: Some(record.tester_name.clone()),
            date_of_inspection: Some(format_date(&record.test_end_timestamp)),
            test_station_p_number: Some(record.test_station_p_number.clone()),
            document_number: record.test_type.certificate_number.clone(),
            defects,
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_fixtures::{context_with, record, tech_record_responses};
    use crate::models::AxleSpec;
    use crate::remote::test_support::MockInvoker;

    #[tokio::test]
    async fn hgv_uses_the_train_design_weight() {
        let generator = context_with(tech_record_responses(MockInvoker::new()), |ctx| {
            RoadworthinessGenerator::new(ctx, CertificateKind::Roadworthiness)
        });
        let fragments = generator
            .generate(&record(VehicleCategory::Hgv, TestOutcome::Pass))
            .await
            .unwrap();

        let PayloadFragment::Rwt(data) = &fragments[0] else {
            panic!("expected an RWT fragment");
        };
        assert_eq!(data.weight2, Some(40_000));
        assert_eq!(data.dgvw, Some(44_000));
        assert!(data.defects.is_none());
    }

    #[tokio::test]
    async fn trailers_sum_axle_design_weights() {
        let generator = context_with(tech_record_responses(MockInvoker::new()), |ctx| {
            RoadworthinessGenerator::new(ctx, CertificateKind::Roadworthiness)
        });
        let fragments = generator
            .generate(&record(VehicleCategory::Trl, TestOutcome::Pass))
            .await
            .unwrap();

        let PayloadFragment::Rwt(data) = &fragments[0] else {
            panic!("expected an RWT fragment");
        };
        assert_eq!(data.weight2, Some(17_000));
        assert_eq!(data.vehicle_number.as_deref(), Some("C000001"));
    }

    #[test]
    fn missing_axle_weights_are_fatal_for_trailers() {
        let technical = TechnicalRecord {
            axles: vec![AxleSpec { design_weight: None }],
            ..Default::default()
        };
        let result = resolve_weight(&technical, VehicleCategory::Trl);
        assert!(matches!(result, Err(CertificateError::MissingField(_))));
    }

    #[tokio::test]
    async fn psv_records_are_out_of_scope() {
        let generator = context_with(MockInvoker::new(), |ctx| {
            RoadworthinessGenerator::new(ctx, CertificateKind::Roadworthiness)
        });
        let fragments = generator
            .generate(&record(VehicleCategory::Psv, TestOutcome::Pass))
            .await
            .unwrap();
        assert!(fragments.is_empty());
    }

    #[tokio::test]
    async fn fail_outcome_carries_a_formatted_defect_list() {
        let generator = context_with(tech_record_responses(MockInvoker::new()), |ctx| {
            RoadworthinessGenerator::new(ctx, CertificateKind::Roadworthiness)
        });
        let mut failed = record(VehicleCategory::Hgv, TestOutcome::Fail);
        failed.test_type.defects = vec![crate::models::Defect {
            deficiency_category: "major".to_string(),
            deficiency_ref: Some("1.1.a".to_string()),
            deficiency_text: Some("insecure.".to_string()),
            item_description: Some("Brake pedal:".to_string()),
            prs: None,
            additional_information: None,
        }];

        let fragments = generator.generate(&failed).await.unwrap();
        let PayloadFragment::Rwt(data) = &fragments[0] else {
            panic!("expected an RWT fragment");
        };
        assert_eq!(
            data.defects.as_deref(),
            Some(&["1.1.a Brake pedal: insecure.".to_string()][..])
        );
    }
}
