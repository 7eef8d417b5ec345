//! IVA (individual vehicle approval) certificate section.

use async_trait::async_trait;

use crate::error::Result;
use crate::generators::{
    additional_defects, format_date, reapplication_date, required_standard_lines,
    FragmentGenerator, GeneratorContext,
};
use crate::models::{CertificateKind, IvaData, PayloadFragment, TestRecord};

/// Test type ids examined as a basic (rather than normal) IVA inspection.
const BASIC_IVA_TEST_TYPE_IDS: &[&str] = &["125", "129", "154", "158", "159", "185"];

pub struct IvaGenerator {
    context: GeneratorContext,
    kind: CertificateKind,
}

impl IvaGenerator {
    pub fn new(context: GeneratorContext, kind: CertificateKind) -> Self {
        Self { context, kind }
    }
}

fn test_category(test_type_id: Option<&str>) -> &'static str {
    match test_type_id {
        Some(id) if BASIC_IVA_TEST_TYPE_IDS.contains(&id) => "basic",
        _ => "normal",
    }
}

#[async_trait]
impl FragmentGenerator for IvaGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        if self.kind != CertificateKind::Iva {
            return Ok(Vec::new());
        }

        // Newly presented vehicles often have no technical record yet, so
        // make/model resolution is best-effort here.
        let technical = self
            .context
            .resolver
            .resolve(&record.system_number)
            .await
            .ok();

        Ok(vec![PayloadFragment::Iva(Box::new(IvaData {
            vin: Some(record.vin.clone()),
            serial_number: record.registration_identifier().map(str::to_string),
            vehicle_trailer_nr: record.registration_identifier().map(str::to_string),
            make: technical.as_ref().and_then(|t| t.make.clone()),
            model: technical.as_ref().and_then(|t| t.model.clone()),
            body_type: technical.and_then(|t| t.body_type_description),
            date: Some(format_date(&record.test_end_timestamp)),
            tester_name: Some(record.tester_name.clone()),
            reapplication_date: reapplication_date(&record.test_start_timestamp),
            station: Some(record.test_station_p_number.clone()),
            test_category_basic_normal: Some(
                test_category(record.test_type.test_type_id.as_deref()).to_string(),
            ),
            required_standards: required_standard_lines(&record.test_type.required_standards),
            additional_defects: additional_defects(&record.test_type.custom_defects),
        }))])
    }
}
