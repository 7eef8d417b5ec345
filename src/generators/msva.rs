//! MSVA (motorcycle single vehicle approval) certificate section.

use async_trait::async_trait;

use crate::error::Result;
use crate::generators::{
    additional_defects, format_date, reapplication_date, required_standard_lines,
    FragmentGenerator, GeneratorContext,
};
use crate::models::{CertificateKind, MsvaData, PayloadFragment, TestRecord};

pub struct MsvaGenerator {
    context: GeneratorContext,
    kind: CertificateKind,
}

impl MsvaGenerator {
    pub fn new(context: GeneratorContext, kind: CertificateKind) -> Self {
        Self { context, kind }
    }
}

#[async_trait]
impl FragmentGenerator for MsvaGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        if self.kind != CertificateKind::Msva {
            return Ok(Vec::new());
        }

        let technical = self
            .context
            .resolver
            .resolve(&record.system_number)
            .await
            .ok();

        Ok(vec![PayloadFragment::Msva(Box::new(MsvaData {
            vin: Some(record.vin.clone()),
            serial_number: record.registration_identifier().map(str::to_string),
            vehicle_z_number: record.vrm.clone(),
            make: technical.as_ref().and_then(|t| t.make.clone()),
            model: technical.as_ref().and_then(|t| t.model.clone()),
            r#type: technical.and_then(|t| t.body_type_description),
            date: Some(format_date(&record.test_end_timestamp)),
            tester_name: Some(record.tester_name.clone()),
            reapplication_date: reapplication_date(&record.test_start_timestamp),
            station: Some(record.test_station_p_number.clone()),
            required_standards: required_standard_lines(&record.test_type.required_standards),
            additional_defects: additional_defects(&record.test_type.custom_defects),
        }))])
    }
}
