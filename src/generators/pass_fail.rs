//! Pass/fail certificate sections.
//!
//! Builds the common certificate fields, classified defects, make/model
//! from the resolved technical record, the trailer registration number for
//! trailers, and the odometer trail. A pass outcome fills DATA, a fail
//! fills FAIL_DATA, a PRS outcome fills both.

use async_trait::async_trait;
use chrono::Months;

use crate::defects;
use crate::error::Result;
use crate::generators::{format_date, FragmentGenerator, GeneratorContext};
use crate::models::{
    CertificateData, CertificateKind, CurrentOdometer, PayloadFragment, TestOutcome, TestRecord,
    VehicleCategory,
};
use crate::odometer;

pub struct PassFailGenerator {
    context: GeneratorContext,
    kind: CertificateKind,
    bilingual_requested: bool,
}

impl PassFailGenerator {
    pub fn new(context: GeneratorContext, kind: CertificateKind, bilingual_requested: bool) -> Self {
        Self {
            context,
            kind,
            bilingual_requested,
        }
    }

    async fn build_data(&self, record: &TestRecord) -> Result<CertificateData> {
        let outcome = record.test_type.test_result;
        let vehicle_type = record.vehicle_type;

        // The flattened translation table is only worth fetching when a
        // Welsh twin can actually be produced.
        let table = if self.bilingual_requested
            && defects::welsh_certificate_available(vehicle_type, outcome)
        {
            defects::flatten_translations(&self.context.repository.defect_translations().await)
        } else {
            Vec::new()
        };

        let buckets = defects::classify(
            &record.test_type.defects,
            self.kind,
            outcome,
            vehicle_type,
            self.bilingual_requested,
            &table,
        );

        let technical = self.context.resolver.resolve(&record.system_number).await?;

        let trn = match (vehicle_type, technical.make.as_deref()) {
            (VehicleCategory::Trl, Some(make)) => self
                .context
                .repository
                .trailer_registration(&record.vin, make)
                .await
                .map(|registration| registration.trn),
            _ => None,
        };

        let odometer_history_list = match vehicle_type {
            VehicleCategory::Trl => None,
            _ => Some(
                odometer::odometer_history(&self.context.repository, &record.system_number)
                    .await?,
            ),
        };

        let test_station_name = match &record.test_station_name {
            Some(name) => Some(name.clone()),
            None => self
                .context
                .repository
                .test_station(&record.test_station_p_number)
                .await
                .and_then(|station| station.test_station_name),
        };

        let earliest_date_of_the_next_test = record.test_type.test_anniversary_date.map(|date| {
            let hgv_or_trl = matches!(vehicle_type, VehicleCategory::Hgv | VehicleCategory::Trl);
            let pass_or_prs = matches!(outcome, TestOutcome::Pass | TestOutcome::Prs);
            let adjusted = if hgv_or_trl && pass_or_prs {
                date.checked_sub_months(Months::new(1)).unwrap_or(date)
            } else {
                date
            };
            format_date(&adjusted)
        });

        Ok(CertificateData {
            test_number: record.test_type.test_number.clone(),
            test_station_p_number: Some(record.test_station_p_number.clone()),
            test_station_name,
            current_odometer: record.odometer_reading.map(|value| CurrentOdometer {
                value,
                unit: record
                    .odometer_reading_units
                    .clone()
                    .unwrap_or_else(|| "kilometres".to_string()),
            }),
            issuers_name: Some(record.tester_name.clone()),
            date_of_the_test: Some(format_date(&record.test_end_timestamp)),
            country_of_registration_code: record.country_of_registration.clone(),
            vehicle_eu_classification: record.eu_vehicle_category.clone(),
            raw_vin: Some(record.vin.clone()),
            raw_vrm: record.registration_identifier().map(str::to_string),
            expiry_date: record.test_type.test_expiry_date.as_ref().map(format_date),
            earliest_date_of_the_next_test,
            seat_belt_tested: record
                .test_type
                .seatbelt_installation_check_performed
                .map(|checked| if checked { "Yes" } else { "No" }.to_string()),
            seat_belt_previous_check_date: record
                .test_type
                .last_seatbelt_installation_check_date
                .map(|date| date.format("%d.%m.%Y").to_string()),
            seat_belt_number: record.test_type.number_of_seatbelts_fitted,
            make: technical.make.clone(),
            model: technical.model.clone(),
            odometer_history_list,
            trn,
            is_trailer: Some(vehicle_type == VehicleCategory::Trl),
            defects: buckets,
        })
    }
}

#[async_trait]
impl FragmentGenerator for PassFailGenerator {
    async fn generate(&self, record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        if !matches!(
            self.kind,
            CertificateKind::Pass | CertificateKind::Fail | CertificateKind::Prs
        ) {
            return Ok(Vec::new());
        }

        let data = self.build_data(record).await?;
        let outcome = record.test_type.test_result;

        let mut fragments = Vec::new();
        if outcome != TestOutcome::Fail {
            fragments.push(PayloadFragment::Data(Box::new(data.clone())));
        }
        if outcome != TestOutcome::Pass {
            fragments.push(PayloadFragment::FailData(Box::new(data)));
        }
        Ok(fragments)
    }
}
