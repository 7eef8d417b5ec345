// certificate-generation-service/src/odometer.rs

use crate::error::Result;
use crate::models::{HistoryRecord, OdometerEntry, TestOutcome};
use crate::remote::RemoteRepository;

const TEST_STATUS_SUBMITTED: &str = "submitted";
const ANNUAL_WITH_CERTIFICATE: &str = "Annual With Certificate";
const HISTORY_CAP: usize = 3;

/// Distil a vehicle's prior tests into the odometer trail printed on the
/// certificate: newest record excluded (it is the test being certified),
/// submitted annual-with-certificate pass/PRS tests only, capped at three.
pub async fn odometer_history(
    repository: &RemoteRepository,
    system_number: &str,
) -> Result<Vec<OdometerEntry>> {
    let records = repository.test_history(system_number).await?;
    Ok(derive_trail(records))
}

pub fn derive_trail(mut records: Vec<HistoryRecord>) -> Vec<OdometerEntry> {
    // Descending by test end; sort_by is stable so ties keep their order.
    records.sort_by(|a, b| b.test_end_timestamp.cmp(&a.test_end_timestamp));

    records
        .into_iter()
        .skip(1)
        .filter(|record| record.test_status == TEST_STATUS_SUBMITTED)
        .filter(|record| {
            record.test_types.iter().any(|t| {
                t.test_type_classification.as_deref() == Some(ANNUAL_WITH_CERTIFICATE)
                    && matches!(t.test_result, TestOutcome::Pass | TestOutcome::Prs)
            })
        })
        .take(HISTORY_CAP)
        .filter_map(|record| {
            let value = record.odometer_reading?;
            Some(OdometerEntry {
                value,
                unit: record
                    .odometer_reading_units
                    .unwrap_or_else(|| "kilometres".to_string()),
                date: record.test_end_timestamp.format("%d.%m.%Y").to_string(),
            })
        })
        .collect()
}
