// certificate-generation-service/src/models.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle classification carried on a test record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Psv,
    Hgv,
    Trl,
    #[serde(other)]
    Other,
}

/// Outcome of a single test type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Pass,
    Fail,
    Prs,
    Abandoned,
}

/// The certificate being produced for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateKind {
    Pass,
    Fail,
    Prs,
    Roadworthiness,
    Adr,
    Iva,
    Msva,
}

impl CertificateKind {
    /// PRS certificates carry a fail section, so they count as the fail
    /// variant for defect routing.
    pub fn is_fail_variant(self) -> bool {
        matches!(self, CertificateKind::Fail | CertificateKind::Prs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub system_number: String,
    pub vin: String,
    #[serde(default)]
    pub vrm: Option<String>,
    #[serde(default)]
    pub trailer_id: Option<String>,
    pub vehicle_type: VehicleCategory,
    pub test_status: String,
    pub test_start_timestamp: DateTime<Utc>,
    pub test_end_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub odometer_reading: Option<i64>,
    #[serde(default)]
    pub odometer_reading_units: Option<String>,
    pub tester_name: String,
    pub tester_staff_id: String,
    pub test_station_p_number: String,
    #[serde(default)]
    pub test_station_name: Option<String>,
    #[serde(default)]
    pub country_of_registration: Option<String>,
    #[serde(default)]
    pub eu_vehicle_category: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Exactly one test type drives payload generation. Historical queries
    /// return records carrying many (see [`HistoryRecord`]).
    pub test_type: TestType,
}

impl TestRecord {
    /// Trailers are certified against their trailer id, everything else
    /// against the registration mark.
    pub fn registration_identifier(&self) -> Option<&str> {
        match self.vehicle_type {
            VehicleCategory::Trl => self.trailer_id.as_deref(),
            _ => self.vrm.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestType {
    #[serde(default)]
    pub test_number: Option<String>,
    #[serde(default)]
    pub test_type_id: Option<String>,
    #[serde(default)]
    pub test_type_code: Option<String>,
    #[serde(default)]
    pub test_type_name: Option<String>,
    #[serde(default)]
    pub test_type_classification: Option<String>,
    pub test_result: TestOutcome,
    #[serde(default)]
    pub test_expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_anniversary_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub seatbelt_installation_check_performed: Option<bool>,
    #[serde(default)]
    pub last_seatbelt_installation_check_date: Option<NaiveDate>,
    #[serde(default)]
    pub number_of_seatbelts_fitted: Option<u32>,
    #[serde(default)]
    pub defects: Vec<Defect>,
    #[serde(default)]
    pub custom_defects: Vec<CustomDefect>,
    #[serde(default)]
    pub required_standards: Vec<RequiredStandard>,
}

/// One raw defect as recorded by the tester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    /// dangerous | major | minor | advisory, matched case-insensitively.
    pub deficiency_category: String,
    #[serde(default)]
    pub deficiency_ref: Option<String>,
    #[serde(default)]
    pub deficiency_text: Option<String>,
    #[serde(default)]
    pub item_description: Option<String>,
    /// Deficiency subsequently rectified at the station.
    #[serde(default)]
    pub prs: Option<bool>,
    #[serde(default)]
    pub additional_information: Option<AdditionalInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInformation {
    #[serde(default)]
    pub location: Option<DefectLocation>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Structured location of a defect on the vehicle. Field declaration order
/// is the phrase order used when formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectLocation {
    #[serde(default)]
    pub vertical: Option<String>,
    #[serde(default)]
    pub horizontal: Option<String>,
    #[serde(default)]
    pub lateral: Option<String>,
    #[serde(default)]
    pub longitudinal: Option<String>,
    #[serde(default)]
    pub row_number: Option<u32>,
    #[serde(default)]
    pub seat_number: Option<u32>,
    #[serde(default)]
    pub axle_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDefect {
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub defect_name: Option<String>,
    #[serde(default)]
    pub defect_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredStandard {
    #[serde(default)]
    pub ref_calculation: Option<String>,
    #[serde(default)]
    pub required_standard: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub prs: Option<bool>,
}

// ---------------------------------------------------------------------------
// Defect translation table (remote) and its flattened per-run form
// ---------------------------------------------------------------------------

/// One row of the remote defect translation table, as fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectTranslation {
    #[serde(default)]
    pub im_number: Option<u32>,
    #[serde(default)]
    pub items: Vec<TranslationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationItem {
    #[serde(default)]
    pub item_description: Option<String>,
    #[serde(default)]
    pub item_description_welsh: Option<String>,
    #[serde(default)]
    pub deficiencies: Vec<TranslationDeficiency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationDeficiency {
    pub deficiency_ref: String,
    #[serde(default)]
    pub deficiency_text: Option<String>,
    #[serde(default)]
    pub deficiency_text_welsh: Option<String>,
    #[serde(default)]
    pub for_vehicle_type: Vec<VehicleCategory>,
}

/// Denormalized, language-parallel lookup row keyed by deficiency reference.
/// Built fresh per generation request when bilingual output is requested,
/// never cached.
#[derive(Debug, Clone)]
pub struct FlatDefect {
    pub deficiency_ref: String,
    pub item_description_welsh: Option<String>,
    pub deficiency_text_welsh: Option<String>,
    pub for_vehicle_type: Vec<VehicleCategory>,
}

// ---------------------------------------------------------------------------
// Technical records
// ---------------------------------------------------------------------------

/// Summary of one technical record version from the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub system_number: String,
    pub created_timestamp: DateTime<Utc>,
    /// `current` | `provisional` | other.
    pub status_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalRecord {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub body_type_description: Option<String>,
    #[serde(default)]
    pub gross_design_weight: Option<u32>,
    #[serde(default)]
    pub train_design_weight: Option<u32>,
    #[serde(default)]
    pub axles: Vec<AxleSpec>,
    #[serde(default)]
    pub adr_details: Option<AdrDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleSpec {
    #[serde(default)]
    pub design_weight: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdrDetails {
    #[serde(default)]
    pub vehicle_details_type: Option<String>,
    #[serde(default)]
    pub permitted_dangerous_goods: Vec<String>,
    #[serde(default)]
    pub brake_endurance: Option<bool>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub tank_manufacturer: Option<String>,
    #[serde(default)]
    pub year_of_manufacture: Option<u32>,
    #[serde(default)]
    pub tank_manufacturer_serial_no: Option<String>,
    #[serde(default)]
    pub tank_type_appro_no: Option<String>,
    #[serde(default)]
    pub tank_code: Option<String>,
    #[serde(default)]
    pub applicant_details: Option<ApplicantDetails>,
    #[serde(default)]
    pub memos_apply: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

// ---------------------------------------------------------------------------
// Remote lookup results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStation {
    pub test_station_p_number: String,
    #[serde(default)]
    pub test_station_name: Option<String>,
    #[serde(default)]
    pub test_station_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerRegistration {
    pub trn: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
}

/// A prior test record for the same vehicle, as returned by the history
/// query. Unlike [`TestRecord`], many test types per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub system_number: String,
    pub test_status: String,
    pub test_end_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub odometer_reading: Option<i64>,
    #[serde(default)]
    pub odometer_reading_units: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_types: Vec<TestType>,
}

// ---------------------------------------------------------------------------
// Payload sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentOdometer {
    pub value: i64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdometerEntry {
    pub value: i64,
    pub unit: String,
    pub date: String,
}

/// Severity-bucketed, formatted defect strings. Empty buckets serialize
/// away entirely rather than as empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketedDefects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dangerous_defects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_defects: Option<Vec<String>>,
    #[serde(rename = "PRSDefects", skip_serializing_if = "Option::is_none")]
    pub prs_defects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_defects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_defects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dangerous_defects_welsh: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_defects_welsh: Option<Vec<String>>,
    #[serde(rename = "PRSDefectsWelsh", skip_serializing_if = "Option::is_none")]
    pub prs_defects_welsh: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_defects_welsh: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_defects_welsh: Option<Vec<String>>,
}

/// Shared shape of the DATA and FAIL_DATA sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_number: Option<String>,
    #[serde(rename = "TestStationPNumber", skip_serializing_if = "Option::is_none")]
    pub test_station_p_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_odometer: Option<CurrentOdometer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuers_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_the_test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_registration_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_eu_classification: Option<String>,
    #[serde(rename = "RawVIN", skip_serializing_if = "Option::is_none")]
    pub raw_vin: Option<String>,
    #[serde(rename = "RawVRM", skip_serializing_if = "Option::is_none")]
    pub raw_vrm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_date_of_the_next_test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_belt_tested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_belt_previous_check_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_belt_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer_history_list: Option<Vec<OdometerEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trailer: Option<bool>,
    #[serde(flatten)]
    pub defects: BucketedDefects,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RwtData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dgvw: Option<u32>,
    #[serde(rename = "Weight2", skip_serializing_if = "Option::is_none")]
    pub weight2: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(rename = "Vin", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuers_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_inspection: Option<String>,
    #[serde(rename = "TestStationPNumber", skip_serializing_if = "Option::is_none")]
    pub test_station_p_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defects: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdrData {
    #[serde(rename = "Vin", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(rename = "Vrm", skip_serializing_if = "Option::is_none")]
    pub vrm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub permitted_dangerous_goods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brake_endurance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_year_of_manufacture: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_manufacturer_serial_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_type_appro_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_details: Option<ApplicantDetails>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub memos_apply: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_the_test: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefectSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IvaData {
    #[serde(rename = "Vin", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_trailer_nr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reapplication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    /// "basic" or "normal".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_category_basic_normal: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required_standards: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub additional_defects: Vec<DefectSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MsvaData {
    #[serde(rename = "Vin", skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_z_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reapplication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required_standards: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub additional_defects: Vec<DefectSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signature {
    pub image_type: String,
    /// Base64-encoded image; null when the download failed or no image
    /// exists for the tester.
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reissue {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One section of the certificate payload, produced by a single fragment
/// generator. Keeps section ownership disjoint by type rather than by
/// runtime convention.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadFragment {
    Watermark(String),
    Data(Box<CertificateData>),
    FailData(Box<CertificateData>),
    Rwt(Box<RwtData>),
    Adr(Box<AdrData>),
    Iva(Box<IvaData>),
    Msva(Box<MsvaData>),
    Signature(Signature),
    Reissue(Reissue),
}

/// The assembled payload handed to the document renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificatePayload {
    #[serde(rename = "Watermark", skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,
    #[serde(rename = "DATA", skip_serializing_if = "Option::is_none")]
    pub data: Option<CertificateData>,
    #[serde(rename = "FAIL_DATA", skip_serializing_if = "Option::is_none")]
    pub fail_data: Option<CertificateData>,
    #[serde(rename = "RWT_DATA", skip_serializing_if = "Option::is_none")]
    pub rwt_data: Option<RwtData>,
    #[serde(rename = "ADR_DATA", skip_serializing_if = "Option::is_none")]
    pub adr_data: Option<AdrData>,
    #[serde(rename = "IVA_DATA", skip_serializing_if = "Option::is_none")]
    pub iva_data: Option<IvaData>,
    #[serde(rename = "MSVA_DATA", skip_serializing_if = "Option::is_none")]
    pub msva_data: Option<MsvaData>,
    #[serde(rename = "Signature", skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(rename = "Reissue", skip_serializing_if = "Option::is_none")]
    pub reissue: Option<Reissue>,
}

impl CertificatePayload {
    /// Merge one fragment into the payload. A later fragment overwrites an
    /// identical section; in practice the generator set keeps sections
    /// disjoint.
    pub fn apply(&mut self, fragment: PayloadFragment) {
        match fragment {
            PayloadFragment::Watermark(w) => self.watermark = Some(w),
            PayloadFragment::Data(d) => self.data = Some(*d),
            PayloadFragment::FailData(d) => self.fail_data = Some(*d),
            PayloadFragment::Rwt(d) => self.rwt_data = Some(*d),
            PayloadFragment::Adr(d) => self.adr_data = Some(*d),
            PayloadFragment::Iva(d) => self.iva_data = Some(*d),
            PayloadFragment::Msva(d) => self.msva_data = Some(*d),
            PayloadFragment::Signature(s) => self.signature = Some(s),
            PayloadFragment::Reissue(r) => self.reissue = Some(r),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateGenerationRequest {
    pub certificate_kind: CertificateKind,
    #[serde(default)]
    pub bilingual: bool,
    pub test_record: TestRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateGenerationResponse {
    pub request_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<CertificatePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl CertificateGenerationResponse {
    pub fn success(
        request_id: String,
        document_name: Option<String>,
        payload: CertificatePayload,
    ) -> Self {
        Self {
            request_id,
            status: "success".to_string(),
            document_name,
            payload: Some(payload),
            error: None,
            generated_at: Utc::now(),
        }
    }

    pub fn error(request_id: String, error: String) -> Self {
        Self {
            request_id,
            status: "error".to_string(),
            document_name: None,
            payload: None,
            error: Some(error),
            generated_at: Utc::now(),
        }
    }
}
