//! Defect classification and formatting.
//!
//! Raw defects are bucketed by severity (with PRS promotion on fail-variant
//! certificates) and rendered to display strings, optionally with a Welsh
//! twin of every bucket when a bilingual certificate exists for the
//! vehicle-type/outcome pair. Empty buckets are omitted from the payload.

use crate::models::{
    BucketedDefects, CertificateKind, Defect, DefectLocation, DefectTranslation, FlatDefect,
    TestOutcome, VehicleCategory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Dangerous,
    Major,
    Minor,
    Advisory,
}

impl Severity {
    /// Case-insensitive parse; anything outside the four recognized values
    /// is dropped from every bucket.
    fn parse(category: &str) -> Option<Self> {
        match category.to_ascii_lowercase().as_str() {
            "dangerous" => Some(Severity::Dangerous),
            "major" => Some(Severity::Major),
            "minor" => Some(Severity::Minor),
            "advisory" => Some(Severity::Advisory),
            _ => None,
        }
    }
}

/// Vehicle-type/outcome pairs for which a Welsh certificate variant exists.
const BILINGUAL_COMBINATIONS: &[(VehicleCategory, TestOutcome)] = &[
    (VehicleCategory::Psv, TestOutcome::Pass),
    (VehicleCategory::Psv, TestOutcome::Fail),
    (VehicleCategory::Psv, TestOutcome::Prs),
    (VehicleCategory::Hgv, TestOutcome::Pass),
    (VehicleCategory::Hgv, TestOutcome::Fail),
    (VehicleCategory::Hgv, TestOutcome::Prs),
    (VehicleCategory::Trl, TestOutcome::Pass),
    (VehicleCategory::Trl, TestOutcome::Fail),
    (VehicleCategory::Trl, TestOutcome::Prs),
];

pub fn welsh_certificate_available(vehicle_type: VehicleCategory, outcome: TestOutcome) -> bool {
    BILINGUAL_COMBINATIONS.contains(&(vehicle_type, outcome))
}

/// Qualitative location values with a fixed Welsh translation. Unrecognized
/// values pass through unchanged.
fn translate_location_welsh(value: &str) -> String {
    match value.to_ascii_lowercase().as_str() {
        "front" => "Blaen".to_string(),
        "rear" => "Cefn".to_string(),
        "upper" => "Uchaf".to_string(),
        "lower" => "Isaf".to_string(),
        "nearside" => "Ochr Agosaf".to_string(),
        "offside" => "Ochr Bellaf".to_string(),
        "centre" => "Canol".to_string(),
        "inner" => "Mewnol".to_string(),
        "outer" => "Allanol".to_string(),
        _ => capitalize(value),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Flatten the fetched translation table into language-parallel rows keyed
/// by deficiency reference. Built once per generation request, never cached.
pub fn flatten_translations(translations: &[DefectTranslation]) -> Vec<FlatDefect> {
    let mut flat = Vec::new();
    for row in translations {
        for item in &row.items {
            for deficiency in &item.deficiencies {
                flat.push(FlatDefect {
                    deficiency_ref: deficiency.deficiency_ref.clone(),
                    item_description_welsh: item.item_description_welsh.clone(),
                    deficiency_text_welsh: deficiency.deficiency_text_welsh.clone(),
                    for_vehicle_type: deficiency.for_vehicle_type.clone(),
                });
            }
        }
    }
    flat
}

/// Find the translation row for a defect. One match wins outright; with
/// several, the row scoped to the current vehicle type wins; otherwise the
/// lookup fails soft.
fn find_translation<'a>(
    table: &'a [FlatDefect],
    deficiency_ref: &str,
    vehicle_type: VehicleCategory,
) -> Option<&'a FlatDefect> {
    let matches: Vec<&FlatDefect> = table
        .iter()
        .filter(|row| row.deficiency_ref == deficiency_ref)
        .collect();
    match matches.len() {
        0 => None,
        1 => Some(matches[0]),
        _ => matches
            .into_iter()
            .find(|row| row.for_vehicle_type.contains(&vehicle_type)),
    }
}

/// Location phrases in declared field order: qualitative positions first,
/// then row/seat/axle counts. The trailing period lands after the last
/// phrase.
fn location_phrases(location: &DefectLocation, welsh: bool) -> Vec<String> {
    let (rows, seats, axles) = if welsh {
        ("Rhesi", "Seddi", "Echelau")
    } else {
        ("Rows", "Seats", "Axles")
    };

    let qualitative = |value: &str| {
        if welsh {
            translate_location_welsh(value)
        } else {
            capitalize(value)
        }
    };

    let mut phrases = Vec::new();
    for value in [
        &location.vertical,
        &location.horizontal,
        &location.lateral,
        &location.longitudinal,
    ]
    .into_iter()
    .flatten()
    {
        phrases.push(qualitative(value));
    }
    if let Some(n) = location.row_number {
        phrases.push(format!("{rows}: {n}."));
    }
    if let Some(n) = location.seat_number {
        phrases.push(format!("{seats}: {n}."));
    }
    if let Some(n) = location.axle_number {
        phrases.push(format!("{axles}: {n}."));
    }
    phrases
}

fn append_location_and_notes(out: &mut String, defect: &Defect, welsh: bool) {
    if let Some(additional) = &defect.additional_information {
        if let Some(location) = &additional.location {
            let phrases = location_phrases(location, welsh);
            let count = phrases.len();
            for phrase in phrases {
                out.push(' ');
                out.push_str(&phrase);
            }
            if count > 0 && !out.ends_with('.') {
                out.push('.');
            }
        }
        if let Some(notes) = &additional.notes {
            out.push(' ');
            out.push_str(notes);
        }
    }
}

/// Render `"<reference> <item description>[ <deficiency text>][ <location
/// phrases>][ <notes>]"`. Deterministic for identical input.
pub fn format_defect(defect: &Defect) -> String {
    let mut out = defect.deficiency_ref.clone().unwrap_or_default();
    if let Some(item) = &defect.item_description {
        out.push(' ');
        out.push_str(item);
    }
    if let Some(text) = &defect.deficiency_text {
        out.push(' ');
        out.push_str(text);
    }
    append_location_and_notes(&mut out, defect, false);
    out
}

/// Welsh rendering of the same defect, substituting the translated item and
/// deficiency strings. Fails soft (`None`) when no usable translation row
/// exists for the reference.
pub fn format_defect_welsh(
    defect: &Defect,
    vehicle_type: VehicleCategory,
    table: &[FlatDefect],
) -> Option<String> {
    let deficiency_ref = defect.deficiency_ref.as_deref()?;
    let row = find_translation(table, deficiency_ref, vehicle_type)?;

    let mut out = deficiency_ref.to_string();
    if let Some(item) = &row.item_description_welsh {
        out.push(' ');
        out.push_str(item);
    }
    if let Some(text) = &row.deficiency_text_welsh {
        out.push(' ');
        out.push_str(text);
    }
    append_location_and_notes(&mut out, defect, true);
    Some(out)
}

/// Classify and format every raw defect into severity buckets per the
/// certificate being generated. `outcome` is the overall test result of the
/// test type that drives this payload.
pub fn classify(
    defects: &[Defect],
    kind: CertificateKind,
    outcome: TestOutcome,
    vehicle_type: VehicleCategory,
    bilingual_requested: bool,
    table: &[FlatDefect],
) -> BucketedDefects {
    let welsh = bilingual_requested && welsh_certificate_available(vehicle_type, outcome);

    let mut dangerous = Vec::new();
    let mut major = Vec::new();
    let mut prs = Vec::new();
    let mut minor = Vec::new();
    let mut advisory = Vec::new();
    let mut dangerous_welsh = Vec::new();
    let mut major_welsh = Vec::new();
    let mut prs_welsh = Vec::new();
    let mut minor_welsh = Vec::new();
    let mut advisory_welsh = Vec::new();

    for defect in defects {
        let Some(severity) = Severity::parse(&defect.deficiency_category) else {
            continue;
        };

        let (bucket, bucket_welsh) = match severity {
            Severity::Dangerous | Severity::Major => {
                let rectified = outcome == TestOutcome::Prs || defect.prs == Some(true);
                if rectified && kind.is_fail_variant() {
                    (&mut prs, &mut prs_welsh)
                } else if outcome == TestOutcome::Fail {
                    match severity {
                        Severity::Dangerous => (&mut dangerous, &mut dangerous_welsh),
                        _ => (&mut major, &mut major_welsh),
                    }
                } else {
                    // Dangerous/major defects only surface on fail-oriented
                    // certificates.
                    continue;
                }
            }
            Severity::Minor => (&mut minor, &mut minor_welsh),
            Severity::Advisory => (&mut advisory, &mut advisory_welsh),
        };

        bucket.push(format_defect(defect));
        if welsh {
            if let Some(formatted) = format_defect_welsh(defect, vehicle_type, table) {
                bucket_welsh.push(formatted);
            }
        }
    }

    let some_if_populated = |v: Vec<String>| if v.is_empty() { None } else { Some(v) };

    BucketedDefects {
        dangerous_defects: some_if_populated(dangerous),
        major_defects: some_if_populated(major),
        prs_defects: some_if_populated(prs),
        minor_defects: some_if_populated(minor),
        advisory_defects: some_if_populated(advisory),
        dangerous_defects_welsh: some_if_populated(dangerous_welsh),
        major_defects_welsh: some_if_populated(major_welsh),
        prs_defects_welsh: some_if_populated(prs_welsh),
        minor_defects_welsh: some_if_populated(minor_welsh),
        advisory_defects_welsh: some_if_populated(advisory_welsh),
    }
}
