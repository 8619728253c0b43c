// src/profile/mod.rs

use serde::Deserialize;
use serde_json::Value;

/// A year/month pair as the profile API reports it; either half may be
/// missing on real payloads.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Start/end bounds of an education or employment stint. An entry with a
/// `timePeriod` but no `endDate` is open-ended.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub start_date: Option<PartialDate>,
    pub end_date: Option<PartialDate>,
}

#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school_name: Option<String>,
    pub degree_name: Option<String>,
    pub field_of_study: Option<String>,
    pub time_period: Option<TimePeriod>,
}

#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub location_name: Option<String>,
    pub time_period: Option<TimePeriod>,
}

/// The slice of a profile payload the resolver cares about. Everything else
/// in the payload is ignored.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct RawProfile {
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

/// Whether `payload` is a usable profile record at all: a JSON object with
/// at least one field. The API returns `{}` or non-object bodies for dead
/// or restricted profiles.
pub fn is_populated(payload: &Value) -> bool {
    matches!(payload, Value::Object(map) if !map.is_empty())
}

/// Decode the parts of `payload` the resolver reads. Unknown fields are
/// dropped; a structurally wrong payload (e.g. `education` not a list of
/// objects) is an error for the caller to classify.
pub fn parse_profile(payload: Value) -> serde_json::Result<RawProfile> {
    serde_json::from_value(payload)
}
