// src/resolve/extract.rs
//
// Pure field extraction over a decoded profile. Everything here is
// deterministic given the profile and a processing date, so it carries the
// unit tests for the resolver's selection rules.

use chrono::NaiveDate;

use crate::profile::{EducationEntry, ExperienceEntry};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNEMPLOYED: &str = "Currently Unemployed";
const UNKNOWN: &str = "Unknown";

/// Current-employment fields for the output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employment {
    pub employer: String,
    pub title: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Employment {
    fn unemployed() -> Self {
        Self {
            employer: UNEMPLOYED.to_string(),
            title: NOT_AVAILABLE.to_string(),
            city: NOT_AVAILABLE.to_string(),
            state: NOT_AVAILABLE.to_string(),
            country: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Current-education fields for the output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationStatus {
    pub pursuing: bool,
    pub school: String,
    pub degree: String,
    pub field: String,
}

impl EducationStatus {
    fn none() -> Self {
        Self {
            pursuing: false,
            school: NOT_AVAILABLE.to_string(),
            degree: NOT_AVAILABLE.to_string(),
            field: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Eligibility filter: at least one education entry whose school name
/// contains `school`, case-insensitively. Guards against wrong-person
/// matches coming out of the identity chain.
pub fn attended_school(education: &[EducationEntry], school: &str) -> bool {
    let needle = school.to_lowercase();
    education.iter().any(|edu| {
        edu.school_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&needle)
    })
}

/// Select the first experience entry, in given order, that has a time period
/// but no end date (open-ended = current). Falls back to the unemployed
/// placeholder when no such entry exists.
pub fn current_employment(experience: &[ExperienceEntry]) -> Employment {
    for exp in experience {
        let Some(period) = &exp.time_period else {
            continue;
        };
        if period.end_date.is_some() {
            continue;
        }
        let location = exp.location_name.as_deref().unwrap_or(UNKNOWN);
        let (city, state, country) = split_location(location);
        return Employment {
            employer: exp
                .company_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            title: exp.title.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            city,
            state,
            country,
        };
    }
    Employment::unemployed()
}

/// Select the first education entry, in given order, whose end date (year
/// required, month defaulting to December, day fixed to the 1st) is strictly
/// after `today`. Entries that do not form a valid calendar date are skipped.
pub fn current_education(education: &[EducationEntry], today: NaiveDate) -> EducationStatus {
    for edu in education {
        let Some(end) = edu.time_period.as_ref().and_then(|p| p.end_date.as_ref()) else {
            continue;
        };
        let Some(year) = end.year else {
            continue;
        };
        let month = end.month.unwrap_or(12);
        let Some(end_date) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        if end_date > today {
            return EducationStatus {
                pursuing: true,
                school: edu
                    .school_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                degree: edu
                    .degree_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                field: edu
                    .field_of_study
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            };
        }
    }
    EducationStatus::none()
}

/// Split a location string on `", "` into city/state/country, right-padding
/// missing components with "N/A". Components beyond the third are ignored.
pub fn split_location(location: &str) -> (String, String, String) {
    let mut parts = location.split(", ").map(str::to_string);
    (
        parts.next().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        parts.next().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        parts.next().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PartialDate, TimePeriod};

    fn education(school: &str, end: Option<(Option<i32>, Option<u32>)>) -> EducationEntry {
        EducationEntry {
            school_name: Some(school.to_string()),
            degree_name: Some("BS".to_string()),
            field_of_study: Some("Computer Science".to_string()),
            time_period: end.map(|(year, month)| TimePeriod {
                start_date: None,
                end_date: Some(PartialDate { year, month }),
            }),
        }
    }

    fn experience(company: &str, location: &str, ended: bool) -> ExperienceEntry {
        ExperienceEntry {
            company_name: Some(company.to_string()),
            title: Some("Engineer".to_string()),
            location_name: Some(location.to_string()),
            time_period: Some(TimePeriod {
                start_date: Some(PartialDate {
                    year: Some(2020),
                    month: Some(1),
                }),
                end_date: ended.then(|| PartialDate {
                    year: Some(2023),
                    month: Some(6),
                }),
            }),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn school_match_is_case_insensitive_substring() {
        let edus = vec![education("UNIVERSITY OF MARYLAND", None)];
        assert!(attended_school(&edus, "university of maryland"));
        assert!(attended_school(&edus, "Maryland"));
        assert!(!attended_school(&edus, "Virginia Tech"));
        assert!(!attended_school(&[], "Maryland"));
    }

    #[test]
    fn missing_school_name_never_matches() {
        let edus = vec![EducationEntry::default()];
        assert!(!attended_school(&edus, "Maryland"));
    }

    #[test]
    fn first_open_ended_experience_wins() {
        let exps = vec![
            experience("Old Corp", "Boston, MA, USA", true),
            experience("Acme", "College Park, MD, USA", false),
            experience("Later LLC", "Austin, TX, USA", false),
        ];
        let emp = current_employment(&exps);
        assert_eq!(emp.employer, "Acme");
        assert_eq!(emp.title, "Engineer");
        assert_eq!(emp.city, "College Park");
        assert_eq!(emp.state, "MD");
        assert_eq!(emp.country, "USA");
    }

    #[test]
    fn entry_without_time_period_is_not_current() {
        let mut exp = experience("Acme", "College Park, MD, USA", false);
        exp.time_period = None;
        assert_eq!(current_employment(&[exp]).employer, UNEMPLOYED);
    }

    #[test]
    fn all_ended_means_unemployed() {
        let exps = vec![experience("Old Corp", "Boston, MA, USA", true)];
        let emp = current_employment(&exps);
        assert_eq!(emp.employer, UNEMPLOYED);
        assert_eq!(emp.title, NOT_AVAILABLE);
        assert_eq!(emp.city, NOT_AVAILABLE);
        assert_eq!(emp.state, NOT_AVAILABLE);
        assert_eq!(emp.country, NOT_AVAILABLE);
    }

    #[test]
    fn missing_fields_on_current_entry_fall_back_to_unknown() {
        let exp = ExperienceEntry {
            company_name: None,
            title: None,
            location_name: None,
            time_period: Some(TimePeriod::default()),
        };
        let emp = current_employment(&[exp]);
        assert_eq!(emp.employer, "Unknown");
        assert_eq!(emp.title, "Unknown");
        assert_eq!(emp.city, "Unknown");
        assert_eq!(emp.state, NOT_AVAILABLE);
        assert_eq!(emp.country, NOT_AVAILABLE);
    }

    #[test]
    fn location_split_right_pads() {
        assert_eq!(
            split_location("College Park"),
            ("College Park".into(), "N/A".into(), "N/A".into())
        );
        assert_eq!(
            split_location("College Park, MD"),
            ("College Park".into(), "MD".into(), "N/A".into())
        );
        assert_eq!(
            split_location("College Park, MD, USA, Earth"),
            ("College Park".into(), "MD".into(), "USA".into())
        );
    }

    #[test]
    fn first_future_education_entry_wins() {
        let edus = vec![
            education("Past School", Some((Some(2020), Some(5)))),
            education("Current School", Some((Some(2027), Some(5)))),
            education("Later School", Some((Some(2028), Some(5)))),
        ];
        let status = current_education(&edus, today());
        assert!(status.pursuing);
        assert_eq!(status.school, "Current School");
        assert_eq!(status.degree, "BS");
        assert_eq!(status.field, "Computer Science");
    }

    #[test]
    fn future_is_strict_at_month_granularity() {
        // ends this month: the comparison date is the 1st, already past
        let this_month = vec![education("School", Some((Some(2026), Some(8))))];
        assert!(!current_education(&this_month, today()).pursuing);

        // ends next month: 2026-09-01 is strictly after today
        let next_month = vec![education("School", Some((Some(2026), Some(9))))];
        assert!(current_education(&next_month, today()).pursuing);
    }

    #[test]
    fn missing_month_defaults_to_december() {
        let edus = vec![education("School", Some((Some(2026), None)))];
        assert!(current_education(&edus, today()).pursuing);

        let past = vec![education("School", Some((Some(2025), None)))];
        assert!(!current_education(&past, today()).pursuing);
    }

    #[test]
    fn unusable_end_dates_are_skipped() {
        let edus = vec![
            // no year at all
            education("No Year", Some((None, Some(5)))),
            // month out of range, not a real calendar date
            education("Bad Month", Some((Some(2030), Some(13)))),
            education("Good", Some((Some(2030), Some(5)))),
        ];
        let status = current_education(&edus, today());
        assert!(status.pursuing);
        assert_eq!(status.school, "Good");
    }

    #[test]
    fn no_education_entries_means_not_pursuing() {
        let status = current_education(&[], today());
        assert!(!status.pursuing);
        assert_eq!(status.school, NOT_AVAILABLE);
        assert_eq!(status.degree, NOT_AVAILABLE);
        assert_eq!(status.field, NOT_AVAILABLE);
    }
}
