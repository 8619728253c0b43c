// src/resolve/mod.rs

pub mod extract;
pub mod identity;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetch::PeopleClient;
use crate::profile::{self, RawProfile};
use identity::{Candidate, IdentitySource, LookupQuery};

/// The complete, atomic set of fields written back into a roster row. Either
/// all of these land in the row or none do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub informal_name: String,
    pub date_of_lookup: String,
    pub linkedin_url: Option<String>,
    pub current_employer_name: String,
    pub job_title: String,
    pub employment_city: String,
    pub employment_state: String,
    pub employment_country: String,
    pub currently_pursuing_education: String,
    pub school_name: String,
    pub degree_name: String,
    pub field_of_study: String,
    pub attended_target_school: String,
}

/// Why a name produced no profile. None of these abort the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceReason {
    /// Every identity source came up empty.
    NoIdentity,
    /// The profile fetch returned an empty or non-object payload.
    EmptyProfile,
    /// The payload was an object but not decodable as a profile.
    MalformedProfile,
    /// No education entry matched the target school.
    SchoolMismatch,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbsenceReason::NoIdentity => "no identity candidate",
            AbsenceReason::EmptyProfile => "empty profile payload",
            AbsenceReason::MalformedProfile => "malformed profile payload",
            AbsenceReason::SchoolMismatch => "no matching school",
        };
        f.write_str(s)
    }
}

/// Per-name outcome: either a full record to merge, or a reason there is
/// none. Transport-level faults surface as `Err` from [`Resolver::resolve`]
/// and are handled at the batch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Box<ResolvedProfile>),
    Absent(AbsenceReason),
}

/// Composes the identity-source chain with the profile fetch and the field
/// extraction. One instance serves the whole batch.
pub struct Resolver {
    sources: Vec<Box<dyn IdentitySource>>,
    people: Arc<PeopleClient>,
}

impl Resolver {
    pub fn new(sources: Vec<Box<dyn IdentitySource>>, people: Arc<PeopleClient>) -> Self {
        Self { sources, people }
    }

    /// Resolve one name end to end. `Ok(Absent(_))` is the normal miss path;
    /// `Err` means an unexpected fault while talking to a collaborator.
    pub async fn resolve(&self, query: &LookupQuery) -> Result<Resolution> {
        let Some(candidate) = identity::resolve_identity(&self.sources, query).await else {
            return Ok(Resolution::Absent(AbsenceReason::NoIdentity));
        };
        debug!(name = %query.name, public_id = %candidate.public_id, "fetching profile");

        let payload = self.people.get_profile(&candidate.public_id).await?;
        if !profile::is_populated(&payload) {
            return Ok(Resolution::Absent(AbsenceReason::EmptyProfile));
        }
        let raw = match profile::parse_profile(payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(name = %query.name, error = %e, "undecodable profile payload");
                return Ok(Resolution::Absent(AbsenceReason::MalformedProfile));
            }
        };

        Ok(build_profile(
            query,
            &candidate,
            &raw,
            Local::now().date_naive(),
        ))
    }
}

/// Eligibility filter plus field extraction and assembly, separated from the
/// network path so the selection rules can be tested against a fixed date.
pub fn build_profile(
    query: &LookupQuery,
    candidate: &Candidate,
    raw: &RawProfile,
    today: NaiveDate,
) -> Resolution {
    if !extract::attended_school(&raw.education, &query.school_filter) {
        return Resolution::Absent(AbsenceReason::SchoolMismatch);
    }

    let employment = extract::current_employment(&raw.experience);
    let education = extract::current_education(&raw.education, today);

    Resolution::Resolved(Box::new(ResolvedProfile {
        informal_name: query.name.clone(),
        date_of_lookup: today.format("%Y-%m-%d").to_string(),
        linkedin_url: candidate.profile_url.clone(),
        current_employer_name: employment.employer,
        job_title: employment.title,
        employment_city: employment.city,
        employment_state: employment.state,
        employment_country: employment.country,
        currently_pursuing_education: if education.pursuing { "Yes" } else { "No" }.to_string(),
        school_name: education.school,
        degree_name: education.degree,
        field_of_study: education.field,
        attended_target_school: "Yes".to_string(),
    }))
}
