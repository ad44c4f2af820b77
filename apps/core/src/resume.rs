//! JSON-Resume data model.
//!
//! Field names follow the JSON Resume schema (<https://jsonresume.org/schema/>)
//! exactly, so documents exported here are interchangeable with any other
//! JSON-Resume tooling. Every list field deserializes to an empty vector when
//! absent and is skipped on serialization when empty, which keeps
//! export-then-import lossless.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basics: Option<Basics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work: Vec<Work>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volunteer: Vec<Volunteer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<Education>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<Award>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<Certificate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<Publication>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<Language>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<Interest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Absent means the engagement is current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text proficiency label ("Advanced", "Native", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section registry
// ────────────────────────────────────────────────────────────────────────────

/// Closed enumeration of resume sections. The declaration order is the
/// display and render order; changing it is a breaking change for every
/// consumer (registry, predicates, render engine, route parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Basics,
    Work,
    Education,
    Skills,
    Projects,
    Certificates,
    Awards,
    Publications,
    Languages,
    Volunteer,
    Interests,
    References,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::Basics,
        SectionId::Work,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Certificates,
        SectionId::Awards,
        SectionId::Publications,
        SectionId::Languages,
        SectionId::Volunteer,
        SectionId::Interests,
        SectionId::References,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Basics => "basics",
            SectionId::Work => "work",
            SectionId::Education => "education",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::Certificates => "certificates",
            SectionId::Awards => "awards",
            SectionId::Publications => "publications",
            SectionId::Languages => "languages",
            SectionId::Volunteer => "volunteer",
            SectionId::Interests => "interests",
            SectionId::References => "references",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown resume section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// One row of the section registry consumed by navigation and visibility
/// toggles. Icon names match the original UI icon set.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionInfo {
    pub id: SectionId,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const SECTIONS: [SectionInfo; 12] = [
    SectionInfo { id: SectionId::Basics, label: "Basic Info", icon: "user" },
    SectionInfo { id: SectionId::Work, label: "Work Experience", icon: "briefcase" },
    SectionInfo { id: SectionId::Education, label: "Education", icon: "academic-cap" },
    SectionInfo { id: SectionId::Skills, label: "Skills", icon: "sparkles" },
    SectionInfo { id: SectionId::Projects, label: "Projects", icon: "folder" },
    SectionInfo { id: SectionId::Certificates, label: "Certificates", icon: "badge-check" },
    SectionInfo { id: SectionId::Awards, label: "Awards", icon: "trophy" },
    SectionInfo { id: SectionId::Publications, label: "Publications", icon: "book-open" },
    SectionInfo { id: SectionId::Languages, label: "Languages", icon: "globe" },
    SectionInfo { id: SectionId::Volunteer, label: "Volunteer", icon: "heart" },
    SectionInfo { id: SectionId::Interests, label: "Interests", icon: "star" },
    SectionInfo { id: SectionId::References, label: "References", icon: "users" },
];

// ────────────────────────────────────────────────────────────────────────────
// Derived helpers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("invalid {section} data: {source}")]
pub struct SectionDataError {
    pub section: SectionId,
    #[source]
    pub source: serde_json::Error,
}

impl JsonResume {
    /// A materialized resume: every composite field present in its empty
    /// form, so section editors always have something to write into.
    pub fn empty() -> Self {
        JsonResume {
            basics: Some(Basics {
                location: Some(Location::default()),
                ..Basics::default()
            }),
            ..JsonResume::default()
        }
    }

    /// Pure content predicate, total over the 12-section enumeration.
    pub fn section_has_content(&self, section: SectionId) -> bool {
        match section {
            SectionId::Basics => self
                .basics
                .as_ref()
                .map(|b| !b.name.is_empty() || !b.email.is_empty())
                .unwrap_or(false),
            SectionId::Work => !self.work.is_empty(),
            SectionId::Education => !self.education.is_empty(),
            SectionId::Skills => !self.skills.is_empty(),
            SectionId::Projects => !self.projects.is_empty(),
            SectionId::Certificates => !self.certificates.is_empty(),
            SectionId::Awards => !self.awards.is_empty(),
            SectionId::Publications => !self.publications.is_empty(),
            SectionId::Languages => !self.languages.is_empty(),
            SectionId::Volunteer => !self.volunteer.is_empty(),
            SectionId::Interests => !self.interests.is_empty(),
            SectionId::References => !self.references.is_empty(),
        }
    }

    /// Percentage of sections with content, rounded to the nearest integer.
    pub fn completion_percent(&self) -> u8 {
        let populated = SectionId::ALL
            .iter()
            .filter(|s| self.section_has_content(**s))
            .count();
        ((populated as f64 / SectionId::ALL.len() as f64) * 100.0).round() as u8
    }

    /// Replaces one section from raw JSON. Each arm deserializes into the
    /// concrete section type, so malformed payloads are rejected without
    /// touching the document.
    pub fn apply_section(
        &mut self,
        section: SectionId,
        data: Value,
    ) -> Result<(), SectionDataError> {
        let wrap = |source| SectionDataError { section, source };
        match section {
            SectionId::Basics => self.basics = Some(serde_json::from_value(data).map_err(wrap)?),
            SectionId::Work => self.work = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Education => self.education = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Skills => self.skills = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Projects => self.projects = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Certificates => {
                self.certificates = serde_json::from_value(data).map_err(wrap)?
            }
            SectionId::Awards => self.awards = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Publications => {
                self.publications = serde_json::from_value(data).map_err(wrap)?
            }
            SectionId::Languages => self.languages = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Volunteer => self.volunteer = serde_json::from_value(data).map_err(wrap)?,
            SectionId::Interests => self.interests = serde_json::from_value(data).map_err(wrap)?,
            SectionId::References => {
                self.references = serde_json::from_value(data).map_err(wrap)?
            }
        }
        Ok(())
    }

    /// Derived copy with the given sections suppressed. Produced only for
    /// rendering; never persisted.
    pub fn with_sections_hidden(&self, hidden: &[SectionId]) -> JsonResume {
        let mut out = self.clone();
        for section in hidden {
            match section {
                SectionId::Basics => out.basics = None,
                SectionId::Work => out.work.clear(),
                SectionId::Education => out.education.clear(),
                SectionId::Skills => out.skills.clear(),
                SectionId::Projects => out.projects.clear(),
                SectionId::Certificates => out.certificates.clear(),
                SectionId::Awards => out.awards.clear(),
                SectionId::Publications => out.publications.clear(),
                SectionId::Languages => out.languages.clear(),
                SectionId::Volunteer => out.volunteer.clear(),
                SectionId::Interests => out.interests.clear(),
                SectionId::References => out.references.clear(),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_resume_has_no_content_anywhere() {
        let resume = JsonResume::empty();
        for section in SectionId::ALL {
            assert!(
                !resume.section_has_content(section),
                "empty resume reported content in {section}"
            );
        }
        assert_eq!(resume.completion_percent(), 0);
    }

    #[test]
    fn test_single_populated_section_is_the_only_one_reported() {
        let mut resume = JsonResume::empty();
        resume.skills.push(Skill {
            name: Some("Rust".to_string()),
            ..Skill::default()
        });
        for section in SectionId::ALL {
            assert_eq!(
                resume.section_has_content(section),
                section == SectionId::Skills
            );
        }
    }

    #[test]
    fn test_basics_content_requires_name_or_email() {
        let mut resume = JsonResume::empty();
        assert!(!resume.section_has_content(SectionId::Basics));

        resume.basics.as_mut().unwrap().email = "jane@x.com".to_string();
        assert!(resume.section_has_content(SectionId::Basics));
    }

    #[test]
    fn test_completion_monotonic_on_adding_content() {
        let mut resume = JsonResume::empty();
        let before = resume.completion_percent();
        resume.work.push(Work::default());
        let after = resume.completion_percent();
        assert!(after >= before);
        assert_eq!(after, 8); // round(100 * 1/12)
    }

    #[test]
    fn test_completion_drops_to_zero_when_last_section_emptied() {
        let mut resume = JsonResume::empty();
        resume.work.push(Work::default());
        assert!(resume.completion_percent() > 0);
        resume.work.clear();
        assert_eq!(resume.completion_percent(), 0);
    }

    #[test]
    fn test_completion_full_resume_is_100() {
        let mut resume = JsonResume::empty();
        resume.basics.as_mut().unwrap().name = "Jane".to_string();
        resume.work.push(Work::default());
        resume.education.push(Education::default());
        resume.skills.push(Skill::default());
        resume.projects.push(Project::default());
        resume.certificates.push(Certificate::default());
        resume.awards.push(Award::default());
        resume.publications.push(Publication::default());
        resume.languages.push(Language::default());
        resume.volunteer.push(Volunteer::default());
        resume.interests.push(Interest::default());
        resume.references.push(Reference::default());
        assert_eq!(resume.completion_percent(), 100);
    }

    #[test]
    fn test_section_id_round_trips_through_str() {
        for section in SectionId::ALL {
            assert_eq!(section.as_str().parse::<SectionId>().unwrap(), section);
        }
        assert!("garbage".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_registry_order_matches_enum_order() {
        for (info, id) in SECTIONS.iter().zip(SectionId::ALL) {
            assert_eq!(info.id, id);
        }
    }

    #[test]
    fn test_apply_section_replaces_work() {
        let mut resume = JsonResume::empty();
        resume
            .apply_section(
                SectionId::Work,
                json!([{"name": "Acme", "position": "Engineer"}]),
            )
            .unwrap();
        assert_eq!(resume.work.len(), 1);
        assert_eq!(resume.work[0].name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_apply_section_rejects_malformed_payload() {
        let mut resume = JsonResume::empty();
        resume.work.push(Work::default());
        let err = resume
            .apply_section(SectionId::Work, json!({"not": "a list"}))
            .unwrap_err();
        assert_eq!(err.section, SectionId::Work);
        // Failed patch must leave the document untouched.
        assert_eq!(resume.work.len(), 1);
    }

    #[test]
    fn test_hidden_sections_are_suppressed_in_derived_copy() {
        let mut resume = JsonResume::empty();
        resume.basics.as_mut().unwrap().name = "Jane".to_string();
        resume.work.push(Work::default());
        resume.skills.push(Skill::default());

        let filtered = resume.with_sections_hidden(&[SectionId::Work]);
        assert!(!filtered.section_has_content(SectionId::Work));
        assert!(filtered.section_has_content(SectionId::Skills));
        // The original is untouched.
        assert!(resume.section_has_content(SectionId::Work));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let resume: JsonResume = serde_json::from_value(json!({
            "work": [{"startDate": "2021-01", "endDate": "2022-06"}],
            "basics": {"name": "Jane", "email": "jane@x.com",
                       "location": {"postalCode": "12345", "countryCode": "US"}}
        }))
        .unwrap();
        assert_eq!(resume.work[0].start_date.as_deref(), Some("2021-01"));
        let loc = resume.basics.unwrap().location.unwrap();
        assert_eq!(loc.postal_code.as_deref(), Some("12345"));
        assert_eq!(loc.country_code.as_deref(), Some("US"));
    }
}
