//! CV document schema.
//!
//! Wire and stored shapes share these types. Field names are camelCase on the
//! wire, identifiers are serialized as `_id`. Every nested list item carries its
//! own `_id`; items arriving without one get a fresh UUID during deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TEMPLATE: &str = "modern";
pub const DEFAULT_SKILL_CATEGORY: &str = "General";

// ────────────────────────────────────────────────────────────────────────────
// Skill levels
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Elementary,
    #[default]
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 6] = [
        SkillLevel::Beginner,
        SkillLevel::Elementary,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
        SkillLevel::Master,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Elementary => "Elementary",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
            SkillLevel::Master => "Master",
        }
    }

    /// Position on the 0–100 proficiency slider.
    pub fn score(self) -> u8 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Elementary => 20,
            SkillLevel::Intermediate => 40,
            SkillLevel::Advanced => 60,
            SkillLevel::Expert => 80,
            SkillLevel::Master => 100,
        }
    }

    /// Nearest level to a slider value. Ties resolve to the lower level.
    pub fn from_score(value: u8) -> SkillLevel {
        SkillLevel::ALL
            .into_iter()
            .min_by_key(|level| (i16::from(level.score()) - i16::from(value)).abs())
            .unwrap_or_default()
    }

    /// Lenient lookup used by display code: unknown labels fall back to Intermediate.
    pub fn from_label(label: &str) -> SkillLevel {
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.label() == label)
            .unwrap_or_default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nested items
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for SocialLink {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            platform: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub level: SkillLevel,
    pub category: String,
    pub years_of_experience: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            level: SkillLevel::default(),
            category: DEFAULT_SKILL_CATEGORY.to_string(),
            years_of_experience: 0.0,
            icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub responsibilities: Vec<String>,
    /// Skill names, not identifiers. Nothing keeps these in sync with `Cv::skills`.
    pub skills: Vec<String>,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            company: String::new(),
            location: None,
            start_date: None,
            end_date: None,
            current: false,
            description: None,
            responsibilities: Vec::new(),
            skills: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            degree: String::new(),
            field: None,
            institution: String::new(),
            location: None,
            start_date: None,
            end_date: None,
            current: false,
            description: None,
            grade: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for Certification {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            issuer: None,
            issue_date: None,
            expiry_date: None,
            credential_id: None,
            url: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CV document
// ────────────────────────────────────────────────────────────────────────────

/// The editable content of a CV: everything except identity and timestamps.
/// This is what gets stored as the JSONB document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvFields {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// URL or inline `data:` URL. Treated as opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub skills: Vec<Skill>,
    pub jobs: Vec<Job>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub is_public: bool,
    pub template: String,
}

impl Default for CvFields {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            title: None,
            email: None,
            phone: None,
            location: None,
            website: None,
            summary: None,
            profile_picture: None,
            social_links: Vec::new(),
            skills: Vec::new(),
            jobs: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            is_public: false,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Request body for create and replace. `slug` is only honored on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub fields: CvFields,
}

impl From<CvFields> for CvDraft {
    fn from(fields: CvFields) -> Self {
        Self { slug: None, fields }
    }
}

/// A stored CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub slug: String,
    #[serde(flatten)]
    pub fields: CvFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection returned by the collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub slug: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl From<&Cv> for CvSummary {
    fn from(cv: &Cv) -> Self {
        Self {
            id: cv.id,
            first_name: cv.fields.first_name.clone(),
            last_name: cv.fields.last_name.clone(),
            title: cv.fields.title.clone(),
            profile_picture: cv.fields.profile_picture.clone(),
            updated_at: cv.updated_at,
            slug: cv.slug.clone(),
            skills: cv.fields.skills.clone(),
            jobs: cv.fields.jobs.clone(),
        }
    }
}

/// `firstName-lastName-millis`, lowercased, whitespace runs collapsed to `-`.
pub fn derive_slug(first_name: &str, last_name: &str, millis: i64) -> String {
    let raw = format!("{first_name}-{last_name}-{millis}").to_lowercase();
    let mut slug = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    slug
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM` (first of month) or an RFC 3339 timestamp.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

mod date_format {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_flexible_date(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derive_slug_lowercases_and_joins() {
        assert_eq!(
            derive_slug("Ada", "Lovelace", 1700000000000),
            "ada-lovelace-1700000000000"
        );
    }

    #[test]
    fn test_derive_slug_collapses_whitespace() {
        assert_eq!(
            derive_slug("Mary  Ann", "Van Dyke", 5),
            "mary-ann-van-dyke-5"
        );
    }

    #[test]
    fn test_skill_level_from_score_nearest() {
        assert_eq!(SkillLevel::from_score(0), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_score(58), SkillLevel::Advanced);
        assert_eq!(SkillLevel::from_score(95), SkillLevel::Master);
    }

    #[test]
    fn test_skill_level_from_score_tie_goes_low() {
        assert_eq!(SkillLevel::from_score(50), SkillLevel::Intermediate);
    }

    #[test]
    fn test_skill_level_unknown_label_is_intermediate() {
        assert_eq!(SkillLevel::from_label("Guru"), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_label("Expert"), SkillLevel::Expert);
    }

    #[test]
    fn test_skill_defaults_applied() {
        let skill: Skill = serde_json::from_value(json!({ "name": "Rust" })).unwrap();
        assert_eq!(skill.level, SkillLevel::Intermediate);
        assert_eq!(skill.category, "General");
        assert_eq!(skill.years_of_experience, 0.0);
        assert!(!skill.id.is_nil());
    }

    #[test]
    fn test_bad_skill_level_rejected() {
        let result: Result<Skill, _> =
            serde_json::from_value(json!({ "name": "Rust", "level": "Guru" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_item_keeps_supplied_id() {
        let id = Uuid::new_v4();
        let job: Job =
            serde_json::from_value(json!({ "_id": id, "title": "Dev", "company": "Acme" }))
                .unwrap();
        assert_eq!(job.id, id);
    }

    #[test]
    fn test_month_dates_accepted_and_emitted_as_days() {
        let job: Job = serde_json::from_value(json!({
            "title": "Dev",
            "company": "Acme",
            "startDate": "2021-03",
            "endDate": "2023-07-15T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(job.start_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(job.end_date, NaiveDate::from_ymd_opt(2023, 7, 15));

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["startDate"], "2021-03-01");
    }

    #[test]
    fn test_empty_date_string_is_none() {
        let cert: Certification =
            serde_json::from_value(json!({ "name": "CKA", "issueDate": "" })).unwrap();
        assert!(cert.issue_date.is_none());
    }

    #[test]
    fn test_garbage_date_rejected() {
        let result: Result<Education, _> =
            serde_json::from_value(json!({ "degree": "BSc", "institution": "MIT", "startDate": "soon" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_reads_slug_and_fields() {
        let draft: CvDraft = serde_json::from_value(json!({
            "slug": "custom",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "isPublic": true
        }))
        .unwrap();
        assert_eq!(draft.slug.as_deref(), Some("custom"));
        assert_eq!(draft.fields.first_name, "Ada");
        assert!(draft.fields.is_public);
        assert_eq!(draft.fields.template, "modern");
    }

    #[test]
    fn test_cv_serializes_flat_with_underscore_id() {
        let now = Utc::now();
        let cv = Cv {
            id: Uuid::new_v4(),
            slug: "ada-lovelace-1".to_string(),
            fields: CvFields {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                ..CvFields::default()
            },
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&cv).unwrap();
        assert_eq!(value["_id"], json!(cv.id));
        assert_eq!(value["firstName"], "Ada");
        assert!(value.get("fields").is_none());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_summary_projection() {
        let now = Utc::now();
        let cv = Cv {
            id: Uuid::new_v4(),
            slug: "s".to_string(),
            fields: CvFields {
                first_name: "Ada".to_string(),
                email: Some("ada@example.com".to_string()),
                skills: vec![Skill::default()],
                ..CvFields::default()
            },
            created_at: now,
            updated_at: now,
        };
        let summary = CvSummary::from(&cv);
        assert_eq!(summary.skills.len(), 1);
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("email").is_none());
        assert_eq!(value["slug"], "s");
    }
}
