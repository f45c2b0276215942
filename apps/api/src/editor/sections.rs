//! Sections of the editing surface and the slices of the draft they own.

use std::collections::HashMap;

use crate::editor::item::{ItemEditor, ListItem};
use crate::models::cv::{
    Certification, CvFields, Education, Job, Skill, SkillLevel, SocialLink,
    DEFAULT_SKILL_CATEGORY,
};

pub const SKILL_CATEGORIES: &[&str] = &[
    "Languages",
    "Frameworks",
    "Databases",
    "Cloud & DevOps",
    "Tools",
    "Soft Skills",
    "General",
];

// ────────────────────────────────────────────────────────────────────────────
// Personal info slice
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub profile_picture: Option<String>,
    pub social_links: Vec<SocialLink>,
}

impl PersonalInfo {
    pub fn from_fields(fields: &CvFields) -> Self {
        Self {
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            title: fields.title.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            location: fields.location.clone(),
            website: fields.website.clone(),
            summary: fields.summary.clone(),
            profile_picture: fields.profile_picture.clone(),
            social_links: fields.social_links.clone(),
        }
    }

    pub fn add_social_link(&mut self) {
        self.social_links.push(SocialLink::default());
    }

    pub fn remove_social_link(&mut self, index: usize) -> bool {
        if index < self.social_links.len() {
            self.social_links.remove(index);
            true
        } else {
            false
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Slice updates
// ────────────────────────────────────────────────────────────────────────────

/// A whole-slice replacement. The only way the editing surface changes a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionUpdate {
    PersonalInfo(PersonalInfo),
    Skills(Vec<Skill>),
    Jobs(Vec<Job>),
    Education(Vec<Education>),
    Certifications(Vec<Certification>),
}

impl SectionUpdate {
    pub fn apply_to(self, draft: &mut CvFields) {
        match self {
            SectionUpdate::PersonalInfo(info) => {
                draft.first_name = info.first_name;
                draft.last_name = info.last_name;
                draft.title = info.title;
                draft.email = info.email;
                draft.phone = info.phone;
                draft.location = info.location;
                draft.website = info.website;
                draft.summary = info.summary;
                draft.profile_picture = info.profile_picture;
                draft.social_links = info.social_links;
            }
            SectionUpdate::Skills(skills) => draft.skills = skills,
            SectionUpdate::Jobs(jobs) => draft.jobs = jobs,
            SectionUpdate::Education(education) => draft.education = education,
            SectionUpdate::Certifications(certs) => draft.certifications = certs,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List sections
// ────────────────────────────────────────────────────────────────────────────

/// Local editing state for every list section of one session.
#[derive(Debug, Clone, Default)]
pub struct SectionEditors {
    pub skills: ItemEditor<Skill>,
    pub jobs: ItemEditor<Job>,
    pub education: ItemEditor<Education>,
    pub certifications: ItemEditor<Certification>,
}

/// Binds a list section to its slice of the draft and its item editor.
pub trait ListSection {
    type Item: ListItem;

    fn items(draft: &CvFields) -> &[Self::Item];
    fn update(items: Vec<Self::Item>) -> SectionUpdate;
    fn editor(editors: &SectionEditors) -> &ItemEditor<Self::Item>;
    fn editor_mut(editors: &mut SectionEditors) -> &mut ItemEditor<Self::Item>;
}

pub struct Skills;
pub struct Jobs;
pub struct EducationList;
pub struct Certifications;

impl ListSection for Skills {
    type Item = Skill;

    fn items(draft: &CvFields) -> &[Skill] {
        &draft.skills
    }
    fn update(items: Vec<Skill>) -> SectionUpdate {
        SectionUpdate::Skills(items)
    }
    fn editor(editors: &SectionEditors) -> &ItemEditor<Skill> {
        &editors.skills
    }
    fn editor_mut(editors: &mut SectionEditors) -> &mut ItemEditor<Skill> {
        &mut editors.skills
    }
}

impl ListSection for Jobs {
    type Item = Job;

    fn items(draft: &CvFields) -> &[Job] {
        &draft.jobs
    }
    fn update(items: Vec<Job>) -> SectionUpdate {
        SectionUpdate::Jobs(items)
    }
    fn editor(editors: &SectionEditors) -> &ItemEditor<Job> {
        &editors.jobs
    }
    fn editor_mut(editors: &mut SectionEditors) -> &mut ItemEditor<Job> {
        &mut editors.jobs
    }
}

impl ListSection for EducationList {
    type Item = Education;

    fn items(draft: &CvFields) -> &[Education] {
        &draft.education
    }
    fn update(items: Vec<Education>) -> SectionUpdate {
        SectionUpdate::Education(items)
    }
    fn editor(editors: &SectionEditors) -> &ItemEditor<Education> {
        &editors.education
    }
    fn editor_mut(editors: &mut SectionEditors) -> &mut ItemEditor<Education> {
        &mut editors.education
    }
}

impl ListSection for Certifications {
    type Item = Certification;

    fn items(draft: &CvFields) -> &[Certification] {
        &draft.certifications
    }
    fn update(items: Vec<Certification>) -> SectionUpdate {
        SectionUpdate::Certifications(items)
    }
    fn editor(editors: &SectionEditors) -> &ItemEditor<Certification> {
        &editors.certifications
    }
    fn editor_mut(editors: &mut SectionEditors) -> &mut ItemEditor<Certification> {
        &mut editors.certifications
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// The one-step "add skill" form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSkillForm {
    pub name: String,
    pub category: String,
    pub level: SkillLevel,
}

impl Default for NewSkillForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: DEFAULT_SKILL_CATEGORY.to_string(),
            level: SkillLevel::Intermediate,
        }
    }
}

impl NewSkillForm {
    /// `None` when the trimmed name is empty.
    pub fn into_skill(self) -> Option<Skill> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Skill {
            name: name.to_string(),
            category: self.category,
            level: self.level,
            ..Skill::default()
        })
    }
}

/// Skills grouped by category, categories in first-seen order.
/// A blank category is shown as "General".
pub fn group_skills_by_category(skills: &[Skill]) -> Vec<(String, Vec<&Skill>)> {
    let mut groups: Vec<(String, Vec<&Skill>)> = Vec::new();
    for skill in skills {
        let category = if skill.category.trim().is_empty() {
            DEFAULT_SKILL_CATEGORY
        } else {
            skill.category.as_str()
        };
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, members)) => members.push(skill),
            None => groups.push((category.to_string(), vec![skill])),
        }
    }
    groups
}

/// Skill name → jobs that reference it, as `"title @ company"` (or just the title).
pub fn skill_usage(jobs: &[Job]) -> HashMap<String, Vec<String>> {
    let mut usage: HashMap<String, Vec<String>> = HashMap::new();
    for job in jobs {
        let label = if job.company.is_empty() {
            job.title.clone()
        } else {
            format!("{} @ {}", job.title, job.company)
        };
        for skill_name in &job.skills {
            usage
                .entry(skill_name.clone())
                .or_default()
                .push(label.clone());
        }
    }
    usage
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// Appends a trimmed responsibility to a job's local copy. Blank input is ignored.
pub fn add_responsibility(job: &mut Job, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    job.responsibilities.push(text.to_string());
    true
}

pub fn remove_responsibility(job: &mut Job, index: usize) -> bool {
    if index < job.responsibilities.len() {
        job.responsibilities.remove(index);
        true
    } else {
        false
    }
}
