use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::cv::CvFields;

/// A single failed requirement, addressed by its JSON path (e.g. `jobs.0.company`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CV validation failed: {}", format_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Wraps a body that did not deserialize into the schema (bad enum, bad date, wrong type).
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: "body".to_string(),
                message: message.into(),
            }],
        }
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks the required fields of a CV and all nested items.
///
/// Required: firstName, lastName; skills[].name; jobs[].title and jobs[].company;
/// education[].degree and education[].institution; certifications[].name.
/// A value made only of whitespace counts as missing.
pub fn validate_cv(fields: &CvFields) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    require(&mut issues, "firstName", &fields.first_name);
    require(&mut issues, "lastName", &fields.last_name);

    for (i, skill) in fields.skills.iter().enumerate() {
        require(&mut issues, &format!("skills.{i}.name"), &skill.name);
    }
    for (i, job) in fields.jobs.iter().enumerate() {
        require(&mut issues, &format!("jobs.{i}.title"), &job.title);
        require(&mut issues, &format!("jobs.{i}.company"), &job.company);
    }
    for (i, edu) in fields.education.iter().enumerate() {
        require(&mut issues, &format!("education.{i}.degree"), &edu.degree);
        require(
            &mut issues,
            &format!("education.{i}.institution"),
            &edu.institution,
        );
    }
    for (i, cert) in fields.certifications.iter().enumerate() {
        require(&mut issues, &format!("certifications.{i}.name"), &cert.name);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn require(issues: &mut Vec<FieldIssue>, path: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue {
            path: path.to_string(),
            message: "is required".to_string(),
        });
    }
}
