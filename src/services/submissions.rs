//! Project submissions: model, validation and grouping

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ClientError, ClientResult},
    state::RecordId,
};

/// Stored submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: RecordId,
    pub team_name: String,
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    pub github_link: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a create or edit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub team_name: String,
    pub project_name: String,
    pub project_description: String,
    pub github_link: String,
}

impl SubmissionForm {
    /// Trim every field and check the form before it is sent.
    pub fn validated(self) -> ClientResult<Self> {
        let form = Self {
            team_name: self.team_name.trim().to_string(),
            project_name: self.project_name.trim().to_string(),
            project_description: self.project_description.trim().to_string(),
            github_link: self.github_link.trim().to_string(),
        };

        for (field, value) in [
            ("team name", &form.team_name),
            ("project name", &form.project_name),
            ("project description", &form.project_description),
            ("GitHub link", &form.github_link),
        ] {
            if value.is_empty() {
                return Err(ClientError::validation(format!("{} is required", field)));
            }
        }

        if !form.github_link.starts_with("http://") && !form.github_link.starts_with("https://") {
            return Err(ClientError::validation(
                "Please enter a valid URL starting with http:// or https://",
            ));
        }

        Ok(form)
    }
}

/// Group submissions by team; teams come out sorted by name
pub fn group_by_team(submissions: Vec<Submission>) -> BTreeMap<String, Vec<Submission>> {
    let mut grouped: BTreeMap<String, Vec<Submission>> = BTreeMap::new();
    for submission in submissions {
        grouped
            .entry(submission.team_name.clone())
            .or_default()
            .push(submission);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(github: &str) -> SubmissionForm {
        SubmissionForm {
            team_name: "  Crab Rave ".to_string(),
            project_name: "Claw".to_string(),
            project_description: "A tiny async runtime".to_string(),
            github_link: github.to_string(),
        }
    }

    #[test]
    fn test_validation_trims_fields() {
        let form = form(" https://github.com/crab/claw ").validated().unwrap();
        assert_eq!(form.team_name, "Crab Rave");
        assert_eq!(form.github_link, "https://github.com/crab/claw");
    }

    #[test]
    fn test_validation_rejects_bad_link() {
        assert!(matches!(
            form("github.com/crab/claw").validated(),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_field() {
        let mut bad = form("https://example.com");
        bad.project_name = "   ".to_string();
        let err = bad.validated().unwrap_err();
        assert!(err.to_string().contains("project name"));
    }

    #[test]
    fn test_group_by_team_sorted() {
        let submission = |id: i64, team: &str| Submission {
            id: RecordId::Int(id),
            team_name: team.to_string(),
            project_name: format!("project-{}", id),
            project_description: String::new(),
            github_link: "https://example.com".to_string(),
            created_at: None,
        };

        let grouped = group_by_team(vec![
            submission(1, "Zeta"),
            submission(2, "Alpha"),
            submission(3, "Zeta"),
        ]);

        let teams: Vec<&String> = grouped.keys().collect();
        assert_eq!(teams, vec!["Alpha", "Zeta"]);
        assert_eq!(grouped["Zeta"].len(), 2);
        assert_eq!(grouped["Zeta"][1].id, RecordId::Int(3));
    }
}
