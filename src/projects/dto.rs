use serde::{Deserialize, Serialize};

use crate::projects::repo_types::{NewProject, Project, ProjectPatch};

/// Body of `POST /projects` and `PUT /projects/:id`.
///
/// Create requires `name` and `description`; update treats every field as optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

impl ProjectInput {
    /// `None` when `name` or `description` is missing or empty.
    pub fn into_new(self) -> Option<NewProject> {
        let name = self.name.filter(|s| !s.is_empty())?;
        let description = self.description.filter(|s| !s.is_empty())?;
        Some(NewProject {
            name,
            description,
            images: self.images.unwrap_or_default(),
            github_url: self.github_url.unwrap_or_default(),
            linkedin_url: self.linkedin_url.unwrap_or_default(),
            demo_url: self.demo_url.unwrap_or_default(),
        })
    }

    pub fn into_patch(self) -> ProjectPatch {
        ProjectPatch {
            name: self.name,
            description: self.description,
            images: self.images,
            github_url: self.github_url,
            linkedin_url: self.linkedin_url,
            demo_url: self.demo_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectEnvelope {
    pub project: Project,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
