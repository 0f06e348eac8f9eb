use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// A portfolio entry. Serialized with camelCase keys and RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub github_url: String,
    pub linkedin_url: String,
    pub demo_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated create request. Optional fields are already defaulted.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub github_url: String,
    pub linkedin_url: String,
    pub demo_url: String,
}

/// Partial update. `None` keeps the stored value, `Some` overwrites it,
/// including with an empty string or list.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub demo_url: Option<String>,
}

/// Drop sub-microsecond digits; TIMESTAMPTZ stores microseconds.
fn to_micros(t: OffsetDateTime) -> OffsetDateTime {
    t - Duration::nanoseconds(i64::from(t.nanosecond() % 1_000))
}

impl Project {
    pub fn from_new(new: NewProject, now: OffsetDateTime) -> Self {
        let now = to_micros(now);
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            images: new.images,
            github_url: new.github_url,
            linkedin_url: new.linkedin_url,
            demo_url: new.demo_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProjectPatch, now: OffsetDateTime) {
        fn merge<T>(slot: &mut T, v: Option<T>) {
            if let Some(v) = v {
                *slot = v;
            }
        }

        merge(&mut self.name, patch.name);
        merge(&mut self.description, patch.description);
        merge(&mut self.images, patch.images);
        merge(&mut self.github_url, patch.github_url);
        merge(&mut self.linkedin_url, patch.linkedin_url);
        merge(&mut self.demo_url, patch.demo_url);
        self.updated_at = to_micros(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Project {
        Project::from_new(
            NewProject {
                name: "Folio".into(),
                description: "My site".into(),
                images: vec!["https://img/1.png".into()],
                github_url: "https://github.com/me/folio".into(),
                ..NewProject::default()
            },
            datetime!(2024-01-01 0:00 UTC),
        )
    }

    #[test]
    fn omitted_fields_are_retained() {
        let mut p = sample();
        let before = p.clone();
        p.apply(
            ProjectPatch {
                description: Some("Rewritten".into()),
                ..ProjectPatch::default()
            },
            datetime!(2024-02-01 0:00 UTC),
        );

        assert_eq!(p.description, "Rewritten");
        assert_eq!(p.name, before.name);
        assert_eq!(p.images, before.images);
        assert_eq!(p.github_url, before.github_url);
        assert_eq!(p.id, before.id);
        assert_eq!(p.created_at, before.created_at);
        assert_eq!(p.updated_at, datetime!(2024-02-01 0:00 UTC));
    }

    #[test]
    fn explicit_empty_values_overwrite() {
        let mut p = sample();
        p.apply(
            ProjectPatch {
                github_url: Some(String::new()),
                images: Some(vec![]),
                ..ProjectPatch::default()
            },
            datetime!(2024-02-01 0:00 UTC),
        );

        assert_eq!(p.github_url, "");
        assert!(p.images.is_empty());
    }

    #[test]
    fn timestamps_are_kept_at_microsecond_precision() {
        let mut p = Project::from_new(
            NewProject::default(),
            datetime!(2024-01-01 0:00:00.123_456_789 UTC),
        );
        assert_eq!(p.created_at.nanosecond(), 123_456_000);
        assert_eq!(p.created_at, p.updated_at);

        p.apply(ProjectPatch::default(), datetime!(2024-01-02 0:00:00.000_000_999 UTC));
        assert_eq!(p.updated_at, datetime!(2024-01-02 0:00 UTC));
        assert_eq!(
            serde_json::to_value(&p).unwrap()["createdAt"],
            "2024-01-01T00:00:00.123456Z"
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["githubUrl"], "https://github.com/me/folio");
        assert_eq!(json["linkedinUrl"], "");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("github_url").is_none());
    }
}
