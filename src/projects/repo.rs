use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::projects::repo_types::{NewProject, Project, ProjectPatch};

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Project>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Project>>;
    async fn create(&self, new: NewProject) -> anyhow::Result<Project>;
    /// `None` when no project has this id; nothing is written in that case.
    async fn update(&self, id: Uuid, patch: ProjectPatch) -> anyhow::Result<Option<Project>>;
    /// `false` when no project has this id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, Project>,
    // insertion order, for listing
    order: Vec<Uuid>,
}

#[derive(Default)]
pub struct MemoryProjectRepo {
    inner: RwLock<Inner>,
}

impl MemoryProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepo for MemoryProjectRepo {
    async fn list(&self) -> anyhow::Result<Vec<Project>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        Ok(self.inner.read().await.by_id.get(&id).cloned())
    }

    async fn create(&self, new: NewProject) -> anyhow::Result<Project> {
        let project = Project::from_new(new, OffsetDateTime::now_utc());
        let mut inner = self.inner.write().await;
        inner.order.push(project.id);
        inner.by_id.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> anyhow::Result<Option<Project>> {
        let mut inner = self.inner.write().await;
        let Some(project) = inner.by_id.get_mut(&id) else {
            return Ok(None);
        };
        project.apply(patch, OffsetDateTime::now_utc());
        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.by_id.remove(&id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|o| *o != id);
        Ok(true)
    }
}
