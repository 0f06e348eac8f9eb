use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    config::DbConfig,
    error::StoreError,
    projects::{
        repo::ProjectRepo,
        repo_types::{NewProject, Project, ProjectPatch},
    },
};

const PROJECT_COLUMNS: &str =
    "id, name, description, images, github_url, linkedin_url, demo_url, created_at, updated_at";

/// PostgreSQL-backed users and projects.
#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub async fn connect(cfg: &DbConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")
    }
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let user = User::from_new(new, OffsetDateTime::now_utc());
        let res = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> anyhow::Result<usize> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(n as usize)
    }
}

#[async_trait]
impl ProjectRepo for PgStore {
    async fn list(&self) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, new: NewProject) -> anyhow::Result<Project> {
        let p = Project::from_new(new, OffsetDateTime::now_utc());
        sqlx::query(
            r#"
            INSERT INTO projects
                (id, name, description, images, github_url, linkedin_url, demo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.images)
        .bind(&p.github_url)
        .bind(&p.linkedin_url)
        .bind(&p.demo_url)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.db)
        .await
        .context("insert project")?;
        Ok(p)
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> anyhow::Result<Option<Project>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let current = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut project) = current else {
            return Ok(None);
        };
        project.apply(patch, OffsetDateTime::now_utc());

        sqlx::query(
            r#"
            UPDATE projects
               SET name = $2, description = $3, images = $4, github_url = $5,
                   linkedin_url = $6, demo_url = $7, updated_at = $8
             WHERE id = $1
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.images)
        .bind(&project.github_url)
        .bind(&project.linkedin_url)
        .bind(&project.demo_url)
        .bind(project.updated_at)
        .execute(&mut *tx)
        .await
        .context("update project")?;

        tx.commit().await.context("commit tx")?;
        Ok(Some(project))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete project")?;
        Ok(res.rows_affected() > 0)
    }
}
