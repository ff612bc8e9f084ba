use crate::error::CoreError;
use crate::models::{Category, Project, UpdateProjectData};
use crate::repository::SqliteRepository;
use crate::validation;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Categories every new project starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["Feature", "Fix", "Ergonomy", "Documentation", "Research"];

#[async_trait]
impl super::ProjectRepository for SqliteRepository {
    async fn add_project(
        &self,
        owner_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Project, CoreError> {
        validation::validate_project_name(&name)?;

        let mut tx = self.pool().begin().await?;

        let existing: Option<Project> = sqlx::query_as(
            "SELECT * FROM projects WHERE owner_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(owner_id)
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(CoreError::DuplicateName("project".to_string()));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::now_v7(),
            owner_id,
            name,
            description,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO projects (id, owner_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&mut *tx)
        .await?;

        for category_name in DEFAULT_CATEGORIES {
            let category = Category {
                id: Uuid::now_v7(),
                name: category_name.to_string(),
                project_id: project.id,
                created_at: now,
            };
            sqlx::query(
                "INSERT INTO categories (id, name, project_id, created_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(category.id)
            .bind(&category.name)
            .bind(category.project_id)
            .bind(category.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    async fn find_project_by_id(&self, id: Uuid) -> Result<Option<Project>, CoreError> {
        let project = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(project)
    }

    async fn find_project_by_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Option<Project>, CoreError> {
        let project = sqlx::query_as(
            "SELECT * FROM projects WHERE owner_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(owner_id)
        .bind(name)
        .fetch_optional(self.pool())
        .await?;
        Ok(project)
    }

    async fn find_projects(&self, owner_id: Uuid) -> Result<Vec<Project>, CoreError> {
        let projects =
            sqlx::query_as("SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at")
                .bind(owner_id)
                .fetch_all(self.pool())
                .await?;
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProjectData,
    ) -> Result<Project, CoreError> {
        let mut tx = self.pool().begin().await?;

        let project: Option<Project> = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut project = project.ok_or_else(|| CoreError::NotFound("Project not found".to_string()))?;

        if let Some(name) = data.name {
            validation::validate_project_name(&name)?;
            let clash: Option<Project> = sqlx::query_as(
                "SELECT * FROM projects WHERE owner_id = $1 AND LOWER(name) = LOWER($2) AND id != $3",
            )
            .bind(project.owner_id)
            .bind(&name)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
            if clash.is_some() {
                return Err(CoreError::DuplicateName("project".to_string()));
            }
            project.name = name;
        }
        if let Some(description) = data.description {
            project.description = description;
        }
        project.updated_at = Utc::now();

        sqlx::query(
            "UPDATE projects SET name = $1, description = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let project: Option<Project> = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if project.is_none() {
            return Err(CoreError::NotFound("Project not found".to_string()));
        }

        // Owned lifetime: tasks and categories go with the project, children first.
        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM categories WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
