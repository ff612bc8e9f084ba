use crate::error::CoreError;
use crate::lifecycle::{self, CategoryDeletion};
use crate::models::Category;
use crate::repository::SqliteRepository;
use crate::validation;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::CategoryRepository for SqliteRepository {
    async fn add_category(&self, project_id: Uuid, name: String) -> Result<Category, CoreError> {
        validation::validate_category_name(&name)?;

        let mut tx = self.pool().begin().await?;

        let existing: Option<Category> = sqlx::query_as(
            "SELECT * FROM categories WHERE project_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(project_id)
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(CoreError::DuplicateName("category".to_string()));
        }

        let category = Category {
            id: Uuid::now_v7(),
            name,
            project_id,
            created_at: Utc::now(),
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

        tx.commit().await?;
        Ok(category)
    }

    async fn find_category_by_id(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, CoreError> {
        let category =
            sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .fetch_optional(self.pool())
                .await?;
        Ok(category)
    }

    async fn find_categories(&self, project_id: Uuid) -> Result<Vec<Category>, CoreError> {
        let categories =
            sqlx::query_as("SELECT * FROM categories WHERE project_id = $1 ORDER BY created_at, rowid")
                .bind(project_id)
                .fetch_all(self.pool())
                .await?;
        Ok(categories)
    }

    async fn rename_category(
        &self,
        project_id: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Category, CoreError> {
        validation::validate_category_name(&name)?;

        let mut tx = self.pool().begin().await?;

        let category: Option<Category> =
            sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        let mut category =
            category.ok_or_else(|| CoreError::NotFound("Category not found".to_string()))?;

        let clash: Option<Category> = sqlx::query_as(
            "SELECT * FROM categories WHERE project_id = $1 AND LOWER(name) = LOWER($2) AND id != $3",
        )
        .bind(project_id)
        .bind(&name)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if clash.is_some() {
            return Err(CoreError::DuplicateName("category".to_string()));
        }

        category.name = name;
        sqlx::query("UPDATE categories SET name = $1 WHERE id = $2")
            .bind(&category.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    async fn delete_category(
        &self,
        project_id: Uuid,
        id: Uuid,
        reassign_to: Option<Uuid>,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let category: Option<Category> =
            sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if category.is_none() {
            return Err(CoreError::NotFound("Category not found".to_string()));
        }

        let category_count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&mut *tx)
                .await?;

        let task_count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let plan = lifecycle::resolve_category_deletion(category_count.0, task_count.0, reassign_to)?;

        if let CategoryDeletion::ReassignThenDelete { to } = plan {
            if to == id {
                return Err(CoreError::InvalidInput(
                    "cannot reassign tasks to the category being deleted".to_string(),
                ));
            }

            let target: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
                .bind(to)
                .fetch_optional(&mut *tx)
                .await?;
            let target = target.ok_or(CoreError::InvalidReassignmentTarget)?;
            lifecycle::check_reassignment_target(&target, project_id)?;

            sqlx::query("UPDATE tasks SET category_id = $1 WHERE category_id = $2")
                .bind(to)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
