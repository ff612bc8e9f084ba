use crate::error::CoreError;
use crate::lifecycle;
use crate::models::{
    Category, NewTaskData, Task, TaskFilter, TaskPatch, TaskPriority, TaskSection, TaskStatus,
};
use crate::ordering;
use crate::repository::SqliteRepository;
use crate::validation;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use uuid::Uuid;

impl SqliteRepository {
    async fn find_task_in_transaction<'a>(
        &self,
        tx: &mut Transaction<'a, Sqlite>,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(task)
    }

    /// Writes the full persistable field set for a task. Lifecycle-derived
    /// fields always come from the snapshot produced by the pure functions,
    /// never from the incoming patch.
    async fn write_task_fields<'a>(
        &self,
        tx: &mut Transaction<'a, Sqlite>,
        task: &Task,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"UPDATE tasks SET
                title = $1, description = $2, deadline = $3,
                estimate_value = $4, estimate_unit = $5,
                status = $6, section = $7, priority = $8, notes = $9,
                completed_at = $10, category_id = $11, updated_at = $12
            WHERE id = $13
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.estimate_value)
        .bind(task.estimate_unit)
        .bind(task.status)
        .bind(task.section)
        .bind(task.priority)
        .bind(&task.notes)
        .bind(task.completed_at)
        .bind(task.category_id)
        .bind(task.updated_at)
        .bind(task.id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, project_id: Uuid, data: NewTaskData) -> Result<Task, CoreError> {
        validation::validate_task_title(&data.title)?;
        if let Some(estimate) = &data.estimate {
            validation::validate_estimate(estimate)?;
        }

        let mut tx = self.pool().begin().await?;

        let category: Option<Category> =
            sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND project_id = $2")
                .bind(data.category_id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if category.is_none() {
            return Err(CoreError::NotFound("Category not found".to_string()));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            title: data.title,
            description: data.description,
            deadline: data.deadline,
            estimate_value: data.estimate.map(|e| e.value),
            estimate_unit: data.estimate.map(|e| e.unit),
            status: TaskStatus::Todo,
            section: data.section.unwrap_or(TaskSection::Current),
            priority: data.priority.unwrap_or(TaskPriority::None),
            notes: data.notes,
            completed_at: None,
            project_id,
            category_id: data.category_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO tasks (id, title, description, deadline, estimate_value, estimate_unit,
                status, section, priority, notes, completed_at, project_id, category_id,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.estimate_value)
        .bind(task.estimate_unit)
        .bind(task.status)
        .bind(task.section)
        .bind(task.priority)
        .bind(&task.notes)
        .bind(task.completed_at)
        .bind(task.project_id)
        .bind(task.category_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn find_task_by_id(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks(
        &self,
        project_id: Uuid,
        filters: &[TaskFilter],
    ) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT t.* FROM tasks t WHERE t.project_id = ");
        query_builder.push_bind(project_id);

        for filter in filters {
            query_builder.push(" AND ");
            match filter {
                TaskFilter::Section(section) => {
                    query_builder.push("t.section = ");
                    query_builder.push_bind(*section);
                }
                TaskFilter::Status(status) => {
                    query_builder.push("t.status = ");
                    query_builder.push_bind(*status);
                }
                TaskFilter::Category(category_id) => {
                    query_builder.push("t.category_id = ");
                    query_builder.push_bind(*category_id);
                }
                TaskFilter::Priority(priority) => {
                    query_builder.push("t.priority = ");
                    query_builder.push_bind(*priority);
                }
            }
        }

        // Insertion order is the stable-sort base for the display order.
        query_builder.push(" ORDER BY t.created_at, t.rowid");

        let tasks = query_builder.build_query_as().fetch_all(self.pool()).await?;
        Ok(ordering::sorted(tasks))
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, CoreError> {
        if let Some(title) = &patch.title {
            validation::validate_task_title(title)?;
        }
        if let Some(Some(estimate)) = &patch.estimate {
            validation::validate_estimate(estimate)?;
        }

        let mut tx = self.pool().begin().await?;

        let task = self
            .find_task_in_transaction(&mut tx, project_id, id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        if let Some(category_id) = patch.category_id {
            if category_id != task.category_id {
                let target: Option<Category> =
                    sqlx::query_as("SELECT * FROM categories WHERE id = $1")
                        .bind(category_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                let target = target.ok_or(CoreError::InvalidReassignmentTarget)?;
                lifecycle::check_reassignment_target(&target, project_id)?;
            }
        }

        let next = lifecycle::apply_field_update(&task, &patch, Utc::now())?;
        self.write_task_fields(&mut tx, &next).await?;

        tx.commit().await?;
        Ok(next)
    }

    async fn set_task_status(
        &self,
        project_id: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = self
            .find_task_in_transaction(&mut tx, project_id, id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        let mutation = lifecycle::apply_status_change(&task, status, Utc::now());
        let updated: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET status = $1, section = $2, completed_at = $3, updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(mutation.status)
        .bind(mutation.section)
        .bind(mutation.completed_at)
        .bind(mutation.updated_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn set_task_section(
        &self,
        project_id: Uuid,
        id: Uuid,
        section: TaskSection,
    ) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = self
            .find_task_in_transaction(&mut tx, project_id, id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Task not found".to_string()))?;

        let mutation = lifecycle::apply_section_change(&task, section, Utc::now())?;
        let updated: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET section = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(mutation.section)
        .bind(mutation.updated_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_task(&self, project_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_connection;
    use crate::repository::{CategoryRepository, ProjectRepository, TaskRepository};
    use tempfile::TempDir;

    async fn setup() -> (SqliteRepository, TempDir) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = establish_connection(&db_path.to_string_lossy())
            .await
            .expect("Failed to establish test database connection");
        (SqliteRepository::new(pool), temp_dir)
    }

    async fn setup_project(repo: &SqliteRepository) -> (Uuid, Uuid) {
        let project = repo
            .add_project(Uuid::now_v7(), "Inline Test".to_string(), None)
            .await
            .unwrap();
        let categories = repo.find_categories(project.id).await.unwrap();
        (project.id, categories[0].id)
    }

    #[tokio::test]
    async fn add_task_defaults() {
        let (repo, _tmp) = setup().await;
        let (project_id, category_id) = setup_project(&repo).await;

        let task = repo
            .add_task(
                project_id,
                NewTaskData {
                    title: "First".to_string(),
                    category_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.section, TaskSection::Current);
        assert_eq!(task.completed_at, None);
    }

    #[tokio::test]
    async fn add_task_rejects_foreign_category() {
        let (repo, _tmp) = setup().await;
        let (project_id, _) = setup_project(&repo).await;

        let result = repo
            .add_task(
                project_id,
                NewTaskData {
                    title: "Orphan".to_string(),
                    category_id: Uuid::now_v7(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn completing_via_status_change_archives() {
        let (repo, _tmp) = setup().await;
        let (project_id, category_id) = setup_project(&repo).await;
        let task = repo
            .add_task(
                project_id,
                NewTaskData {
                    title: "Finish me".to_string(),
                    category_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let done = repo
            .set_task_status(project_id, task.id, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.section, TaskSection::Past);

        let reopened = repo
            .set_task_status(project_id, task.id, TaskStatus::Todo)
            .await
            .unwrap();
        assert_eq!(reopened.completed_at, None);
        assert_eq!(reopened.section, TaskSection::Current);
    }

    #[tokio::test]
    async fn section_change_to_past_is_guarded() {
        let (repo, _tmp) = setup().await;
        let (project_id, category_id) = setup_project(&repo).await;
        let task = repo
            .add_task(
                project_id,
                NewTaskData {
                    title: "Still open".to_string(),
                    category_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = repo
            .set_task_section(project_id, task.id, TaskSection::Past)
            .await;
        assert!(matches!(result, Err(CoreError::InvalidTransition(_))));

        let moved = repo
            .set_task_section(project_id, task.id, TaskSection::Future)
            .await
            .unwrap();
        assert_eq!(moved.section, TaskSection::Future);
    }

    #[tokio::test]
    async fn task_from_other_project_reads_as_not_found() {
        let (repo, _tmp) = setup().await;
        let (project_id, category_id) = setup_project(&repo).await;
        let other_project = repo
            .add_project(Uuid::now_v7(), "Other".to_string(), None)
            .await
            .unwrap();
        let task = repo
            .add_task(
                project_id,
                NewTaskData {
                    title: "Mine".to_string(),
                    category_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let found = repo.find_task_by_id(other_project.id, task.id).await.unwrap();
        assert!(found.is_none());

        let result = repo.delete_task(other_project.id, task.id).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }
}
