use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    Category, NewTaskData, Project, Task, TaskFilter, TaskPatch, TaskSection, TaskStatus,
    UpdateProjectData,
};
use async_trait::async_trait;
use uuid::Uuid;

// Re-export domain modules
pub mod categories;
pub mod projects;
pub mod tasks;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for task operations. All operations are scoped to a
/// project; a task id from another project reads as not found.
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, project_id: Uuid, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, project_id: Uuid, id: Uuid)
        -> Result<Option<Task>, CoreError>;
    /// Lists tasks in display order (see [`crate::ordering`]).
    async fn find_tasks(
        &self,
        project_id: Uuid,
        filters: &[TaskFilter],
    ) -> Result<Vec<Task>, CoreError>;
    async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, CoreError>;
    async fn set_task_status(
        &self,
        project_id: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, CoreError>;
    async fn set_task_section(
        &self,
        project_id: Uuid,
        id: Uuid,
        section: TaskSection,
    ) -> Result<Task, CoreError>;
    async fn delete_task(&self, project_id: Uuid, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for category operations.
#[async_trait]
pub trait CategoryRepository {
    async fn add_category(&self, project_id: Uuid, name: String) -> Result<Category, CoreError>;
    async fn find_category_by_id(
        &self,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, CoreError>;
    async fn find_categories(&self, project_id: Uuid) -> Result<Vec<Category>, CoreError>;
    async fn rename_category(
        &self,
        project_id: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Category, CoreError>;
    /// Deletes a category. When the category still has tasks, `reassign_to`
    /// names the category (in the same project) that receives them.
    async fn delete_category(
        &self,
        project_id: Uuid,
        id: Uuid,
        reassign_to: Option<Uuid>,
    ) -> Result<(), CoreError>;
}

/// Domain-specific trait for project operations.
#[async_trait]
pub trait ProjectRepository {
    async fn add_project(
        &self,
        owner_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Project, CoreError>;
    async fn find_project_by_id(&self, id: Uuid) -> Result<Option<Project>, CoreError>;
    /// Case-insensitive name lookup scoped to the owner.
    async fn find_project_by_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Option<Project>, CoreError>;
    async fn find_projects(&self, owner_id: Uuid) -> Result<Vec<Project>, CoreError>;
    async fn update_project(&self, id: Uuid, data: UpdateProjectData)
        -> Result<Project, CoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: TaskRepository + CategoryRepository + ProjectRepository {
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
