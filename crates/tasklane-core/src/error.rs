use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Cannot delete the last category. Each project must have at least one category.")]
    LastCategory,

    #[error("Category has tasks. A reassignment target category is required.")]
    ReassignmentRequired,

    #[error("Reassignment target category does not belong to the same project.")]
    InvalidReassignmentTarget,

    #[error("A {0} with this name already exists")]
    DuplicateName(String),
}
