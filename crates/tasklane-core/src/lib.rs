//! # Tasklane Core Library
//!
//! The core of the Tasklane task manager: a deterministic display order for
//! tasks, the lifecycle rules that govern status and section changes, and a
//! SQLite repository for projects, categories and tasks.
//!
//! ## Features
//!
//! - **Deterministic Ordering**: Multi-key task sort (priority, deadline,
//!   normalized time estimate, title) with stable tie-breaking
//! - **Lifecycle Rules**: Pure functions deriving completion timestamps and
//!   section moves from status changes, plus guarded direct section edits
//! - **Category Invariants**: Minimum-one-category per project and
//!   reassignment-on-delete, resolved before any row is touched
//! - **Type Safety**: Compile-time checked models with sqlx
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`ordering`]: The task comparator and category grouping
//! - [`lifecycle`]: Status/section transition rules and deletion guards
//! - [`validation`]: Input bounds checked before writes
//! - [`repository`]: Data access layer with Repository pattern
//! - [`error`]: Error types, one variant per precondition
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tasklane_core::{
//!     db,
//!     models::{NewTaskData, TaskStatus},
//!     repository::{ProjectRepository, SqliteRepository, TaskRepository},
//! };
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tasklane_core::error::CoreError> {
//!     let pool = db::establish_connection("tasks.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let project = repo
//!         .add_project(Uuid::now_v7(), "My Project".to_string(), None)
//!         .await?;
//!
//!     // Every project starts with default categories; tasks live in one.
//!     let tasks = repo.find_tasks(project.id, &[]).await?;
//!     println!("{} tasks", tasks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod ordering;
pub mod repository;
pub mod validation;
