use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    #[serde(with = "uuid::serde::compact")]
    pub id: Uuid,
    #[serde(with = "uuid::serde::compact")]
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    #[serde(with = "uuid::serde::compact")]
    pub id: Uuid,
    pub name: String,
    #[serde(with = "uuid::serde::compact")]
    pub project_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Completed and cancelled tasks are done with their lifecycle; the only
    /// way out is reopening, which resets the section.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskSection {
    Current,
    Future,
    Past,
}

impl std::fmt::Display for TaskSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskSection::Current => write!(f, "current"),
            TaskSection::Future => write!(f, "future"),
            TaskSection::Past => write!(f, "past"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task section: {0}")]
pub struct ParseTaskSectionError(String);

impl FromStr for TaskSection {
    type Err = ParseTaskSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(TaskSection::Current),
            "future" => Ok(TaskSection::Future),
            "past" => Ok(TaskSection::Past),
            _ => Err(ParseTaskSectionError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    None,
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Display rank: high sorts before medium before low; tasks without a
    /// priority go last.
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
            TaskPriority::None => 3,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::None => write!(f, "none"),
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TaskPriority::None),
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstimateUnit {
    Minutes,
    Hours,
    Days,
}

impl std::fmt::Display for EstimateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateUnit::Minutes => write!(f, "minutes"),
            EstimateUnit::Hours => write!(f, "hours"),
            EstimateUnit::Days => write!(f, "days"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid estimate unit: {0}")]
pub struct ParseEstimateUnitError(String);

impl FromStr for EstimateUnit {
    type Err = ParseEstimateUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minutes" => Ok(EstimateUnit::Minutes),
            "hours" => Ok(EstimateUnit::Hours),
            "days" => Ok(EstimateUnit::Days),
            _ => Err(ParseEstimateUnitError(s.to_string())),
        }
    }
}

/// A task's time estimate. Stored as a value/unit pair; comparisons across
/// units go through [`TimeEstimate::minutes`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeEstimate {
    pub value: i64,
    pub unit: EstimateUnit,
}

impl TimeEstimate {
    pub fn new(value: i64, unit: EstimateUnit) -> Self {
        Self { value, unit }
    }

    /// Normalizes the estimate to minutes: hours are 60, days are 1440.
    pub fn minutes(&self) -> i64 {
        match self.unit {
            EstimateUnit::Minutes => self.value,
            EstimateUnit::Hours => self.value * 60,
            EstimateUnit::Days => self.value * 60 * 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub estimate_value: Option<i64>,
    pub estimate_unit: Option<EstimateUnit>,
    pub status: TaskStatus,
    pub section: TaskSection,
    pub priority: TaskPriority,
    pub notes: Option<String>,
    /// Set exactly when status becomes completed, cleared otherwise.
    pub completed_at: Option<DateTime<Utc>>,
    pub project_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The estimate as a single value, when both columns are present.
    pub fn estimate(&self) -> Option<TimeEstimate> {
        match (self.estimate_value, self.estimate_unit) {
            (Some(value), Some(unit)) => Some(TimeEstimate { value, unit }),
            _ => None,
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: "".to_string(),
            description: None,
            deadline: None,
            estimate_value: None,
            estimate_unit: None,
            status: TaskStatus::Todo,
            section: TaskSection::Current,
            priority: TaskPriority::None,
            notes: None,
            completed_at: None,
            project_id: Uuid::nil(),
            category_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Represents a filter for listing tasks within a project.
#[derive(Debug, Clone)]
pub enum TaskFilter {
    Section(TaskSection),
    Status(TaskStatus),
    Category(Uuid),
    Priority(TaskPriority),
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub estimate: Option<TimeEstimate>,
    pub category_id: Uuid,
    pub priority: Option<TaskPriority>,
    pub notes: Option<String>,
    /// Defaults to the current section when not given.
    pub section: Option<TaskSection>,
}

/// A partial edit to a task. `Option<Option<T>>` fields distinguish
/// "leave unchanged" (outer None) from "clear" (inner None).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub estimate: Option<Option<TimeEstimate>>,
    pub category_id: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub notes: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub section: Option<TaskSection>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectData {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}
