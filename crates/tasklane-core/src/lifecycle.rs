//! Lifecycle rules for status and section changes.
//!
//! Status drives two derived fields: the completion timestamp, which exists
//! exactly while a task is completed, and the section, which auto-archives
//! to past on a terminal status and resets to current on reopen. Everything
//! here is pure; the caller supplies the clock and persists the result.

use crate::error::CoreError;
use crate::models::{Task, TaskPatch, TaskSection, TaskStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The full set of lifecycle-bearing fields to persist after a status or
/// section change. Never partial: completion timestamp and section are
/// derived, not passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMutation {
    pub status: TaskStatus,
    pub section: TaskSection,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Computes the fields to persist for a status change.
///
/// Entering completed sets the completion timestamp; leaving it clears the
/// timestamp. Reaching a terminal status archives the task to the past
/// section; reopening from a terminal status moves it back to current,
/// discarding any prior future placement.
pub fn apply_status_change(current: &Task, new_status: TaskStatus, now: DateTime<Utc>) -> TaskMutation {
    let completed_at = if new_status == TaskStatus::Completed && current.status != TaskStatus::Completed {
        Some(now)
    } else if new_status != TaskStatus::Completed && current.status == TaskStatus::Completed {
        None
    } else {
        current.completed_at
    };

    let section = if new_status.is_terminal() && current.section != TaskSection::Past {
        TaskSection::Past
    } else if !new_status.is_terminal() && current.status.is_terminal() {
        TaskSection::Current
    } else {
        current.section
    };

    TaskMutation {
        status: new_status,
        section,
        completed_at,
        updated_at: now,
    }
}

/// Computes the fields to persist for a direct section change.
///
/// A task may enter the past section only once it is completed or cancelled;
/// status-driven auto-moves bypass this check, a direct edit does not.
pub fn apply_section_change(
    current: &Task,
    new_section: TaskSection,
    now: DateTime<Utc>,
) -> Result<TaskMutation, CoreError> {
    if new_section == TaskSection::Past && !current.status.is_terminal() {
        return Err(CoreError::InvalidTransition(
            "only completed or cancelled tasks can be moved to the past section".to_string(),
        ));
    }

    Ok(TaskMutation {
        status: current.status,
        section: new_section,
        completed_at: current.completed_at,
        updated_at: now,
    })
}

/// Applies a combined patch to a task snapshot and returns the full next
/// snapshot to persist.
///
/// When the patch carries a status, the derivation of [`apply_status_change`]
/// wins over any explicit section in the same patch. An explicit section in
/// a patch whose status stays non-terminal is guarded like a direct edit.
/// Category membership is not checked here; the caller validates the target
/// against the project before invoking this.
pub fn apply_field_update(
    current: &Task,
    patch: &TaskPatch,
    now: DateTime<Utc>,
) -> Result<Task, CoreError> {
    let mut next = current.clone();

    if let Some(title) = &patch.title {
        next.title = title.clone();
    }
    if let Some(description) = &patch.description {
        next.description = description.clone();
    }
    if let Some(deadline) = patch.deadline {
        next.deadline = deadline;
    }
    if let Some(estimate) = patch.estimate {
        next.estimate_value = estimate.map(|e| e.value);
        next.estimate_unit = estimate.map(|e| e.unit);
    }
    if let Some(category_id) = patch.category_id {
        next.category_id = category_id;
    }
    if let Some(priority) = patch.priority {
        next.priority = priority;
    }
    if let Some(notes) = &patch.notes {
        next.notes = notes.clone();
    }

    match patch.status {
        Some(new_status) => {
            let mutation = apply_status_change(current, new_status, now);
            next.status = mutation.status;
            next.completed_at = mutation.completed_at;
            next.section = match patch.section {
                // No status-driven move happened, honor the explicit section.
                Some(section) if mutation.section == current.section => {
                    if section == TaskSection::Past && !next.status.is_terminal() {
                        return Err(CoreError::InvalidTransition(
                            "only completed or cancelled tasks can be moved to the past section"
                                .to_string(),
                        ));
                    }
                    section
                }
                _ => mutation.section,
            };
        }
        None => {
            if let Some(section) = patch.section {
                let mutation = apply_section_change(&next, section, now)?;
                next.section = mutation.section;
            }
        }
    }

    next.updated_at = now;
    Ok(next)
}

/// The plan for deleting a category, as resolved by
/// [`resolve_category_deletion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDeletion {
    /// The category is empty; delete it outright.
    DeleteOnly,
    /// Move every task in the category to `to`, then delete the category.
    ReassignThenDelete { to: Uuid },
}

/// Guards category deletion and resolves it into a plan.
///
/// Deleting the last category of a project is forbidden, empty or not. A
/// category with tasks needs a reassignment target; an empty one deletes
/// without reassignment regardless of any target given.
pub fn resolve_category_deletion(
    project_category_count: i64,
    tasks_in_category: i64,
    reassign_to: Option<Uuid>,
) -> Result<CategoryDeletion, CoreError> {
    if project_category_count <= 1 {
        return Err(CoreError::LastCategory);
    }

    if tasks_in_category == 0 {
        return Ok(CategoryDeletion::DeleteOnly);
    }

    match reassign_to {
        Some(to) => Ok(CategoryDeletion::ReassignThenDelete { to }),
        None => Err(CoreError::ReassignmentRequired),
    }
}

/// Membership check for reassignment and category-change targets.
pub fn check_reassignment_target(
    target: &crate::models::Category,
    project_id: Uuid,
) -> Result<(), CoreError> {
    if target.project_id != project_id {
        return Err(CoreError::InvalidReassignmentTarget);
    }
    Ok(())
}
