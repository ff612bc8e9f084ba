//! Input validation invoked before writes reach the repository.

use crate::error::CoreError;
use crate::models::TimeEstimate;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_NAME_LEN: usize = 100;

pub fn validate_task_title(title: &str) -> Result<(), CoreError> {
    if title.is_empty() {
        return Err(CoreError::InvalidInput(
            "task title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::InvalidInput(format!(
            "task title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    validate_name("project", name)
}

pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    validate_name("category", name)
}

fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::InvalidInput(format!(
            "{} name must not be empty",
            kind
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::InvalidInput(format!(
            "{} name must be at most {} characters",
            kind, MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_estimate(estimate: &TimeEstimate) -> Result<(), CoreError> {
    if estimate.value < 1 {
        return Err(CoreError::InvalidInput(
            "time estimate must be at least 1".to_string(),
        ));
    }
    Ok(())
}
