use validator::ValidationError;

pub mod page;
pub mod todo;

#[cfg(test)]
pub mod test_util;

/// Validation rule rejecting strings which are empty or contain only whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}
