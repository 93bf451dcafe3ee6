use crate::error::{AppError, Result};

/// Upper bound on identifier-ish fields (tokens, user IDs, device IDs).
const MAX_FIELD_LEN: usize = 512;

/// Largest admin-search page a caller may request.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Validates a required string field.
///
/// # Arguments
///
/// * `name` - The field name used in error messages.
/// * `value` - The value to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the field is valid.
pub fn validate_required(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", name)));
    }

    if value.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            name, MAX_FIELD_LEN
        )));
    }

    Ok(())
}

/// Validates a TTL in seconds.
pub fn validate_ttl(ttl_seconds: i32) -> Result<()> {
    if ttl_seconds <= 0 {
        return Err(AppError::Validation(
            "ttl_seconds must be a positive number of seconds".to_string(),
        ));
    }

    Ok(())
}

/// Validates an admin-search page size.
pub fn validate_page_size(page_size: i32) -> Result<()> {
    if page_size < 1 {
        return Err(AppError::Validation(
            "page_size must be at least 1".to_string(),
        ));
    }

    if page_size > MAX_PAGE_SIZE {
        return Err(AppError::Validation(format!(
            "page_size must be at most {}",
            MAX_PAGE_SIZE
        )));
    }

    Ok(())
}

/// Validates a token list for bulk removal.
pub fn validate_token_list(tokens: &[String]) -> Result<()> {
    if tokens.is_empty() {
        return Err(AppError::Validation(
            "token list must not be empty".to_string(),
        ));
    }

    for token in tokens {
        validate_required("token", token)?;
    }

    Ok(())
}
