use super::ApiError;

pub fn validate_id(id: i32, resource: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_window_days(days: i64) -> Result<i64, ApiError> {
    const MAX_WINDOW_DAYS: i64 = 365;

    if !(0..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(ApiError::validation(format!(
            "Invalid window_days: {days}. Must be between 0 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(days)
}

/// Trims the query and drops it when nothing is left.
#[must_use]
pub fn normalize_query(query: Option<String>) -> Option<String> {
    query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
}
