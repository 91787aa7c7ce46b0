use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};

/// Validates an address and lowercases it for storage and lookups.
pub fn validate_and_normalize_email(email: &str) -> ApiResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(ApiError::BadRequest(
            "Invalid email format. Must be in format user@domain.tld".to_string(),
        ));
    }

    // email_address accepts bare hosts; require a TLD
    let has_tld = trimmed
        .rsplit_once('@')
        .map(|(_, domain)| domain.contains('.'))
        .unwrap_or(false);
    if !has_tld {
        return Err(ApiError::BadRequest(
            "Invalid email format. Domain must include a TLD (e.g., .com, .org)".to_string(),
        ));
    }

    Ok(trimmed.to_lowercase())
}
