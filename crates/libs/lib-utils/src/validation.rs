//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a value looks like an `http://` or `https://` origin.
pub fn validate_http_origin(value: &str, field_name: &str) -> Result<(), String> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .ok_or_else(|| format!("{} must start with http:// or https://", field_name))?;

    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(format!("{} must include a host", field_name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_origin() {
        assert!(validate_http_origin("http://localhost:5173", "FRONTEND_URL").is_ok());
        assert!(validate_http_origin("https://finance.example.com", "FRONTEND_URL").is_ok());
        assert!(validate_http_origin("localhost:5173", "FRONTEND_URL").is_err());
        assert!(validate_http_origin("http://", "FRONTEND_URL").is_err());
        assert!(validate_http_origin("http://local host", "FRONTEND_URL").is_err());
    }
}
