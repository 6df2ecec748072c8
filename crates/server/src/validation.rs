use crate::errors::ApiError;

const INVALID_SERVICE_ID: &str = "invalid service ID: must be a positive integer";

/// Parse a path segment into a positive 32-bit service id.
/// Empty, non-numeric, zero, negative and out-of-range inputs are rejected.
pub fn parse_service_id(raw: &str) -> Result<i32, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::bad_request(INVALID_SERVICE_ID, None));
    }
    let id: u32 = raw
        .parse()
        .map_err(|e: std::num::ParseIntError| {
            ApiError::bad_request(INVALID_SERVICE_ID, Some(e.to_string()))
        })?;
    if id == 0 || id > i32::MAX as u32 {
        return Err(ApiError::bad_request(INVALID_SERVICE_ID, None));
    }
    Ok(id as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_service_id("1").unwrap(), 1);
        assert_eq!(parse_service_id("42").unwrap(), 42);
        assert_eq!(parse_service_id("2147483647").unwrap(), i32::MAX);
    }

    #[test]
    fn rejects_empty() {
        let err = parse_service_id("").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_zero() {
        assert!(parse_service_id("0").is_err());
    }

    #[test]
    fn rejects_negative() {
        assert!(parse_service_id("-1").is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(parse_service_id("abc").is_err());
        assert!(parse_service_id("1.5").is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(parse_service_id("2147483648").is_err());
        assert!(parse_service_id("99999999999").is_err());
    }
}
