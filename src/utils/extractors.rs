use crate::{
    error::{AppError, Result},
    utils::jwt::Claims,
};

pub fn extract_user_id(claims: &Claims) -> Result<i32> {
    claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Token is not valid".to_string()))
}

/// Parses a path identifier; anything that is not a positive integer is
/// reported as a missing resource rather than a malformed request.
pub fn parse_id(raw: &str, not_found: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("17", "Order not found").unwrap(), 17);

        for raw in ["", "abc", "0", "-3", "65f1c0de9a", "99999999999"] {
            match parse_id(raw, "Order not found") {
                Err(AppError::NotFound(msg)) => assert_eq!(msg, "Order not found"),
                other => panic!("expected NotFound for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_extract_user_id() {
        let claims = Claims {
            sub: "7".to_string(),
            email: "a@b.co".to_string(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(extract_user_id(&claims).unwrap(), 7);

        let bad = Claims {
            sub: "seven".to_string(),
            ..claims
        };
        assert!(matches!(extract_user_id(&bad), Err(AppError::Unauthorized(_))));
    }
}
