//! Field rules shared by registration, profile edits and password changes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("email pattern")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern"));
static UPPER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("upper pattern"));
static LOWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").expect("lower pattern"));
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("digit pattern"));
static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#).expect("special pattern")
});

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Strips the spaces and hyphens people type into phone numbers.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

pub fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(AppError::BadRequest(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_LEN, NAME_MAX_LEN
        )));
    }

    if !NAME_RE.is_match(name) {
        return Err(AppError::BadRequest(
            "Name can only contain letters, spaces, hyphens, and apostrophes".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }

    let classes = [&UPPER_RE, &LOWER_RE, &DIGIT_RE, &SPECIAL_RE];
    if !classes.iter().all(|re| re.is_match(password)) {
        return Err(AppError::BadRequest(
            "Password must contain uppercase, lowercase, number, and special character"
                .to_string(),
        ));
    }

    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<()> {
    if !PHONE_RE.is_match(phone) {
        return Err(AppError::BadRequest("Invalid phone number format".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_character_classes_are_independent() {
        assert!(validate_password("Str0ng!pass").is_ok());

        // each one drops exactly one class
        for weak in ["NoDigits!here", "n0upper!case", "N0LOWER!CASE", "N0special1ty"] {
            assert!(
                matches!(validate_password(weak), Err(AppError::BadRequest(_))),
                "{} should be rejected",
                weak
            );
        }
    }

    #[test]
    fn test_password_minimum_length() {
        match validate_password("Ab1!xyz") {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("at least 8")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(validate_password("Ab1!xyzw").is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Mary-Jane O'Neil").is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"a".repeat(51)).is_err());
        assert!(validate_name(&"a".repeat(50)).is_ok());
        assert!(validate_name("R2D2").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("test@test.com").is_ok());
        assert!(validate_email("first.last@shop.co.uk").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@b.toolongtld").is_err());
        assert!(validate_email("white space@b.com").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone(&normalize_phone("98765 43210")).is_ok());
        assert!(validate_phone(&normalize_phone("+1-555-010-9999")).is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98765abc10").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Test@Example.COM "), "test@example.com");
    }
}
