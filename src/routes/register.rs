use axum::{Json, extract::State, http::header, response::IntoResponse};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, NewUser, RegisterRequest, SessionUser},
    queries::user_queries,
    utils::{cookies, validation},
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let new_user = validate_registration(payload)?;

    if user_queries::find_by_email(&state.db, &new_user.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(USER_EXISTS.to_string()));
    }

    let password_hash = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(&state.db, &new_user, &password_hash)
        .await
        .map_err(|e| e.on_unique_violation(USER_EXISTS))?;

    tracing::info!(user_id = user.id, "user registered");

    let token = state.jwt.generate_token(user.id, &user.email)?;
    let cookie = cookies::session_cookie(&token, state.jwt.ttl_seconds(), state.secure_cookies);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "User registered and logged in".to_string(),
            is_admin: user.is_admin,
            user: SessionUser::from(&user),
        }),
    ))
}

const USER_EXISTS: &str = "User already exists";

/// Trims and normalizes the submitted fields, then applies the account rules
/// in order: required fields, name, email, password, phone.
pub fn validate_registration(payload: RegisterRequest) -> Result<NewUser> {
    let name = payload.name.trim().to_string();
    let email = validation::normalize_email(&payload.email);
    let phone = payload
        .phone
        .map(|p| validation::normalize_phone(&p))
        .filter(|p| !p.is_empty());

    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter all required fields".to_string(),
        ));
    }

    validation::validate_name(&name)?;
    validation::validate_email(&email)?;
    validation::validate_password(&payload.password)?;
    if let Some(ref phone) = phone {
        validation::validate_phone(phone)?;
    }

    Ok(NewUser {
        name,
        email,
        password: payload.password,
        phone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "  Test User ".into(),
            email: " Test@Example.COM ".into(),
            password: password.into(),
            phone: Some("987-654 3210".into()),
        }
    }

    fn message(result: Result<NewUser>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_registration_is_sanitized() {
        let user = validate_registration(request("Test@123")).unwrap();
        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_password_without_digit_is_rejected() {
        assert_eq!(
            message(validate_registration(request("Test@abcd"))),
            "Password must contain uppercase, lowercase, number, and special character"
        );
    }

    #[test]
    fn test_missing_fields() {
        let req = RegisterRequest {
            name: "   ".into(),
            ..request("Test@123")
        };
        assert_eq!(
            message(validate_registration(req)),
            "Please enter all required fields"
        );
    }

    #[test]
    fn test_blank_phone_is_optional() {
        let req = RegisterRequest {
            phone: Some("  ".into()),
            ..request("Test@123")
        };
        assert_eq!(validate_registration(req).unwrap().phone, None);
    }

    #[test]
    fn test_bad_phone_is_rejected() {
        let req = RegisterRequest {
            phone: Some("12345".into()),
            ..request("Test@123")
        };
        assert_eq!(
            message(validate_registration(req)),
            "Invalid phone number format"
        );
    }
}
