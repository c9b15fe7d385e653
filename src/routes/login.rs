use axum::{Json, extract::State, http::header, response::IntoResponse};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, LoginRequest, MessageResponse, SessionUser},
    queries::user_queries,
    utils::{cookies, validation},
};

fn invalid_credentials() -> AppError {
    AppError::BadRequest("Invalid Credentials".to_string())
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = validation::normalize_email(&payload.email);

    let user = user_queries::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if user.is_banned {
        tracing::info!(user_id = user.id, "login refused for banned account");
        return Err(AppError::Forbidden(
            "Your account has been banned. Please contact support.".to_string(),
        ));
    }

    let is_valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(invalid_credentials());
    }

    let token = state.jwt.generate_token(user.id, &user.email)?;
    let cookie = cookies::session_cookie(&token, state.jwt.ttl_seconds(), state.secure_cookies);

    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Logged in successfully".to_string(),
            is_admin: user.is_admin,
            user: SessionUser::from(&user),
        }),
    ))
}

pub async fn logout_user(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cookies::removal_cookie(state.secure_cookies))],
        Json(MessageResponse::new("Logged out successfully")),
    )
}
