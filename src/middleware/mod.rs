use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    queries::user_queries,
    utils::{cookies::token_from_headers, extractors::extract_user_id, jwt::Claims},
};

fn session_claims(state: &AppState, req: &Request) -> Result<Claims, AppError> {
    let token = token_from_headers(req.headers())
        .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;

    state.jwt.verify_token(&token)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_claims(&state, &req)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Like `auth_middleware`, but re-reads the user so a revoked admin flag
/// takes effect without waiting for the token to expire.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_claims(&state, &req)?;
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !user.is_admin {
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        ));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
