use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ChangePasswordRequest, MessageResponse, ProductResponse, ProfileResponse,
        UpdateProfileRequest, User,
    },
    queries::{address_queries, product_queries, user_queries, wishlist_queries},
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
        validation,
    },
};

async fn current_user(state: &AppState, user_id: i32) -> Result<User> {
    user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;
    let user = current_user(&state, user_id).await?;

    let wishlist = wishlist_queries::list_wishlist(&state.db, user_id).await?;
    let addresses = address_queries::list_addresses(&state.db, user_id).await?;

    Ok(Json(ProfileResponse {
        user,
        wishlist,
        addresses,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user_id = extract_user_id(&claims)?;
    let changes = payload.into_changes()?;

    let user = user_queries::update_profile(&state.db, user_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let user_id = extract_user_id(&claims)?;
    let user = current_user(&state, user_id).await?;

    let matches = bcrypt::verify(&payload.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !matches {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    validation::validate_password(&payload.new_password)?;

    let password_hash = bcrypt::hash(&payload.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    user_queries::update_password(&state.db, user_id, &password_hash).await?;

    tracing::info!(user_id, "password changed");

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

pub async fn get_wishlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ProductResponse>>> {
    let user_id = extract_user_id(&claims)?;

    Ok(Json(wishlist_queries::list_wishlist(&state.db, user_id).await?))
}

pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>> {
    let user_id = extract_user_id(&claims)?;
    let product_id = parse_id(&id, "Product not found")?;

    if product_queries::find_by_id(&state.db, product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let added = wishlist_queries::add_to_wishlist(&state.db, user_id, product_id)
        .await
        .map_err(AppError::for_missing_user)?;

    if !added {
        return Err(AppError::BadRequest(
            "Product already in wishlist".to_string(),
        ));
    }

    Ok(Json(wishlist_queries::list_wishlist(&state.db, user_id).await?))
}

pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>> {
    let user_id = extract_user_id(&claims)?;

    // An id that is not on the list, malformed or not, leaves it unchanged.
    if let Ok(product_id) = parse_id(&id, "Product not found") {
        wishlist_queries::remove_from_wishlist(&state.db, user_id, product_id).await?;
    }

    Ok(Json(wishlist_queries::list_wishlist(&state.db, user_id).await?))
}
