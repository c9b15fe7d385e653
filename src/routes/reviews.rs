use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CreateReviewRequest, MessageResponse, Review, ReviewResponse, UpdateReviewRequest,
        validate_rating,
    },
    queries::{product_queries, review_queries},
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
    },
};

/// Path id here is the product id.
pub async fn get_product_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReviewResponse>>> {
    let product_id = parse_id(&id, "Product not found")?;

    Ok(Json(
        review_queries::list_for_product(&state.db, product_id).await?,
    ))
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<Review>> {
    let user_id = extract_user_id(&claims)?;
    validate_rating(payload.rating)?;

    if product_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let review = review_queries::create_review(&state.db, user_id, &payload)
        .await
        .map_err(AppError::for_missing_user)?;

    tracing::info!(review_id = review.id, product_id = review.product_id, "review added");

    Ok(Json(review))
}

async fn authored_review(state: &AppState, user_id: i32, raw_id: &str) -> Result<Review> {
    let id = parse_id(raw_id, "Review not found")?;

    let review = review_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    if review.user_id != user_id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    Ok(review)
}

pub async fn update_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<Review>> {
    let user_id = extract_user_id(&claims)?;
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    let review = authored_review(&state, user_id, &id).await?;
    let review = review_queries::update_review(&state.db, review.id, &payload).await?;

    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user_id = extract_user_id(&claims)?;

    let review = authored_review(&state, user_id, &id).await?;
    review_queries::delete_review(&state.db, &review).await?;

    Ok(Json(MessageResponse::new("Review removed")))
}
