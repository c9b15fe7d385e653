use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AddToCartRequest, CartItem, CartItemResponse, MessageResponse, UpdateCartRequest,
        ensure_line_quantity, ensure_size_stock, validate_quantity,
    },
    queries::{cart_queries, product_queries},
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
    },
};

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<CartItemResponse>>> {
    let user_id = extract_user_id(&claims)?;

    Ok(Json(cart_queries::list_cart(&state.db, user_id).await?))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<CartItemResponse>> {
    let user_id = extract_user_id(&claims)?;
    let quantity = payload.quantity.unwrap_or(1);
    validate_quantity(quantity)?;

    let size = payload
        .size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let product = product_queries::find_response(&state.db, payload.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let in_cart = cart_queries::find_line(&state.db, user_id, product.id, size)
        .await?
        .map(|line| line.quantity)
        .unwrap_or(0);

    ensure_line_quantity(in_cart, quantity)?;
    if let Some(size) = size {
        ensure_size_stock(&product.sizes, size, in_cart, quantity)?;
    }

    let item = cart_queries::add_item(&state.db, user_id, product.id, size, quantity)
        .await
        .map_err(AppError::for_missing_user)?;

    Ok(Json(CartItemResponse::new(item, product)))
}

async fn owned_item(state: &AppState, user_id: i32, raw_id: &str) -> Result<CartItem> {
    let id = parse_id(raw_id, "Cart item not found")?;

    let item = cart_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    if item.user_id != user_id {
        return Err(AppError::Unauthorized("User not authorized".to_string()));
    }

    Ok(item)
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<Json<CartItem>> {
    let user_id = extract_user_id(&claims)?;
    validate_quantity(payload.quantity)?;

    let item = owned_item(&state, user_id, &id).await?;
    let item = cart_queries::set_quantity(&state.db, item.id, payload.quantity).await?;

    Ok(Json(item))
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user_id = extract_user_id(&claims)?;

    let item = owned_item(&state, user_id, &id).await?;
    cart_queries::delete_item(&state.db, item.id).await?;

    Ok(Json(MessageResponse::new("Cart item removed")))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>> {
    let user_id = extract_user_id(&claims)?;

    cart_queries::clear_cart(&state.db, user_id).await?;

    Ok(Json(MessageResponse::new("Cart cleared")))
}
