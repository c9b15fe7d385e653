use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Order, OrderResponse, PlaceOrderRequest},
    queries::order_queries,
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
    },
};

pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<Json<Order>> {
    let user_id = extract_user_id(&claims)?;

    let order = order_queries::place_order(&state.db, user_id, payload.address_id).await?;

    tracing::info!(
        order_id = order.id,
        user_id,
        total = %order.total_price,
        "order placed"
    );

    Ok(Json(order))
}

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OrderResponse>>> {
    let user_id = extract_user_id(&claims)?;

    let orders = order_queries::get_user_orders(&state.db, user_id).await?;

    Ok(Json(order_queries::with_items(&state.db, orders).await?))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let user_id = extract_user_id(&claims)?;
    let order_id = parse_id(&id, "Order not found")?;

    let order = order_queries::find_by_id(&state.db, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != Some(user_id) {
        return Err(AppError::Unauthorized(
            "Not authorized to cancel this order".to_string(),
        ));
    }

    let target = order.status.cancel_by_customer()?;

    // The guard was checked against the status we read; only write if it still holds.
    let updated = order_queries::update_status(&state.db, order.id, order.status, target)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Order status changed, please reload and try again".to_string())
        })?;

    tracing::info!(order_id = updated.id, user_id, "order cancelled by customer");

    Ok(Json(updated))
}
