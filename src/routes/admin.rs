use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AdminOrderQuery, AdminOrderResponse, DEFAULT_LOW_STOCK_THRESHOLD, DashboardStats,
        LowStockProduct, LowStockQuery, MessageResponse, Order, OrderStatus, ProductRequest,
        ProductResponse, UpdateStatusRequest, User, UserActionResponse, UserDetailResponse,
    },
    queries::{admin_queries, order_queries, product_queries, user_queries},
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
    },
};

fn invalid_status() -> AppError {
    AppError::BadRequest("Invalid status".to_string())
}

/// `None`, empty and `All` mean no filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<OrderStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("All") => Ok(None),
        Some(value) => OrderStatus::parse(value).map(Some).ok_or_else(invalid_status),
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    Ok(Json(admin_queries::get_stats(&state.db).await?))
}

//PRODUCT ROUTES
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    let new_product = payload.into_new_product()?;

    let product = product_queries::create_product(&state.db, &new_product).await?;

    tracing::info!(product_id = product.id, "product created");

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id, "Product not found")?;
    let changes = payload.into_changes()?;

    let product = product_queries::update_product(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "Product not found")?;

    if product_queries::delete_product(&state.db, id).await? == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = id, "product deleted");

    Ok(Json(MessageResponse::new("Product removed")))
}

pub async fn low_stock_products(
    State(state): State<AppState>,
    Query(params): Query<LowStockQuery>,
) -> Result<Json<Vec<LowStockProduct>>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);

    Ok(Json(product_queries::low_stock(&state.db, threshold).await?))
}

//ORDER ROUTES
async fn with_customers(state: &AppState, orders: Vec<Order>) -> Result<Vec<AdminOrderResponse>> {
    let mut user_ids: Vec<i32> = orders.iter().filter_map(|o| o.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let customers = admin_queries::customers_by_ids(&state.db, &user_ids).await?;
    let orders = order_queries::with_items(&state.db, orders).await?;

    Ok(orders
        .into_iter()
        .map(|o| AdminOrderResponse {
            customer: o.order.user_id.and_then(|id| customers.get(&id).cloned()),
            order: o.order,
            items: o.items,
        })
        .collect())
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<AdminOrderQuery>,
) -> Result<Json<Vec<AdminOrderResponse>>> {
    let status = parse_status_filter(params.status.as_deref())?;

    let orders = order_queries::list_orders(&state.db, status).await?;

    Ok(Json(with_customers(&state, orders).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminOrderResponse>> {
    let id = parse_id(&id, "Order not found")?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    with_customers(&state, vec![order])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let target = payload
        .status
        .as_deref()
        .and_then(OrderStatus::parse)
        .ok_or_else(invalid_status)?;

    let id = parse_id(&id, "Order not found")?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let target = order.status.transition_to(target)?;

    let updated = order_queries::update_status(&state.db, order.id, order.status, target)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Order status changed, please reload and try again".to_string())
        })?;

    tracing::info!(
        order_id = updated.id,
        from = %order.status,
        to = %updated.status,
        "order status changed"
    );

    Ok(Json(updated))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "Order not found")?;

    if order_queries::delete_order(&state.db, id).await? == 0 {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    tracing::info!(order_id = id, "order deleted");

    Ok(Json(MessageResponse::new("Order removed")))
}

//USER ROUTES
fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(user_queries::list_users(&state.db).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDetailResponse>> {
    let id = parse_id(&id, "User not found")?;

    let user = user_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    let orders = order_queries::get_user_orders(&state.db, id).await?;
    let orders = order_queries::with_items(&state.db, orders).await?;

    Ok(Json(UserDetailResponse { user, orders }))
}

pub async fn toggle_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserActionResponse>> {
    let id = parse_id(&id, "User not found")?;

    let user = user_queries::toggle_admin(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    let message = if user.is_admin {
        "User promoted to admin"
    } else {
        "User demoted from admin"
    };

    tracing::info!(user_id = user.id, is_admin = user.is_admin, "user role changed");

    Ok(Json(UserActionResponse {
        message: message.to_string(),
        user,
    }))
}

pub async fn toggle_user_ban(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<UserActionResponse>> {
    let admin_id = extract_user_id(&claims)?;
    let id = parse_id(&id, "User not found")?;

    if id == admin_id {
        return Err(AppError::BadRequest(
            "Cannot ban your own account".to_string(),
        ));
    }

    let target = user_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    if target.is_admin {
        return Err(AppError::BadRequest("Cannot ban admin users".to_string()));
    }

    let user = user_queries::toggle_ban(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    let message = if user.is_banned {
        "User banned successfully"
    } else {
        "User unbanned successfully"
    };

    tracing::info!(user_id = user.id, is_banned = user.is_banned, "user ban toggled");

    Ok(Json(UserActionResponse {
        message: message.to_string(),
        user,
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let admin_id = extract_user_id(&claims)?;
    let id = parse_id(&id, "User not found")?;

    if id == admin_id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    if user_queries::delete_user(&state.db, id).await? == 0 {
        return Err(user_not_found());
    }

    tracing::info!(user_id = id, "user deleted");

    Ok(Json(MessageResponse::new("User removed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("All")).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("Shipped")).unwrap(),
            Some(OrderStatus::Shipped)
        );
        assert!(matches!(
            parse_status_filter(Some("Lost")),
            Err(AppError::BadRequest(_))
        ));
    }
}
