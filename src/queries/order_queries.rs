use sqlx::{PgPool, types::Json};

use crate::{
    error::{AppError, Result},
    models::{
        Address, CartLine, Order, OrderItem, OrderItemResponse, OrderResponse, OrderStatus,
        PAYMENT_METHOD, ShippingAddress, order_total,
    },
    queries::product_queries,
};

/// Turns the caller's cart into an order.
///
/// Everything runs in one transaction. The cart rows are locked first, so a
/// second concurrent checkout of the same cart waits and then sees it empty.
pub async fn place_order(pool: &PgPool, user_id: i32, address_id: Option<i32>) -> Result<Order> {
    let mut tx = pool.begin().await?;

    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT c.product_id, c.size, c.quantity, p.price
        FROM cart_items c
        JOIN products p ON p.id = c.product_id
        WHERE c.user_id = $1
        ORDER BY c.id
        FOR UPDATE OF c
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let address_id = address_id
        .ok_or_else(|| AppError::BadRequest("Shipping address is required".to_string()))?;

    let address = sqlx::query_as::<_, Address>(
        "SELECT * FROM user_addresses WHERE id = $1 AND user_id = $2",
    )
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Address not found".to_string()))?;

    let total = order_total(&lines);

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (user_id, total_price, shipping_address, payment_method, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(total)
    .bind(Json(ShippingAddress::from(&address)))
    .bind(PAYMENT_METHOD)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
    let sizes: Vec<Option<&str>> = lines.iter().map(|l| l.size.as_deref()).collect();
    let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, size, quantity)
         SELECT $1, unnest($2::int[]), unnest($3::text[]), unnest($4::int[])",
    )
    .bind(order.id)
    .bind(&product_ids)
    .bind(&sizes)
    .bind(&quantities)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn get_user_orders(pool: &PgPool, user_id: i32) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn list_orders(pool: &PgPool, status: Option<OrderStatus>) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE ($1::order_status IS NULL OR status = $1) ORDER BY created_at DESC, id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_items_for_orders(pool: &PgPool, order_ids: &[i32]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Joins each order with its items and the items' current product data.
pub async fn with_items(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderResponse>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let items = get_items_for_orders(pool, &order_ids).await?;

    let mut product_ids: Vec<i32> = items.iter().filter_map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let products = product_queries::find_responses_by_ids(pool, &product_ids).await?;

    Ok(orders
        .into_iter()
        .map(|order| {
            let order_items = items
                .iter()
                .filter(|i| i.order_id == order.id)
                .map(|i| OrderItemResponse {
                    product_id: i.product_id,
                    size: i.size.clone(),
                    quantity: i.quantity,
                    product: i.product_id.and_then(|id| products.get(&id).cloned()),
                })
                .collect();

            OrderResponse {
                order,
                items: order_items,
            }
        })
        .collect())
}

/// Writes `to` only if the order is still in `from`; `None` means the row
/// changed (or vanished) since it was read.
pub async fn update_status(
    pool: &PgPool,
    id: i32,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3 RETURNING *",
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

pub async fn delete_order(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
