use sqlx::PgPool;

use crate::{
    error::Result,
    models::{CartItem, CartItemResponse},
    queries::product_queries,
};

pub async fn list_cart(pool: &PgPool, user_id: i32) -> Result<Vec<CartItemResponse>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let products = product_queries::find_responses_by_ids(pool, &product_ids).await?;

    Ok(items
        .into_iter()
        .filter_map(|item| {
            let product = products.get(&item.product_id)?.clone();
            Some(CartItemResponse::new(item, product))
        })
        .collect())
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

/// The caller's existing row for this product and size, if any.
pub async fn find_line(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    size: Option<&str>,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items
         WHERE user_id = $1 AND product_id = $2 AND size IS NOT DISTINCT FROM $3",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(size)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// Inserts the row or adds `quantity` to the existing one.
pub async fn add_item(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    size: Option<&str>,
    quantity: i32,
) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (user_id, product_id, size, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, product_id, (COALESCE(size, '')))
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(size)
    .bind(quantity)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn set_quantity(pool: &PgPool, id: i32, quantity: i32) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        "UPDATE cart_items SET quantity = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(quantity)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn delete_item(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear_cart(pool: &PgPool, user_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
