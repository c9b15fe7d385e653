use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Product, ProductResponse},
    queries::product_queries,
};

pub async fn list_wishlist(pool: &PgPool, user_id: i32) -> Result<Vec<ProductResponse>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT p.*
        FROM wishlist_items w
        JOIN products p ON p.id = w.product_id
        WHERE w.user_id = $1
        ORDER BY w.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    product_queries::with_sizes(pool, products).await
}

/// Returns false when the product was already on the list.
pub async fn add_to_wishlist(pool: &PgPool, user_id: i32, product_id: i32) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_from_wishlist(pool: &PgPool, user_id: i32, product_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
