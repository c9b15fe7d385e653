use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{DashboardStats, OrderCustomer},
};

pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM products) AS total_products,
            (SELECT COUNT(*) FROM orders) AS total_orders,
            (SELECT COALESCE(SUM(total_price), 0) FROM orders) AS total_sales
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

pub async fn customers_by_ids(
    pool: &PgPool,
    user_ids: &[i32],
) -> Result<HashMap<i32, OrderCustomer>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let customers = sqlx::query_as::<_, OrderCustomer>(
        "SELECT id, name, email, phone FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(customers.into_iter().map(|c| (c.id, c)).collect())
}
