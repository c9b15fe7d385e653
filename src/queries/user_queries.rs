use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewUser, ProfileChanges, User},
    queries::review_queries,
};

pub async fn create_user(pool: &PgPool, new: &NewUser, password_hash: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash, phone) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(password_hash)
    .bind(&new.phone)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    changes: &ProfileChanges,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            name = COALESCE($1, name),
            phone = COALESCE($2, phone),
            profile_image = COALESCE($3, profile_image),
            updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.phone)
    .bind(&changes.profile_image)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, id: i32, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    Ok(users)
}

pub async fn toggle_admin(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_admin = NOT is_admin, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn toggle_ban(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_banned = NOT is_banned, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Deletes the user with their cart, wishlist, addresses and reviews. Orders
/// stay on record with no owner. Products the user reviewed get their rating
/// aggregates recomputed in the same transaction.
pub async fn delete_user(pool: &PgPool, id: i32) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let reviewed: Vec<i32> =
        sqlx::query_scalar("SELECT DISTINCT product_id FROM reviews WHERE user_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for product_id in reviewed {
        review_queries::refresh_product_rating(&mut *tx, product_id).await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected())
}
