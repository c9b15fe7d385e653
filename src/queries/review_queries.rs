use sqlx::{PgConnection, PgPool};

use crate::{
    error::Result,
    models::{CreateReviewRequest, RatingSummary, Review, ReviewResponse, UpdateReviewRequest},
};

const REVIEW_WITH_AUTHOR: &str = r#"
    SELECT r.id, r.user_id, r.product_id, r.rating, r.title, r.comment,
           u.name AS user_name, u.profile_image AS user_profile_image,
           r.created_at, r.updated_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
"#;

pub async fn list_for_product(pool: &PgPool, product_id: i32) -> Result<Vec<ReviewResponse>> {
    let sql = format!(
        "{} WHERE r.product_id = $1 ORDER BY r.created_at DESC, r.id DESC",
        REVIEW_WITH_AUTHOR
    );
    let reviews = sqlx::query_as::<_, ReviewResponse>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;

    Ok(reviews)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Review>> {
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(review)
}

/// Recomputes a product's average rating and review count from its reviews.
pub async fn refresh_product_rating(conn: &mut PgConnection, product_id: i32) -> Result<RatingSummary> {
    let ratings: Vec<i32> = sqlx::query_scalar("SELECT rating FROM reviews WHERE product_id = $1")
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await?;

    let summary = RatingSummary::from_ratings(&ratings);

    sqlx::query(
        "UPDATE products SET average_rating = $1, num_reviews = $2, updated_at = NOW() WHERE id = $3",
    )
    .bind(summary.average)
    .bind(summary.count)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    Ok(summary)
}

pub async fn create_review(pool: &PgPool, user_id: i32, req: &CreateReviewRequest) -> Result<Review> {
    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (user_id, product_id, rating, title, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(req.product_id)
    .bind(req.rating)
    .bind(req.title.trim())
    .bind(req.comment.trim())
    .fetch_one(&mut *tx)
    .await?;

    refresh_product_rating(&mut *tx, review.product_id).await?;

    tx.commit().await?;
    Ok(review)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn update_review(pool: &PgPool, id: i32, req: &UpdateReviewRequest) -> Result<Review> {
    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews
        SET
            rating = COALESCE($1, rating),
            title = COALESCE($2, title),
            comment = COALESCE($3, comment),
            updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(req.rating)
    .bind(non_blank(req.title.as_deref()))
    .bind(non_blank(req.comment.as_deref()))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    refresh_product_rating(&mut *tx, review.product_id).await?;

    tx.commit().await?;
    Ok(review)
}

pub async fn delete_review(pool: &PgPool, review: &Review) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(review.id)
        .execute(&mut *tx)
        .await?;

    refresh_product_rating(&mut *tx, review.product_id).await?;

    tx.commit().await?;
    Ok(())
}
