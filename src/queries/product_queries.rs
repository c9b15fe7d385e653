use std::collections::HashMap;

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{
        LowStockProduct, NewProduct, Product, ProductChanges, ProductQuery, ProductResponse,
        ProductSize, SizeStock, SortBy,
    },
};

const MAX_PAGE_SIZE: i64 = 100;

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

async fn sizes_by_product(pool: &PgPool, product_ids: &[i32]) -> Result<HashMap<i32, Vec<ProductSize>>> {
    let rows = sqlx::query_as::<_, ProductSize>(
        "SELECT product_id, size, stock
         FROM product_sizes
         WHERE product_id = ANY($1)
         ORDER BY product_id, position",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i32, Vec<ProductSize>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row);
    }

    Ok(map)
}

/// Attaches size rows to each product, keeping the input order.
pub async fn with_sizes(pool: &PgPool, products: Vec<Product>) -> Result<Vec<ProductResponse>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut sizes = sizes_by_product(pool, &ids).await?;

    Ok(products
        .into_iter()
        .map(|p| {
            let rows = sizes.remove(&p.id).unwrap_or_default();
            ProductResponse::new(p, rows)
        })
        .collect())
}

pub async fn find_response(pool: &PgPool, id: i32) -> Result<Option<ProductResponse>> {
    match find_by_id(pool, id).await? {
        Some(product) => Ok(with_sizes(pool, vec![product]).await?.pop()),
        None => Ok(None),
    }
}

/// Loads the given products keyed by id; ids that no longer exist are absent.
pub async fn find_responses_by_ids(
    pool: &PgPool,
    ids: &[i32],
) -> Result<HashMap<i32, ProductResponse>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(with_sizes(pool, products)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

pub async fn list_products(pool: &PgPool, params: &ProductQuery) -> Result<Vec<ProductResponse>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

    if let Some(featured) = params.featured {
        query.push(" AND featured = ");
        query.push_bind(featured);
    }

    if let Some(ref tag) = params.tag {
        query.push(" AND ");
        query.push_bind(tag.clone());
        query.push(" = ANY(tags)");
    }

    if let Some(ref category) = params.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }

    if let Some(min_price) = params.min_price {
        query.push(" AND price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND price <= ");
        query.push_bind(max_price);
    }

    query.push(" ORDER BY ");
    match params.sort.unwrap_or(SortBy::Newest) {
        SortBy::PriceAsc => query.push("price ASC, id ASC"),
        SortBy::PriceDesc => query.push("price DESC, id ASC"),
        SortBy::Rating => query.push("average_rating DESC, num_reviews DESC, id ASC"),
        SortBy::Newest => query.push("created_at DESC, id DESC"),
    };

    if let Some(limit) = params.limit {
        query.push(" LIMIT ");
        query.push_bind(limit.clamp(0, MAX_PAGE_SIZE));
    }

    if let Some(offset) = params.offset {
        query.push(" OFFSET ");
        query.push_bind(offset.max(0));
    }

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    with_sizes(pool, products).await
}

/// Escapes LIKE wildcards so the keyword matches literally.
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub async fn search_products(pool: &PgPool, keyword: &str) -> Result<Vec<ProductResponse>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products
         WHERE title ILIKE $1 OR description ILIKE $1
         ORDER BY created_at DESC",
    )
    .bind(like_pattern(keyword))
    .fetch_all(pool)
    .await?;

    with_sizes(pool, products).await
}

async fn replace_sizes(conn: &mut PgConnection, product_id: i32, sizes: &[SizeStock]) -> Result<()> {
    sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    let names: Vec<&str> = sizes.iter().map(|s| s.size.as_str()).collect();
    let stocks: Vec<i32> = sizes.iter().map(|s| s.stock).collect();

    sqlx::query(
        "INSERT INTO product_sizes (product_id, size, stock, position)
         SELECT $1, s.size, s.stock, s.position::int
         FROM unnest($2::text[], $3::int[]) WITH ORDINALITY AS s(size, stock, position)",
    )
    .bind(product_id)
    .bind(&names)
    .bind(&stocks)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn create_product(pool: &PgPool, new: &NewProduct) -> Result<ProductResponse> {
    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            title, description, price, image_primary, image_thumbnail,
            image_gallery, category, tags, featured
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.price)
    .bind(&new.image_primary)
    .bind(&new.image_thumbnail)
    .bind(&new.image_gallery)
    .bind(&new.category)
    .bind(&new.tags)
    .bind(new.featured)
    .fetch_one(&mut *tx)
    .await?;

    replace_sizes(&mut *tx, product.id, &new.sizes).await?;

    tx.commit().await?;

    let rows = new
        .sizes
        .iter()
        .map(|s| ProductSize {
            product_id: product.id,
            size: s.size.clone(),
            stock: s.stock,
        })
        .collect();

    Ok(ProductResponse::new(product, rows))
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    changes: &ProductChanges,
) -> Result<Option<ProductResponse>> {
    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            image_primary = COALESCE($4, image_primary),
            image_thumbnail = COALESCE($5, image_thumbnail),
            image_gallery = COALESCE($6, image_gallery),
            category = COALESCE($7, category),
            tags = COALESCE($8, tags),
            featured = COALESCE($9, featured),
            updated_at = NOW()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.price)
    .bind(&changes.image_primary)
    .bind(&changes.image_thumbnail)
    .bind(&changes.image_gallery)
    .bind(&changes.category)
    .bind(&changes.tags)
    .bind(changes.featured)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(product) = product else {
        return Ok(None);
    };

    if let Some(sizes) = &changes.sizes {
        replace_sizes(&mut *tx, id, sizes).await?;
    }

    tx.commit().await?;

    Ok(with_sizes(pool, vec![product]).await?.pop())
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Products whose stock summed over every size is at or below `threshold`.
pub async fn low_stock(pool: &PgPool, threshold: i64) -> Result<Vec<LowStockProduct>> {
    let products = sqlx::query_as::<_, LowStockProduct>(
        r#"
        SELECT p.id, p.title, p.category, COALESCE(SUM(s.stock), 0)::bigint AS total_stock
        FROM products p
        LEFT JOIN product_sizes s ON s.product_id = p.id
        GROUP BY p.id
        HAVING COALESCE(SUM(s.stock), 0) <= $1
        ORDER BY total_stock ASC, p.id ASC
        "#,
    )
    .bind(threshold)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_keyword() {
        assert_eq!(like_pattern("runner"), "%runner%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
