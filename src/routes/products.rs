use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ProductDetailResponse, ProductQuery, ProductResponse, SearchQuery},
    queries::{product_queries, review_queries},
    utils::extractors::parse_id,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = product_queries::list_products(&state.db, &params).await?;

    Ok(Json(products))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let keyword = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query required".to_string()))?;

    let products = product_queries::search_products(&state.db, keyword).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailResponse>> {
    let id = parse_id(&id, "Product not found")?;

    let product = product_queries::find_response(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviews = review_queries::list_for_product(&state.db, id).await?;

    Ok(Json(ProductDetailResponse { product, reviews }))
}
